// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! dorm-ledger: dormitory inventory bookkeeping.
//!
//! Each screen owns an explicit state struct ([`WarehouseState`],
//! [`StudentDetail`], [`Roster`]); derived values (totals, zero-stock counts,
//! low-stock flags) are recomputed from the records on read. Nothing is
//! persisted: every session starts from the fixed seed in [`seed`].
#![forbid(unsafe_code)]

mod assignment;
mod error;
/// Delimited-text export of snapshots and issued-item ledgers.
pub mod export;
mod ident;
/// Resident import affordance.
pub mod import;
mod movement;
mod roster;
/// Fixed sample records.
pub mod seed;
mod snapshot;
mod stock;
mod student;
mod warehouse;

/// Issued-items ledger and row lifecycle.
pub use assignment::{AssignmentLedger, AssignmentRow, AssignmentState};
/// Ledger error type.
pub use error::LedgerError;
/// Export file wrapper.
pub use export::ExportFile;
/// Typed record identifiers.
pub use ident::{ItemId, KindId, MovementId, RowId, SnapshotId, StudentId};
/// Import request.
pub use import::ImportRequest;
/// Per-kind issue/return log.
pub use movement::{HeldRow, ItemKind, Movement, MovementLog, MovementOp};
/// Roster, filters and pagination.
pub use roster::{filter_options, page, NewStudent, Page, Roster, RosterFilter, Student};
/// Inventory snapshots.
pub use snapshot::{Snapshot, SnapshotRecorder, SnapshotRow};
/// Live stock ledger.
pub use stock::{Allocation, StockItem, StockLedger, StockLevel, LOW_STOCK_MAX};
/// Student detail screen and eviction.
pub use student::{EvictionPolicy, EvictionReport, StudentDetail};
/// Warehouse screen.
pub use warehouse::{StockRowView, WarehouseMetrics, WarehouseState};
