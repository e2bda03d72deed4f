// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Errors raised by ledger operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::ident::{ItemId, KindId, RowId, SnapshotId, StudentId};

/// Errors emitted by the ledgers and screen states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// No stock item carries this id.
    #[error("unknown stock item {0}")]
    UnknownItem(ItemId),
    /// No stock item carries this name.
    #[error("unknown stock item `{0}`")]
    UnknownItemName(String),
    /// No snapshot in history carries this id.
    #[error("unknown snapshot {0}")]
    UnknownSnapshot(SnapshotId),
    /// No issued row carries this id.
    #[error("unknown issued row {0}")]
    UnknownRow(RowId),
    /// No resident carries this id.
    #[error("unknown student {0}")]
    UnknownStudent(StudentId),
    /// No item kind carries this id.
    #[error("unknown item kind {0}")]
    UnknownKind(KindId),
    /// Requested units exceed what the item has on hand.
    #[error("only {available} of `{item}` on hand, {requested} requested")]
    InsufficientStock {
        /// Item name.
        item: String,
        /// Units on hand.
        available: u32,
        /// Units asked for.
        requested: u32,
    },
    /// A quantity does not fit the stored range.
    #[error("quantity {0} is out of range")]
    QuantityOutOfRange(i64),
    /// The student has been evicted; the record is closed.
    #[error("student {0} has been evicted")]
    Evicted(StudentId),
    /// The row already has a return date; returning is terminal.
    #[error("row {0} was already returned")]
    AlreadyReturned(RowId),
    /// A required form field was blank.
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),
    /// Export requested with no snapshot selected.
    #[error("no snapshot selected")]
    NothingSelected,
    /// Import file type outside `.csv`, `.xlsx`, `.xls`.
    #[error("unsupported import file {0}")]
    UnsupportedImport(PathBuf),
}
