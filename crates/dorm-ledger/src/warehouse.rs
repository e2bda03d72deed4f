// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Warehouse screen state: live stock, pending row edits, snapshot history
//! and the current selection.
//!
//! Edits are staged per row and only reach the ledger on `save`, mirroring the
//! correction widget of the screen (−/+ buttons, typed value, save).

use std::collections::BTreeMap;

use dorm_app_core::confirm::ConfirmPort;
use dorm_app_core::prefs::ExportQuoting;
use serde::Serialize;
use tracing::debug;

use crate::error::LedgerError;
use crate::export::{snapshot_file, ExportFile};
use crate::ident::{ItemId, SnapshotId};
use crate::snapshot::{Snapshot, SnapshotRecorder};
use crate::stock::{clamp_quantity, StockLedger, StockLevel};

/// Values of the metric cards above the stock table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarehouseMetrics {
    /// Sum of all live quantities.
    pub total_units: u64,
    /// Items with zero units.
    pub zero_stock: usize,
    /// Summary of the newest snapshot, if any.
    pub last_inventory: Option<String>,
}

/// One rendered stock row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockRowView {
    /// Item id.
    pub id: ItemId,
    /// Item name.
    pub name: String,
    /// Stored quantity.
    pub quantity: u32,
    /// Draft value if one is staged, else the stored quantity.
    pub editing: u32,
    /// Level computed from `editing`.
    pub level: StockLevel,
}

/// State bag owned by the warehouse screen.
#[derive(Debug, Clone, Default)]
pub struct WarehouseState {
    stock: StockLedger,
    drafts: BTreeMap<ItemId, u32>,
    snapshots: SnapshotRecorder,
    selected: Option<SnapshotId>,
    refreshing: bool,
}

impl WarehouseState {
    /// Screen over the given ledger with empty history.
    pub fn new(stock: StockLedger) -> Self {
        Self {
            stock,
            ..Self::default()
        }
    }

    /// Screen over the seed stock.
    pub fn seeded() -> Self {
        Self::new(StockLedger::seeded())
    }

    /// Live ledger.
    pub fn stock(&self) -> &StockLedger {
        &self.stock
    }

    /// Mutable live ledger (eviction reconciliation credits through this).
    pub fn stock_mut(&mut self) -> &mut StockLedger {
        &mut self.stock
    }

    /// Snapshot history.
    pub fn snapshots(&self) -> &SnapshotRecorder {
        &self.snapshots
    }

    fn require_item(&self, id: ItemId) -> Result<u32, LedgerError> {
        self.stock
            .get(id)
            .map(|i| i.quantity)
            .ok_or(LedgerError::UnknownItem(id))
    }

    /// Draft value, or the stored quantity when nothing is staged.
    pub fn draft_or_current(&self, id: ItemId) -> Result<u32, LedgerError> {
        let current = self.require_item(id)?;
        Ok(self.drafts.get(&id).copied().unwrap_or(current))
    }

    /// Stage a typed value; negatives are staged as zero, values the ledger
    /// cannot store are refused.
    pub fn stage(&mut self, id: ItemId, value: i64) -> Result<u32, LedgerError> {
        self.require_item(id)?;
        let v = clamp_quantity(value)?;
        self.drafts.insert(id, v);
        Ok(v)
    }

    /// "+" button.
    pub fn increment(&mut self, id: ItemId) -> Result<u32, LedgerError> {
        let v = self.draft_or_current(id)?.saturating_add(1);
        self.drafts.insert(id, v);
        Ok(v)
    }

    /// "−" button; never below zero.
    pub fn decrement(&mut self, id: ItemId) -> Result<u32, LedgerError> {
        let v = self.draft_or_current(id)?.saturating_sub(1);
        self.drafts.insert(id, v);
        Ok(v)
    }

    /// Commit the staged value (or keep the stored one) and clear the draft.
    pub fn save(&mut self, id: ItemId) -> Result<u32, LedgerError> {
        let value = self.draft_or_current(id)?;
        let stored = self.stock.adjust_quantity(id, i64::from(value))?;
        self.drafts.remove(&id);
        Ok(stored)
    }

    /// Ids with a staged but unsaved value.
    pub fn pending(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.drafts.keys().copied()
    }

    /// Table rows with draft-aware level flags.
    pub fn rows(&self) -> Vec<StockRowView> {
        self.stock
            .items()
            .iter()
            .map(|i| {
                let editing = self.drafts.get(&i.id).copied().unwrap_or(i.quantity);
                StockRowView {
                    id: i.id,
                    name: i.name.clone(),
                    quantity: i.quantity,
                    editing,
                    level: StockLevel::of(editing),
                }
            })
            .collect()
    }

    /// Metric cards.
    pub fn metrics(&self) -> WarehouseMetrics {
        WarehouseMetrics {
            total_units: self.stock.total_units(),
            zero_stock: self.stock.zero_stock_count(),
            last_inventory: self.snapshots.latest().map(Snapshot::summary),
        }
    }

    /// Record an inventory count of the stored quantities and select it.
    /// Unsaved drafts are not part of the capture.
    pub fn create_snapshot(&mut self, date: impl Into<String>) -> SnapshotId {
        let id = self.snapshots.create_snapshot(&self.stock, date).id();
        self.selected = Some(id);
        id
    }

    /// Delete a snapshot after confirmation; clears the selection if it pointed there.
    pub fn delete_snapshot(
        &mut self,
        id: SnapshotId,
        confirm: &dyn ConfirmPort,
    ) -> Result<bool, LedgerError> {
        let deleted = self.snapshots.delete_snapshot(id, confirm)?;
        if deleted && self.selected == Some(id) {
            self.selected = None;
        }
        Ok(deleted)
    }

    /// Change the selection; `None` clears it.
    pub fn select(&mut self, id: Option<SnapshotId>) -> Result<(), LedgerError> {
        if let Some(id) = id {
            if self.snapshots.get(id).is_none() {
                return Err(LedgerError::UnknownSnapshot(id));
            }
        }
        self.selected = id;
        Ok(())
    }

    /// Selected snapshot, if any.
    pub fn selected_snapshot(&self) -> Option<&Snapshot> {
        self.selected.and_then(|id| self.snapshots.get(id))
    }

    /// Export the selected snapshot.
    pub fn export_selected(&self, quoting: ExportQuoting) -> Result<ExportFile, LedgerError> {
        self.selected_snapshot()
            .map(|s| snapshot_file(s, quoting))
            .ok_or(LedgerError::NothingSelected)
    }

    /// Start the cosmetic refresh indicator.
    pub fn begin_refresh(&mut self) {
        debug!("warehouse refresh started");
        self.refreshing = true;
    }

    /// Clear the refresh indicator. Data is untouched.
    pub fn finish_refresh(&mut self) {
        self.refreshing = false;
    }

    /// Whether the refresh indicator is showing.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }
}
