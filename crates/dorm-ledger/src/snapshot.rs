// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Dated, immutable captures of the stock ledger ("inventory counts").

use dorm_app_core::confirm::{ConfirmPort, Prompt};
use serde::Serialize;
use tracing::info;

use crate::error::LedgerError;
use crate::ident::SnapshotId;
use crate::stock::StockLedger;

/// One captured row; a copy of the live item, not a reference to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotRow {
    /// Item name at capture time.
    pub name: String,
    /// Units on hand at capture time.
    pub quantity: u32,
}

/// Immutable inventory capture.
///
/// The total is computed from the captured rows when the snapshot is built
/// and cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    id: SnapshotId,
    date: String,
    total: u64,
    rows: Vec<SnapshotRow>,
}

impl Snapshot {
    /// Build a snapshot from rows; the total is their sum.
    pub fn new(id: SnapshotId, date: impl Into<String>, rows: Vec<SnapshotRow>) -> Self {
        let total = rows.iter().map(|r| u64::from(r.quantity)).sum();
        Self {
            id,
            date: date.into(),
            total,
            rows,
        }
    }

    /// Snapshot identifier.
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    /// Caller-supplied date label (not validated).
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Sum of captured quantities.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Captured rows in ledger order.
    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }

    /// Selection-list label: `<date> • <total> од.`
    pub fn summary(&self) -> String {
        format!("{} • {} од.", self.date, self.total)
    }
}

/// Snapshot history, most recent first.
///
/// Ids come from a counter that only moves forward, so deleting a snapshot
/// never frees its id for reuse.
#[derive(Debug, Clone)]
pub struct SnapshotRecorder {
    history: Vec<Snapshot>,
    next_id: u32,
}

impl Default for SnapshotRecorder {
    fn default() -> Self {
        Self {
            history: Vec::new(),
            next_id: 1,
        }
    }
}

impl SnapshotRecorder {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture every item of `ledger` under `date` and prepend it to history.
    pub fn create_snapshot(&mut self, ledger: &StockLedger, date: impl Into<String>) -> &Snapshot {
        let rows = ledger
            .items()
            .iter()
            .map(|i| SnapshotRow {
                name: i.name.clone(),
                quantity: i.quantity,
            })
            .collect();
        let id = SnapshotId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let snap = Snapshot::new(id, date, rows);
        info!(id = %snap.id, date = %snap.date, total = snap.total, "inventory snapshot created");
        self.history.insert(0, snap);
        &self.history[0]
    }

    /// Remove a snapshot after the user confirms. Returns `Ok(false)` when the
    /// prompt is declined (history untouched).
    pub fn delete_snapshot(
        &mut self,
        id: SnapshotId,
        confirm: &dyn ConfirmPort,
    ) -> Result<bool, LedgerError> {
        let pos = self
            .history
            .iter()
            .position(|s| s.id == id)
            .ok_or(LedgerError::UnknownSnapshot(id))?;
        if !confirm.confirm(&Prompt::DELETE_SNAPSHOT) {
            return Ok(false);
        }
        self.history.remove(pos);
        info!(id = %id, "inventory snapshot deleted");
        Ok(true)
    }

    /// History, most recent first.
    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    /// The most recently created snapshot still in history.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.history.first()
    }

    /// Look up a snapshot by id.
    pub fn get(&self, id: SnapshotId) -> Option<&Snapshot> {
        self.history.iter().find(|s| s.id == id)
    }

    /// `true` when no snapshot is recorded.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
