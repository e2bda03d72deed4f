// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Items issued to one resident, with issue and return dates.
//!
//! A row is `Active` while it has no return date and `Returned` once one is
//! stamped. Rows are never removed; the two views are predicates over the
//! same list.

use dorm_app_core::confirm::{ConfirmPort, Prompt};
use serde::Serialize;
use tracing::info;

use crate::error::LedgerError;
use crate::ident::{next_after, RowId, StudentId};

/// Lifecycle state of an issued row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentState {
    /// Held by the resident.
    Active,
    /// Handed back; terminal.
    Returned,
}

/// One issuance to a resident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRow {
    /// Row id, unique within the ledger.
    pub id: RowId,
    /// Item name (free text, matched against stock by name).
    pub item: String,
    /// Units issued.
    pub quantity: u32,
    /// Issue date label.
    pub issued_on: String,
    /// Return date label, set once.
    pub returned_on: Option<String>,
}

impl AssignmentRow {
    /// Derived state.
    pub fn state(&self) -> AssignmentState {
        if self.returned_on.is_some() {
            AssignmentState::Returned
        } else {
            AssignmentState::Active
        }
    }

    /// `true` while the row has no return date.
    pub fn is_active(&self) -> bool {
        self.state() == AssignmentState::Active
    }
}

/// Issued-items ledger scoped to one student.
#[derive(Debug, Clone)]
pub struct AssignmentLedger {
    student: StudentId,
    rows: Vec<AssignmentRow>,
}

impl AssignmentLedger {
    /// Empty ledger for `student`.
    pub fn new(student: StudentId) -> Self {
        Self {
            student,
            rows: Vec::new(),
        }
    }

    /// Ledger pre-populated with rows.
    pub fn with_rows(student: StudentId, rows: Vec<AssignmentRow>) -> Self {
        Self { student, rows }
    }

    /// Owning student.
    pub fn student(&self) -> StudentId {
        self.student
    }

    /// All rows in issue order.
    pub fn rows(&self) -> &[AssignmentRow] {
        &self.rows
    }

    /// Look up a row by id.
    pub fn get(&self, id: RowId) -> Option<&AssignmentRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Append a new active row. Quantity is at least 1; the id is one past the
    /// current maximum.
    pub fn issue(&mut self, item: impl Into<String>, quantity: u32, date: impl Into<String>) -> RowId {
        let id = next_after(self.rows.iter().map(|r| r.id.value()), RowId);
        let row = AssignmentRow {
            id,
            item: item.into(),
            quantity: quantity.max(1),
            issued_on: date.into(),
            returned_on: None,
        };
        info!(student = %self.student, row = %id, item = %row.item, qty = row.quantity, "item issued");
        self.rows.push(row);
        id
    }

    /// Stamp a return date on an active row after confirmation.
    /// Returns `Ok(false)` when the prompt is declined.
    pub fn mark_returned(
        &mut self,
        id: RowId,
        date: impl Into<String>,
        confirm: &dyn ConfirmPort,
    ) -> Result<bool, LedgerError> {
        let row = self.active_row_mut(id)?;
        if !confirm.confirm(&Prompt::RETURN_ITEM) {
            return Ok(false);
        }
        row.returned_on = Some(date.into());
        info!(student = %self.student, row = %id, "item returned");
        Ok(true)
    }

    /// Change the quantity of an active row (minimum 1).
    pub fn edit_quantity(&mut self, id: RowId, quantity: u32) -> Result<(), LedgerError> {
        self.active_row_mut(id)?.quantity = quantity.max(1);
        Ok(())
    }

    /// Stamp `date` on every active row without asking; returns the rows touched.
    pub(crate) fn return_all(&mut self, date: &str) -> Vec<AssignmentRow> {
        let mut touched = Vec::new();
        for row in self.rows.iter_mut().filter(|r| r.returned_on.is_none()) {
            row.returned_on = Some(date.to_owned());
            touched.push(row.clone());
        }
        touched
    }

    fn active_row_mut(&mut self, id: RowId) -> Result<&mut AssignmentRow, LedgerError> {
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(LedgerError::UnknownRow(id))?;
        if row.returned_on.is_some() {
            return Err(LedgerError::AlreadyReturned(id));
        }
        Ok(row)
    }

    /// Rows still held by the student.
    pub fn active(&self) -> impl Iterator<Item = &AssignmentRow> {
        self.rows.iter().filter(|r| r.is_active())
    }

    /// Rows already handed back.
    pub fn returned(&self) -> impl Iterator<Item = &AssignmentRow> {
        self.rows.iter().filter(|r| !r.is_active())
    }

    /// Count for the "active" tab label.
    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Count for the "returned" tab label.
    pub fn returned_count(&self) -> usize {
        self.returned().count()
    }

    /// `(item, units)` pairs currently held, for stock allocation views.
    pub fn issued_units(&self) -> impl Iterator<Item = (&str, u32)> {
        self.active().map(|r| (r.item.as_str(), r.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dorm_app_core::confirm::{AlwaysConfirm, NeverConfirm};

    fn ledger() -> AssignmentLedger {
        let mut l = AssignmentLedger::new(StudentId(12));
        l.issue("Матрац", 1, "2025-09-01");
        l.issue("Рушник", 2, "2025-09-01");
        l
    }

    #[test]
    fn ids_are_max_plus_one() {
        let mut l = ledger();
        assert_eq!(l.issue("Подушка", 0, "2025-09-02"), RowId(3));
        assert_eq!(l.get(RowId(3)).map(|r| r.quantity), Some(1));
    }

    #[test]
    fn return_moves_row_between_views() {
        let mut l = ledger();
        assert_eq!(l.mark_returned(RowId(1), "2025-12-01", &AlwaysConfirm), Ok(true));
        assert_eq!(l.active_count(), 1);
        assert_eq!(l.returned_count(), 1);
        assert!(l.active().all(|r| r.id != RowId(1)));
        assert_eq!(l.rows().len(), 2);
        assert_eq!(l.get(RowId(1)).map(AssignmentRow::state), Some(AssignmentState::Returned));
    }

    #[test]
    fn returned_is_terminal() {
        let mut l = ledger();
        l.mark_returned(RowId(2), "2025-12-01", &AlwaysConfirm).unwrap();
        assert_eq!(
            l.mark_returned(RowId(2), "2025-12-02", &AlwaysConfirm),
            Err(LedgerError::AlreadyReturned(RowId(2)))
        );
        assert_eq!(
            l.edit_quantity(RowId(2), 5),
            Err(LedgerError::AlreadyReturned(RowId(2)))
        );
        assert_eq!(
            l.get(RowId(2)).and_then(|r| r.returned_on.as_deref()),
            Some("2025-12-01")
        );
    }

    #[test]
    fn declined_return_changes_nothing() {
        let mut l = ledger();
        assert_eq!(l.mark_returned(RowId(1), "2025-12-01", &NeverConfirm), Ok(false));
        assert_eq!(l.active_count(), 2);
    }

    #[test]
    fn unknown_row() {
        let mut l = ledger();
        assert_eq!(
            l.mark_returned(RowId(9), "x", &AlwaysConfirm),
            Err(LedgerError::UnknownRow(RowId(9)))
        );
    }

    #[test]
    fn issued_units_skip_returned_rows() {
        let mut l = ledger();
        l.mark_returned(RowId(1), "2025-12-01", &AlwaysConfirm).unwrap();
        let held: Vec<_> = l.issued_units().collect();
        assert_eq!(held, [("Рушник", 2)]);
    }
}
