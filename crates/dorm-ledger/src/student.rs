// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Student detail screen: profile edits, issued items, eviction.
//!
//! Stock on hand and the student's held rows are two sides of one count:
//! issuing takes units off hand, every return (single row or eviction) puts
//! them back. Item names the stock ledger does not know move no units either
//! way.

use dorm_app_core::confirm::{ConfirmPort, Prompt};
use dorm_app_core::prefs::ExportQuoting;
use tracing::{debug, info, warn};

use crate::assignment::{AssignmentLedger, AssignmentRow};
use crate::error::LedgerError;
use crate::export::{assignments_file, ExportFile};
use crate::ident::RowId;
use crate::roster::Student;
use crate::stock::StockLedger;

/// What eviction does with items the student still holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Close the record only; held items stay active and stock is untouched.
    Detach,
    /// Mark every active row returned and credit its units back to stock.
    ReturnAll,
}

/// Outcome of a confirmed eviction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvictionReport {
    /// Rows stamped as returned.
    pub returned: Vec<RowId>,
    /// Units credited back to stock.
    pub credited_units: u64,
    /// Item names stock does not track; no units were credited for them.
    pub unmatched: Vec<String>,
}

/// State bag owned by the student detail screen.
#[derive(Debug, Clone)]
pub struct StudentDetail {
    student: Student,
    assignments: AssignmentLedger,
    editing: bool,
    evicted: bool,
}

impl StudentDetail {
    /// Screen over an explicit student and ledger. Rows already in the ledger
    /// count as units held outside stock.
    pub fn new(student: Student, assignments: AssignmentLedger) -> Self {
        Self {
            student,
            assignments,
            editing: false,
            evicted: false,
        }
    }

    /// Screen over the sample student.
    pub fn seeded() -> Self {
        Self::new(
            crate::seed::detail_student(),
            crate::seed::detail_assignments(),
        )
    }

    /// Profile.
    pub fn student(&self) -> &Student {
        &self.student
    }

    /// Issued items. Changes go through the stock-aware methods below.
    pub fn assignments(&self) -> &AssignmentLedger {
        &self.assignments
    }

    /// Profile edit mode flag.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// `true` once eviction has been confirmed.
    pub fn is_evicted(&self) -> bool {
        self.evicted
    }

    /// Flip between view and edit mode ("Редагувати" / "Зберегти зміни").
    pub fn toggle_edit(&mut self) -> bool {
        self.editing = !self.editing;
        self.editing
    }

    /// Set the room.
    pub fn set_room(&mut self, room: impl Into<String>) {
        self.student.room = room.into();
    }

    /// Set the faculty.
    pub fn set_faculty(&mut self, faculty: impl Into<String>) {
        self.student.faculty = faculty.into();
    }

    /// Set the group.
    pub fn set_group(&mut self, group: impl Into<String>) {
        self.student.group = group.into();
    }

    /// Set free-form notes.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.student.notes = notes.into();
    }

    /// Set the course from typed text; non-numeric or zero keeps the old value.
    pub fn set_course(&mut self, typed: &str) -> u8 {
        if let Ok(course) = typed.trim().parse::<u8>() {
            if course > 0 {
                self.student.course = course;
            }
        }
        self.student.course
    }

    /// Export the student's full issued history.
    pub fn export(&self, quoting: ExportQuoting) -> ExportFile {
        assignments_file(&self.student, self.assignments.rows(), quoting)
    }

    fn ensure_resident(&self) -> Result<(), LedgerError> {
        if self.evicted {
            return Err(LedgerError::Evicted(self.student.id));
        }
        Ok(())
    }

    /// Issue `quantity` (at least 1) units of `item`, taking them off hand.
    ///
    /// Names the stock ledger does not know are recorded without moving
    /// stock; known names fail with `InsufficientStock` when too few are on
    /// hand, leaving both sides unchanged.
    pub fn issue(
        &mut self,
        item: impl Into<String>,
        quantity: u32,
        date: impl Into<String>,
        stock: &mut StockLedger,
    ) -> Result<RowId, LedgerError> {
        self.ensure_resident()?;
        let item = item.into();
        let quantity = quantity.max(1);
        if stock.find_by_name(&item).is_some() {
            stock.debit(&item, quantity)?;
        } else {
            debug!(item = %item, "issuing an item stock does not track");
        }
        Ok(self.assignments.issue(item, quantity, date))
    }

    /// Return one active row after confirmation and put its units back on
    /// hand. `Ok(false)` means the prompt was declined.
    pub fn return_item(
        &mut self,
        row: RowId,
        date: impl Into<String>,
        stock: &mut StockLedger,
        confirm: &dyn ConfirmPort,
    ) -> Result<bool, LedgerError> {
        self.ensure_resident()?;
        if !self.assignments.mark_returned(row, date, confirm)? {
            return Ok(false);
        }
        if let Some(returned) = self.assignments.get(row) {
            credit_back(stock, returned);
        }
        Ok(true)
    }

    /// Change the quantity of an active row (minimum 1), moving the
    /// difference between stock and the student.
    pub fn edit_quantity(
        &mut self,
        row: RowId,
        quantity: u32,
        stock: &mut StockLedger,
    ) -> Result<u32, LedgerError> {
        self.ensure_resident()?;
        let current = self
            .assignments
            .get(row)
            .ok_or(LedgerError::UnknownRow(row))?;
        if !current.is_active() {
            return Err(LedgerError::AlreadyReturned(row));
        }
        let (item, old) = (current.item.clone(), current.quantity);
        let new = quantity.max(1);
        if stock.find_by_name(&item).is_some() {
            if new > old {
                stock.debit(&item, new - old)?;
            } else if old > new {
                stock.credit(&item, old - new)?;
            }
        }
        self.assignments.edit_quantity(row, new)?;
        Ok(new)
    }

    /// Evict after confirmation. `Ok(None)` means the prompt was declined; an
    /// already evicted student fails with `Evicted` before any prompt.
    pub fn evict(
        &mut self,
        policy: EvictionPolicy,
        date: &str,
        stock: &mut StockLedger,
        confirm: &dyn ConfirmPort,
    ) -> Result<Option<EvictionReport>, LedgerError> {
        self.ensure_resident()?;
        if !confirm.confirm(&Prompt::EVICT_STUDENT) {
            return Ok(None);
        }
        let mut report = EvictionReport::default();
        if policy == EvictionPolicy::ReturnAll {
            for row in self.assignments.return_all(date) {
                report.returned.push(row.id);
                if credit_back(stock, &row) {
                    report.credited_units += u64::from(row.quantity);
                } else {
                    report.unmatched.push(row.item);
                }
            }
        }
        self.evicted = true;
        info!(
            student = %self.student.id,
            ?policy,
            returned = report.returned.len(),
            credited = report.credited_units,
            "student evicted"
        );
        Ok(Some(report))
    }
}

/// Put a returned row's units back on hand; `false` when stock does not
/// track the item.
fn credit_back(stock: &mut StockLedger, row: &AssignmentRow) -> bool {
    match stock.credit(&row.item, row.quantity) {
        Ok(_) => true,
        Err(err) => {
            warn!(%err, row = %row.id, "returned item has no stock record");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::StudentId;
    use dorm_app_core::confirm::{AlwaysConfirm, NeverConfirm};

    fn on_hand(stock: &StockLedger, name: &str) -> Option<u32> {
        stock.find_by_name(name).map(|i| i.quantity)
    }

    #[test]
    fn course_edit_ignores_garbage() {
        let mut d = StudentDetail::seeded();
        assert_eq!(d.set_course("abc"), 2);
        assert_eq!(d.set_course("0"), 2);
        assert_eq!(d.set_course(" 3 "), 3);
    }

    #[test]
    fn issue_takes_units_off_hand() {
        let mut d = StudentDetail::seeded();
        let mut stock = StockLedger::seeded();
        let row = d.issue("Подушка", 5, "2025-09-05", &mut stock).unwrap();
        assert_eq!(row, RowId(4));
        assert_eq!(on_hand(&stock, "Подушка"), Some(95));
        assert_eq!(stock.total_units(), 750);
    }

    #[test]
    fn issue_beyond_stock_changes_nothing() {
        let mut d = StudentDetail::seeded();
        let mut stock = StockLedger::seeded();
        assert_eq!(
            d.issue("Дзеркало", 11, "2025-09-05", &mut stock),
            Err(LedgerError::InsufficientStock {
                item: "Дзеркало".into(),
                available: 10,
                requested: 11,
            })
        );
        assert_eq!(d.assignments().rows().len(), 3);
        assert_eq!(on_hand(&stock, "Дзеркало"), Some(10));
    }

    #[test]
    fn untracked_item_moves_no_stock() {
        let mut d = StudentDetail::seeded();
        let mut stock = StockLedger::seeded();
        let row = d.issue("Гітара", 1, "2025-09-05", &mut stock).unwrap();
        assert_eq!(stock.total_units(), 755);
        assert_eq!(d.return_item(row, "2025-09-06", &mut stock, &AlwaysConfirm), Ok(true));
        assert_eq!(stock.total_units(), 755);
    }

    #[test]
    fn single_return_puts_units_back() {
        let mut d = StudentDetail::seeded();
        let mut stock = StockLedger::seeded();
        let row = d.issue("Подушка", 5, "2025-09-05", &mut stock).unwrap();
        assert_eq!(
            d.return_item(row, "2025-09-06", &mut stock, &NeverConfirm),
            Ok(false)
        );
        assert_eq!(stock.total_units(), 750);
        assert_eq!(
            d.return_item(row, "2025-09-06", &mut stock, &AlwaysConfirm),
            Ok(true)
        );
        assert_eq!(stock.total_units(), 755);
        assert_eq!(
            d.return_item(row, "2025-09-07", &mut stock, &AlwaysConfirm),
            Err(LedgerError::AlreadyReturned(row))
        );
        assert_eq!(stock.total_units(), 755);
    }

    #[test]
    fn quantity_edit_moves_the_difference() {
        let mut d = StudentDetail::seeded();
        let mut stock = StockLedger::seeded();
        assert_eq!(d.edit_quantity(RowId(3), 5, &mut stock), Ok(5));
        assert_eq!(on_hand(&stock, "Рушник"), Some(177));
        assert_eq!(d.edit_quantity(RowId(3), 0, &mut stock), Ok(1));
        assert_eq!(on_hand(&stock, "Рушник"), Some(181));
        assert!(matches!(
            d.edit_quantity(RowId(3), 1000, &mut stock),
            Err(LedgerError::InsufficientStock { .. })
        ));
        assert_eq!(d.assignments().get(RowId(3)).map(|r| r.quantity), Some(1));
    }

    #[test]
    fn declined_eviction_changes_nothing() {
        let mut d = StudentDetail::seeded();
        let mut stock = StockLedger::seeded();
        let before = stock.total_units();
        assert_eq!(
            d.evict(EvictionPolicy::ReturnAll, "2025-12-01", &mut stock, &NeverConfirm),
            Ok(None)
        );
        assert!(!d.is_evicted());
        assert_eq!(d.assignments().active_count(), 3);
        assert_eq!(stock.total_units(), before);
    }

    #[test]
    fn detach_closes_the_record() {
        let mut d = StudentDetail::seeded();
        let mut stock = StockLedger::seeded();
        let report = d
            .evict(EvictionPolicy::Detach, "2025-12-01", &mut stock, &AlwaysConfirm)
            .unwrap()
            .unwrap();
        assert!(report.returned.is_empty());
        assert!(d.is_evicted());
        assert_eq!(d.assignments().active_count(), 3);

        let closed = LedgerError::Evicted(StudentId(12));
        assert_eq!(
            d.evict(EvictionPolicy::ReturnAll, "2025-12-02", &mut stock, &AlwaysConfirm),
            Err(closed.clone())
        );
        assert_eq!(
            d.issue("Подушка", 1, "2025-12-02", &mut stock),
            Err(closed.clone())
        );
        assert_eq!(
            d.return_item(RowId(1), "2025-12-02", &mut stock, &AlwaysConfirm),
            Err(closed)
        );
        assert_eq!(stock.total_units(), 755);
        assert_eq!(d.assignments().active_count(), 3);
    }

    #[test]
    fn return_all_credits_tracked_rows() {
        let mut rows = crate::seed::detail_assignments().rows().to_vec();
        rows.push(AssignmentRow {
            id: RowId(4),
            item: "Гітара".into(),
            quantity: 1,
            issued_on: "2025-09-05".into(),
            returned_on: None,
        });
        let mut d = StudentDetail::new(
            crate::seed::detail_student(),
            AssignmentLedger::with_rows(StudentId(12), rows),
        );
        let mut stock = StockLedger::seeded();
        let report = d
            .evict(EvictionPolicy::ReturnAll, "2025-12-01", &mut stock, &AlwaysConfirm)
            .unwrap()
            .unwrap();
        assert_eq!(report.returned.len(), 4);
        assert_eq!(report.credited_units, 4);
        assert_eq!(report.unmatched, ["Гітара"]);
        assert_eq!(stock.total_units(), 759);
        assert_eq!(d.assignments().active_count(), 0);
        assert_eq!(on_hand(&stock, "Рушник"), Some(182));
    }

    #[test]
    fn issue_then_evict_restores_the_count() {
        let mut d = StudentDetail::seeded();
        let mut stock = StockLedger::seeded();
        let held_at_start: u64 = d.assignments().issued_units().map(|(_, n)| u64::from(n)).sum();
        let owned = stock.total_units() + held_at_start;

        d.issue("Подушка", 5, "2025-09-05", &mut stock).unwrap();
        let report = d
            .evict(EvictionPolicy::ReturnAll, "2025-12-01", &mut stock, &AlwaysConfirm)
            .unwrap()
            .unwrap();
        assert_eq!(report.credited_units, held_at_start + 5);
        assert_eq!(stock.total_units(), owned);
        assert_eq!(on_hand(&stock, "Подушка"), Some(101));
    }

    #[test]
    fn export_covers_all_rows() {
        let d = StudentDetail::seeded();
        let file = d.export(ExportQuoting::None);
        assert_eq!(file.lines().count(), 5);
    }
}
