// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed sample records every session starts from.

use crate::assignment::{AssignmentLedger, AssignmentRow};
use crate::ident::{ItemId, KindId, RowId, StudentId};
use crate::movement::ItemKind;
use crate::roster::Student;
use crate::stock::StockItem;

/// Names suggested by the issue form.
pub const ISSUE_SUGGESTIONS: [&str; 5] = ["Матрац", "Подушка", "Рушник", "Ковдра", "Стілець"];

const STOCK: [(&str, u32); 10] = [
    ("Матрац", 95),
    ("Подушка", 100),
    ("Ковдра", 100),
    ("Рушник", 180),
    ("Постільний комплект", 120),
    ("Стілець", 60),
    ("Стіл", 40),
    ("Настільна лампа", 30),
    ("Шафа", 20),
    ("Дзеркало", 10),
];

/// Warehouse seed, ids 1..=10.
pub fn stock_items() -> Vec<StockItem> {
    (1..)
        .zip(STOCK)
        .map(|(id, (name, quantity))| StockItem {
            id: ItemId(id),
            name: name.to_owned(),
            quantity,
        })
        .collect()
}

/// Kinds offered by the issue/return control bar, in suggestion order.
pub fn item_kinds() -> Vec<ItemKind> {
    (1..)
        .zip(ISSUE_SUGGESTIONS)
        .map(|(id, name)| ItemKind {
            id: KindId(id),
            name: name.to_owned(),
        })
        .collect()
}

fn student(id: u32, name: &str, room: &str, faculty: &str, course: u8, group: &str) -> Student {
    Student {
        id: StudentId(id),
        full_name: name.to_owned(),
        room: room.to_owned(),
        faculty: faculty.to_owned(),
        course,
        group: group.to_owned(),
        notes: String::new(),
    }
}

/// Sample residents of the roster page.
pub fn residents() -> Vec<Student> {
    vec![
        student(1, "Іваненко Іван Іванович", "101", "ФІОТ", 3, "ІН-31"),
        student(2, "Петров Петро Петрович", "102", "ІПСА", 2, "ЕК-22"),
        student(3, "Сидоренко Ольга Миколаївна", "103", "ФММ", 1, "IC-12"),
        student(4, "Коваль Андрій Сергійович", "104", "ФІОТ", 4, "ФФ-21"),
        student(5, "Мороз Оксана Володимирівна", "105", "ФІОТ", 4, "ФЛ-11"),
        student(6, "Приклад Студент", "105", "ФІОТ", 3, "ФЛ-11"),
        student(7, "Приклад Студент", "105", "ФІОТ", 3, "ФЛ-11"),
    ]
}

/// The resident shown on the detail screen.
pub fn detail_student() -> Student {
    student(12, "Іваненко Іван Іванович", "A-212", "ФІОТ", 2, "КП-12")
}

/// Items already issued to [`detail_student`].
pub fn detail_assignments() -> AssignmentLedger {
    let rows = [("Матрац", 1), ("Подушка", 1), ("Рушник", 2)]
        .into_iter()
        .zip(1..)
        .map(|((item, quantity), id)| AssignmentRow {
            id: RowId(id),
            item: item.to_owned(),
            quantity,
            issued_on: "2025-09-01".to_owned(),
            returned_on: None,
        })
        .collect();
    AssignmentLedger::with_rows(StudentId(12), rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_seed_ids_are_sequential() {
        let items = stock_items();
        assert_eq!(items.len(), 10);
        assert_eq!(items[0].id, ItemId(1));
        assert_eq!(items[9].id, ItemId(10));
        assert_eq!(items[9].name, "Дзеркало");
    }

    #[test]
    fn detail_ledger_has_three_active_rows() {
        let ledger = detail_assignments();
        assert_eq!(ledger.active_count(), 3);
        assert_eq!(ledger.student(), detail_student().id);
    }
}
