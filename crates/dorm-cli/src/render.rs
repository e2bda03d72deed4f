// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Table rendering for terminal output.

use comfy_table::Table;
use dorm_ledger::{
    AssignmentLedger, AssignmentRow, Page, Snapshot, SnapshotRecorder, StockLedger, Student,
    WarehouseMetrics, WarehouseState,
};

pub(crate) fn stock_table(warehouse: &WarehouseState, issued: Option<&AssignmentLedger>) -> Table {
    let mut table = Table::new();
    let mut header = vec!["ID", "Предмет", "Кількість", "Коригування", "Позначка"];
    if issued.is_some() {
        header.extend(["Видано", "Всього"]);
    }
    table.set_header(header);

    let allocations = issued.map(|l| warehouse.stock().allocations(l.issued_units()));
    for row in warehouse.rows() {
        let mut cells = vec![
            row.id.to_string(),
            row.name.clone(),
            row.quantity.to_string(),
            if row.editing == row.quantity {
                String::new()
            } else {
                row.editing.to_string()
            },
            row.level.badge().unwrap_or_default().to_owned(),
        ];
        if let Some(allocs) = &allocations {
            let alloc = allocs
                .iter()
                .find(|(name, _)| *name == row.name)
                .map(|(_, a)| *a)
                .unwrap_or_default();
            cells.push(alloc.issued.to_string());
            cells.push(alloc.total.to_string());
        }
        table.add_row(cells);
    }
    table
}

pub(crate) fn metrics_lines(metrics: &WarehouseMetrics) -> String {
    format!(
        "Всього одиниць на складі: {}\nНульових позицій: {}\nОстання інвентаризація: {}",
        metrics.total_units,
        metrics.zero_stock,
        metrics.last_inventory.as_deref().unwrap_or("—"),
    )
}

pub(crate) fn history_table(recorder: &SnapshotRecorder, selected: Option<&Snapshot>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["", "ID", "Дата", "Усього"]);
    for snap in recorder.history() {
        let marker = if selected.is_some_and(|s| s.id() == snap.id()) {
            "*"
        } else {
            ""
        };
        table.add_row(vec![
            marker.to_owned(),
            snap.id().to_string(),
            snap.date().to_owned(),
            snap.total().to_string(),
        ]);
    }
    table
}

pub(crate) fn snapshot_table(snapshot: &Snapshot) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Предмет", "Кількість (на дату)"]);
    for row in snapshot.rows() {
        table.add_row(vec![row.name.clone(), row.quantity.to_string()]);
    }
    table
}

pub(crate) fn assignment_table<'a>(rows: impl Iterator<Item = &'a AssignmentRow>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Предмет", "Кількість", "Видано", "Повернено"]);
    for row in rows {
        table.add_row(vec![
            row.id.to_string(),
            row.item.clone(),
            row.quantity.to_string(),
            row.issued_on.clone(),
            row.returned_on.clone().unwrap_or_default(),
        ]);
    }
    table
}

pub(crate) fn roster_table(page: &Page<'_, Student>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "ПІБ", "Кімната", "Факультет", "Курс", "Група"]);
    for s in page.rows {
        table.add_row(vec![
            s.id.to_string(),
            s.full_name.clone(),
            s.room.clone(),
            s.faculty.clone(),
            s.course.to_string(),
            s.group.clone(),
        ]);
    }
    table
}

/// Render the stock of a bare ledger (no drafts) as `name: qty` lines for logs.
pub(crate) fn stock_summary(stock: &StockLedger) -> String {
    stock
        .items()
        .iter()
        .map(|i| format!("{}: {}", i.name, i.quantity))
        .collect::<Vec<_>>()
        .join(", ")
}
