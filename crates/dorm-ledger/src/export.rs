// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Delimited-text export of snapshots and issued-item ledgers.
//!
//! Documents start with a UTF-8 byte-order mark so spreadsheet tools pick the
//! right encoding, and lines are joined with `\n` without a trailing newline.
//!
//! With [`ExportQuoting::None`] fields are written verbatim: a value
//! containing `,`, `"` or a line break breaks the row structure. Use
//! [`ExportQuoting::Standard`] to get RFC 4180 quoting for such fields.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dorm_app_core::prefs::ExportQuoting;
use tracing::info;

use crate::assignment::AssignmentRow;
use crate::roster::Student;
use crate::snapshot::Snapshot;

/// Byte-order mark prefixed to every document.
pub const BOM: char = '\u{FEFF}';
/// Field separator.
pub const SEPARATOR: char = ',';
/// Declared MIME type of exported documents.
pub const CSV_MIME: &str = "text/csv;charset=utf-8";

/// A document ready to be saved or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Suggested file name.
    pub filename: String,
    /// Declared MIME type.
    pub mime: &'static str,
    /// Full document text including the BOM.
    pub contents: String,
}

impl ExportFile {
    /// Write the document into `dir` under its suggested name.
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, self.contents.as_bytes())?;
        info!(path = %path.display(), bytes = self.contents.len(), "export written");
        Ok(path)
    }

    /// Document lines without the BOM.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.contents.trim_start_matches(BOM).split('\n')
    }
}

fn field(value: &str, quoting: ExportQuoting) -> Cow<'_, str> {
    let needs_quotes = value.contains([SEPARATOR, '"', '\n', '\r']);
    match quoting {
        ExportQuoting::Standard if needs_quotes => {
            Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
        }
        _ => Cow::Borrowed(value),
    }
}

fn line<'a, I>(fields: I, quoting: ExportQuoting) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let sep = SEPARATOR.to_string();
    fields
        .into_iter()
        .map(|f| field(f, quoting))
        .collect::<Vec<_>>()
        .join(&sep)
}

fn document(lines: Vec<String>) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum::<usize>() + 3);
    out.push(BOM);
    out.push_str(&lines.join("\n"));
    out
}

/// Serialize a snapshot: heading, header, one line per row, totals.
pub fn snapshot_csv(snapshot: &Snapshot, quoting: ExportQuoting) -> String {
    let heading = format!("Інвентаризація станом на {}", snapshot.date());
    let total = snapshot.total().to_string();
    let mut lines = Vec::with_capacity(snapshot.rows().len() + 3);
    lines.push(line([heading.as_str()], quoting));
    lines.push(line(["Предмет", "Кількість"], quoting));
    for row in snapshot.rows() {
        let qty = row.quantity.to_string();
        lines.push(line([row.name.as_str(), qty.as_str()], quoting));
    }
    lines.push(line(["Усього", total.as_str()], quoting));
    document(lines)
}

/// Snapshot export named `inventory_<date>.csv`.
pub fn snapshot_file(snapshot: &Snapshot, quoting: ExportQuoting) -> ExportFile {
    ExportFile {
        filename: format!("inventory_{}.csv", snapshot.date()),
        mime: CSV_MIME,
        contents: snapshot_csv(snapshot, quoting),
    }
}

/// Serialize a student's issued rows: heading, header, one line per row.
/// Active rows leave the return column empty.
pub fn assignments_csv<'a, I>(student: &Student, rows: I, quoting: ExportQuoting) -> String
where
    I: IntoIterator<Item = &'a AssignmentRow>,
{
    let heading = format!("Майно студента: {} (кімната {})", student.full_name, student.room);
    let mut lines = vec![
        line([heading.as_str()], quoting),
        line(["Предмет", "Кількість", "Видано", "Повернено"], quoting),
    ];
    for row in rows {
        let qty = row.quantity.to_string();
        lines.push(line(
            [
                row.item.as_str(),
                qty.as_str(),
                row.issued_on.as_str(),
                row.returned_on.as_deref().unwrap_or(""),
            ],
            quoting,
        ));
    }
    document(lines)
}

/// Student export named `student_<id>_inventory.csv`.
pub fn assignments_file<'a, I>(student: &Student, rows: I, quoting: ExportQuoting) -> ExportFile
where
    I: IntoIterator<Item = &'a AssignmentRow>,
{
    ExportFile {
        filename: format!("student_{}_inventory.csv", student.id),
        mime: CSV_MIME,
        contents: assignments_csv(student, rows, quoting),
    }
}
