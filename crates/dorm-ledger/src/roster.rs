// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Resident roster: listing, search filters, combobox options, pagination.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::LedgerError;
use crate::ident::{next_after, StudentId};

/// Extra room suggestions offered beyond rooms already occupied.
const EXTRA_ROOMS: [&str; 5] = ["201", "202", "203", "301", "302"];
/// Extra group suggestions offered beyond groups already present.
const EXTRA_GROUPS: [&str; 5] = ["ІН-31", "ЕК-22", "IC-12", "ФФ-21", "ФЛ-11"];
/// Faculty choices.
pub const FACULTIES: [&str; 7] = ["ФІОТ", "ІПСА", "ФММ", "ФТІ", "ФПМ", "ФЕЛ", "ФБМІ"];
/// Course choices.
pub const COURSES: [&str; 6] = ["1", "2", "3", "4", "5", "6"];

/// A resident record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Resident id.
    pub id: StudentId,
    /// Full name (surname first).
    pub full_name: String,
    /// Room number.
    pub room: String,
    /// Faculty abbreviation.
    pub faculty: String,
    /// Year of study.
    pub course: u8,
    /// Study group.
    pub group: String,
    /// Free-form notes.
    pub notes: String,
}

/// Add-student form payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewStudent {
    /// Required.
    pub full_name: String,
    /// Required.
    pub room: String,
    /// Faculty abbreviation.
    pub faculty: String,
    /// Year of study; 0 when left blank.
    pub course: u8,
    /// Study group.
    pub group: String,
}

/// Search filters; blank fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterFilter {
    /// Substring of the full name.
    pub name: Option<String>,
    /// Substring of the room.
    pub room: Option<String>,
    /// Substring of the faculty.
    pub faculty: Option<String>,
    /// Substring of the course number.
    pub course: Option<String>,
    /// Substring of the group.
    pub group: Option<String>,
}

fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match needle.map(str::trim) {
        None | Some("") => true,
        Some(q) => haystack.to_lowercase().contains(&q.to_lowercase()),
    }
}

impl RosterFilter {
    /// `true` when every non-blank filter field matches.
    pub fn matches(&self, s: &Student) -> bool {
        contains_ci(&s.full_name, self.name.as_deref())
            && contains_ci(&s.room, self.room.as_deref())
            && contains_ci(&s.faculty, self.faculty.as_deref())
            && contains_ci(&s.course.to_string(), self.course.as_deref())
            && contains_ci(&s.group, self.group.as_deref())
    }
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Rows on this page.
    pub rows: &'a [T],
    /// 1-based page number actually shown.
    pub page: usize,
    /// Number of pages (at least 1).
    pub pages: usize,
}

/// Slice `rows` into 1-based pages; out-of-range requests clamp.
pub fn page<T>(rows: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let size = page_size.max(1);
    let pages = rows.len().div_ceil(size).max(1);
    let page = page.clamp(1, pages);
    let start = (page - 1) * size;
    let end = (start + size).min(rows.len());
    Page {
        rows: &rows[start.min(end)..end],
        page,
        pages,
    }
}

/// Combobox filtering: trimmed, case-insensitive substring; blank returns all.
pub fn filter_options<'a>(options: &'a [String], query: &str) -> Vec<&'a str> {
    let q = query.trim().to_lowercase();
    options
        .iter()
        .map(String::as_str)
        .filter(|o| q.is_empty() || o.to_lowercase().contains(&q))
        .collect()
}

fn dedup_in_order<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.iter().any(|o| o == v) {
            out.push(v.to_owned());
        }
    }
    out
}

/// In-memory list of residents.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    /// Roster from explicit records.
    pub fn new(students: Vec<Student>) -> Self {
        Self { students }
    }

    /// Roster with the sample residents.
    pub fn seeded() -> Self {
        Self::new(crate::seed::residents())
    }

    /// All residents in insertion order.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Resident by id.
    pub fn get(&self, id: StudentId) -> Result<&Student, LedgerError> {
        self.students
            .iter()
            .find(|s| s.id == id)
            .ok_or(LedgerError::UnknownStudent(id))
    }

    /// Residents matching `filter`.
    pub fn search(&self, filter: &RosterFilter) -> Vec<Student> {
        self.students
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect()
    }

    /// Add a resident from the form; name and room are required.
    pub fn add(&mut self, form: NewStudent) -> Result<StudentId, LedgerError> {
        let full_name = form.full_name.trim();
        if full_name.is_empty() {
            return Err(LedgerError::MissingField("full_name"));
        }
        let room = form.room.trim();
        if room.is_empty() {
            return Err(LedgerError::MissingField("room"));
        }
        let id = next_after(self.students.iter().map(|s| s.id.value()), StudentId);
        self.students.push(Student {
            id,
            full_name: full_name.to_owned(),
            room: room.to_owned(),
            faculty: form.faculty.trim().to_owned(),
            course: form.course,
            group: form.group.trim().to_owned(),
            notes: String::new(),
        });
        info!(student = %id, "student added");
        Ok(id)
    }

    /// Distinct names, first-seen order.
    pub fn name_options(&self) -> Vec<String> {
        dedup_in_order(self.students.iter().map(|s| s.full_name.as_str()))
    }

    /// Distinct occupied rooms followed by the fixed extra rooms.
    pub fn room_options(&self) -> Vec<String> {
        let mut out = dedup_in_order(self.students.iter().map(|s| s.room.as_str()));
        out.extend(EXTRA_ROOMS.iter().map(|r| (*r).to_owned()));
        out
    }

    /// Distinct groups followed by the fixed extra groups.
    pub fn group_options(&self) -> Vec<String> {
        let mut out = dedup_in_order(self.students.iter().map(|s| s.group.as_str()));
        out.extend(EXTRA_GROUPS.iter().map(|g| (*g).to_owned()));
        out
    }

    /// Fixed faculty list.
    pub fn faculty_options() -> Vec<String> {
        FACULTIES.iter().map(|f| (*f).to_owned()).collect()
    }

    /// Fixed course list.
    pub fn course_options() -> Vec<String> {
        COURSES.iter().map(|c| (*c).to_owned()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_options_are_deduped() {
        let roster = Roster::seeded();
        let names = roster.name_options();
        assert_eq!(names.len(), 6);
        assert_eq!(names.iter().filter(|n| *n == "Приклад Студент").count(), 1);
    }

    #[test]
    fn room_options_keep_extras_after_roster_values() {
        let rooms = Roster::seeded().room_options();
        assert_eq!(&rooms[..5], ["101", "102", "103", "104", "105"]);
        assert_eq!(&rooms[5..], EXTRA_ROOMS);
    }

    #[test]
    fn combobox_filter_is_case_insensitive() {
        let opts = Roster::faculty_options();
        assert_eq!(filter_options(&opts, "  фі "), ["ФІОТ"]);
        assert_eq!(filter_options(&opts, "").len(), FACULTIES.len());
        assert!(filter_options(&opts, "zzz").is_empty());
    }

    #[test]
    fn search_combines_filters() {
        let roster = Roster::seeded();
        let filter = RosterFilter {
            faculty: Some("фіот".into()),
            course: Some("4".into()),
            ..RosterFilter::default()
        };
        let hits = roster.search(&filter);
        let ids: Vec<_> = hits.iter().map(|s| s.id.value()).collect();
        assert_eq!(ids, [4, 5]);
    }

    #[test]
    fn add_requires_name_and_room() {
        let mut roster = Roster::seeded();
        assert_eq!(
            roster.add(NewStudent {
                room: "201".into(),
                ..NewStudent::default()
            }),
            Err(LedgerError::MissingField("full_name"))
        );
        assert_eq!(
            roster.add(NewStudent {
                full_name: "Нова Студентка".into(),
                room: "  ".into(),
                ..NewStudent::default()
            }),
            Err(LedgerError::MissingField("room"))
        );
        let id = roster
            .add(NewStudent {
                full_name: " Нова Студентка ".into(),
                room: "201".into(),
                faculty: "ФПМ".into(),
                course: 1,
                group: "КП-11".into(),
            })
            .unwrap();
        assert_eq!(id, StudentId(8));
        assert_eq!(roster.get(id).map(|s| s.full_name.as_str()), Ok("Нова Студентка"));
    }

    #[test]
    fn paging_clamps() {
        let rows: Vec<u32> = (1..=7).collect();
        let p = page(&rows, 2, 3);
        assert_eq!(p.rows, [4, 5, 6]);
        assert_eq!(p.pages, 3);
        let last = page(&rows, 99, 3);
        assert_eq!(last.page, 3);
        assert_eq!(last.rows, [7]);
        let empty: Vec<u32> = Vec::new();
        let p = page(&empty, 1, 10);
        assert!(p.rows.is_empty());
        assert_eq!(p.pages, 1);
    }
}
