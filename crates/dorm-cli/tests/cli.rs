// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! End-to-end checks of the `dorm` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dorm(config: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dorm").unwrap();
    cmd.arg("--config-dir").arg(config.path());
    cmd
}

#[test]
fn stock_lists_seed_items_and_metrics() {
    let config = TempDir::new().unwrap();
    dorm(&config)
        .arg("stock")
        .assert()
        .success()
        .stdout(predicate::str::contains("Матрац"))
        .stdout(predicate::str::contains("Всього одиниць на складі: 755"))
        .stdout(predicate::str::contains("Нульових позицій: 0"));
}

#[test]
fn stock_json_carries_allocations() {
    let config = TempDir::new().unwrap();
    let out = dorm(&config)
        .args(["stock", "--json", "--with-issued"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["metrics"]["total_units"], 755);
    assert_eq!(value["rows"].as_array().map(Vec::len), Some(10));
    let towel = value["allocations"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["name"] == "Рушник")
        .unwrap();
    assert_eq!(towel["issued"], 2);
    assert_eq!(towel["total"], 182);
    assert_eq!(towel["available"], 180);
}

#[test]
fn export_writes_bom_prefixed_csv() {
    let config = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    dorm(&config)
        .args(["export", "--date", "2025-10-01", "--out"])
        .arg(out_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("inventory_2025-10-01.csv"));

    let text = std::fs::read_to_string(out_dir.path().join("inventory_2025-10-01.csv")).unwrap();
    assert!(text.starts_with('\u{FEFF}'));
    let lines: Vec<&str> = text.trim_start_matches('\u{FEFF}').split('\n').collect();
    assert_eq!(lines[0], "Інвентаризація станом на 2025-10-01");
    assert_eq!(lines[1], "Предмет,Кількість");
    assert_eq!(lines[2], "Матрац,95");
    assert_eq!(lines.last(), Some(&"Усього,755"));
}

#[test]
fn import_rejects_unsupported_extension() {
    let config = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("students.pdf");
    std::fs::write(&pdf, b"%PDF").unwrap();
    dorm(&config)
        .arg("import")
        .arg(&pdf)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported import file"));

    let xlsx = dir.path().join("students.xlsx");
    std::fs::write(&xlsx, vec![0u8; 2048]).unwrap();
    dorm(&config)
        .arg("import")
        .arg(&xlsx)
        .assert()
        .success()
        .stdout(predicate::str::contains("students.xlsx (2.0 KB)"));
}

#[test]
fn roster_filters_by_faculty_and_pages() {
    let config = TempDir::new().unwrap();
    dorm(&config)
        .args(["roster", "--faculty", "іпса"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Петров Петро Петрович"))
        .stdout(predicate::str::contains("Іваненко").not())
        .stdout(predicate::str::contains("Сторінка 1 з 1 (знайдено: 1)"));
}

#[test]
fn options_are_filtered_by_query() {
    let config = TempDir::new().unwrap();
    dorm(&config)
        .args(["options", "faculty", "ф"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ФІОТ"))
        .stdout(predicate::str::contains("ІПСА").not());
}

#[test]
fn prefs_set_persists_between_runs() {
    let config = TempDir::new().unwrap();
    dorm(&config)
        .args(["prefs", "set", "page_size", "2"])
        .assert()
        .success();
    dorm(&config)
        .args(["prefs", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"page_size\": 2"));
    dorm(&config)
        .args(["roster"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Сторінка 1 з 4"));
    dorm(&config)
        .args(["prefs", "set", "page_size", "0"])
        .assert()
        .failure();
}

#[test]
fn session_runs_script_from_stdin() {
    let config = TempDir::new().unwrap();
    dorm(&config)
        .args(["session", "--yes"])
        .write_stdin("set 1 -5\nsave 1\nsnapshot 2025-01-01\nsnapshot 2025-01-02\ndelete 2\nhistory\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[info] Збережено: 1: 0"))
        .stdout(predicate::str::contains("#1 2025-01-01 • 660 од."))
        .stdout(predicate::str::contains("[info] Інвентаризацію видалено: #2"));
}

#[test]
fn session_declines_confirmations_by_default() {
    let config = TempDir::new().unwrap();
    dorm(&config)
        .arg("session")
        .write_stdin("return 1\nitems\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[warn] Скасовано"))
        .stdout(predicate::str::contains("Активний (3)"));
}

#[test]
fn session_eviction_brings_issued_units_back() {
    let config = TempDir::new().unwrap();
    dorm(&config)
        .args(["session", "--yes"])
        .write_stdin("issue Подушка 5\nstock\nevict --return-items\nstock\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Всього одиниць на складі: 750"))
        .stdout(predicate::str::contains("одиниць на склад: 9"))
        .stdout(predicate::str::contains("Всього одиниць на складі: 759"));
}

#[test]
fn add_student_assigns_next_id() {
    let config = TempDir::new().unwrap();
    dorm(&config)
        .args(["add-student", "--name", " Нова Студентка ", "--room", "210", "--course", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Додано: #8 Нова Студентка (кімната 210)"))
        .stdout(predicate::str::contains("Мешканців: 8"));
    dorm(&config)
        .args(["add-student", "--name", "Без Кімнати", "--room", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required field `room` is empty"));
}
