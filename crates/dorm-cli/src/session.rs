// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Line-oriented session over the warehouse and student detail screens.
//!
//! Each input line is one user action. Outcomes are reported as notices after
//! the action; a failing action never aborts the session.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use dorm_app_core::confirm::ConfirmPort;
use dorm_app_core::notice::{NoticeKind, NoticeService};
use dorm_app_core::prefs::DormPrefs;
use dorm_ledger::{
    EvictionPolicy, ItemId, RowId, SnapshotId, StudentDetail, WarehouseState,
};
use tracing::debug;

use crate::render;

const HELP: &str = "\
set <id> <qty>        stage a quantity for a stock item
inc <id> | dec <id>   stage +1 / -1
save <id>             commit the staged quantity
stock                 show stock with metrics
snapshot [date]       record an inventory count (selects it)
history               list inventory counts
select <id>|none      change the selected count
show                  show the selected count
delete <id>           delete an inventory count (asks for confirmation)
export [dir]          write the selected count as CSV
items                 show items issued to the student
issue <item> <qty> [date]
return <row> [date]   mark an issued row as returned (asks for confirmation)
export-student [dir]  write the student's issued items as CSV
evict [--return-items]
refresh
help | quit";

/// A parsed session action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionCommand {
    Set(ItemId, i64),
    Inc(ItemId),
    Dec(ItemId),
    Save(ItemId),
    Stock,
    Snapshot(Option<String>),
    History,
    Select(Option<SnapshotId>),
    Show,
    Delete(SnapshotId),
    Export(Option<PathBuf>),
    Items,
    Issue {
        item: String,
        quantity: u32,
        date: Option<String>,
    },
    Return {
        row: RowId,
        date: Option<String>,
    },
    ExportStudent(Option<PathBuf>),
    Evict {
        return_items: bool,
    },
    Refresh,
    Help,
    Quit,
}

fn looks_like_date(token: &str) -> bool {
    let b = token.as_bytes();
    b.len() == 10
        && b.iter()
            .enumerate()
            .all(|(i, c)| if i == 4 || i == 7 { *c == b'-' } else { c.is_ascii_digit() })
}

fn arg<T: std::str::FromStr>(tokens: &[&str], idx: usize, what: &str) -> Result<T> {
    let raw = tokens
        .get(idx)
        .ok_or_else(|| anyhow!("missing {what}"))?;
    raw.parse()
        .map_err(|_| anyhow!("invalid {what}: `{raw}`"))
}

fn opt_string(tokens: &[&str], idx: usize) -> Option<String> {
    tokens.get(idx).map(|s| (*s).to_owned())
}

/// Parse one input line.
pub(crate) fn parse_line(line: &str) -> Result<SessionCommand> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, _)) = tokens.split_first() else {
        bail!("empty command");
    };
    let cmd = match head {
        "set" => SessionCommand::Set(ItemId(arg(&tokens, 1, "item id")?), arg(&tokens, 2, "quantity")?),
        "inc" => SessionCommand::Inc(ItemId(arg(&tokens, 1, "item id")?)),
        "dec" => SessionCommand::Dec(ItemId(arg(&tokens, 1, "item id")?)),
        "save" => SessionCommand::Save(ItemId(arg(&tokens, 1, "item id")?)),
        "stock" => SessionCommand::Stock,
        "snapshot" => SessionCommand::Snapshot(opt_string(&tokens, 1)),
        "history" => SessionCommand::History,
        "select" => match tokens.get(1) {
            Some(&"none") => SessionCommand::Select(None),
            _ => SessionCommand::Select(Some(SnapshotId(arg(&tokens, 1, "snapshot id")?))),
        },
        "show" => SessionCommand::Show,
        "delete" => SessionCommand::Delete(SnapshotId(arg(&tokens, 1, "snapshot id")?)),
        "export" => SessionCommand::Export(opt_string(&tokens, 1).map(PathBuf::from)),
        "items" => SessionCommand::Items,
        "issue" => {
            let mut rest = &tokens[1..];
            let mut date = None;
            if let Some((last, init)) = rest.split_last() {
                if looks_like_date(last) {
                    date = Some((*last).to_owned());
                    rest = init;
                }
            }
            let (qty, name) = rest
                .split_last()
                .ok_or_else(|| anyhow!("usage: issue <item> <qty> [date]"))?;
            let quantity = qty
                .parse()
                .map_err(|_| anyhow!("invalid quantity: `{qty}`"))?;
            let item = name.join(" ");
            if item.is_empty() {
                bail!("missing item name");
            }
            SessionCommand::Issue {
                item,
                quantity,
                date,
            }
        }
        "return" => SessionCommand::Return {
            row: RowId(arg(&tokens, 1, "row id")?),
            date: opt_string(&tokens, 2),
        },
        "export-student" => SessionCommand::ExportStudent(opt_string(&tokens, 1).map(PathBuf::from)),
        "evict" => SessionCommand::Evict {
            return_items: tokens.get(1) == Some(&"--return-items"),
        },
        "refresh" => SessionCommand::Refresh,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => bail!("unknown command `{other}` (try `help`)"),
    };
    Ok(cmd)
}

/// One interactive session; state lives only as long as this value.
pub(crate) struct Session<'a> {
    warehouse: WarehouseState,
    detail: StudentDetail,
    notices: NoticeService,
    prefs: DormPrefs,
    confirm: &'a dyn ConfirmPort,
    today: String,
}

impl<'a> Session<'a> {
    pub(crate) fn new(prefs: DormPrefs, confirm: &'a dyn ConfirmPort, today: String) -> Self {
        let ttl = Duration::from_secs(prefs.notice_ttl_secs.max(1));
        Self {
            warehouse: WarehouseState::seeded(),
            detail: StudentDetail::seeded(),
            notices: NoticeService::new(16, ttl),
            prefs,
            confirm,
            today,
        }
    }

    /// Process every line of `input`, writing results to `out`.
    pub(crate) fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("read session input")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_line(line) {
                Ok(SessionCommand::Quit) => break,
                Ok(cmd) => {
                    debug!(?cmd, "session command");
                    if let Err(err) = self.apply(cmd, out) {
                        self.notify(NoticeKind::Error, "Помилка", Some(format!("{err:#}")));
                    }
                }
                Err(err) => self.notify(NoticeKind::Error, "Невідома команда", Some(err.to_string())),
            }
            for notice in self.notices.drain(Instant::now()) {
                writeln!(out, "{notice}")?;
            }
        }
        out.flush()?;
        Ok(())
    }

    fn notify(&mut self, kind: NoticeKind, title: &str, body: Option<String>) {
        self.notices.push(kind, title, body, Instant::now());
    }

    fn date_or_today(&self, date: Option<String>) -> String {
        date.unwrap_or_else(|| self.today.clone())
    }

    fn export_dir(&self, dir: Option<PathBuf>) -> PathBuf {
        dir.or_else(|| self.prefs.export_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn apply<W: Write>(&mut self, cmd: SessionCommand, out: &mut W) -> Result<()> {
        match cmd {
            SessionCommand::Set(id, qty) => {
                let v = self.warehouse.stage(id, qty)?;
                writeln!(out, "{id}: {v} (не збережено)")?;
            }
            SessionCommand::Inc(id) => {
                let v = self.warehouse.increment(id)?;
                writeln!(out, "{id}: {v} (не збережено)")?;
            }
            SessionCommand::Dec(id) => {
                let v = self.warehouse.decrement(id)?;
                writeln!(out, "{id}: {v} (не збережено)")?;
            }
            SessionCommand::Save(id) => {
                let v = self.warehouse.save(id)?;
                self.notify(NoticeKind::Info, "Збережено", Some(format!("{id}: {v}")));
            }
            SessionCommand::Stock => {
                writeln!(out, "{}", render::stock_table(&self.warehouse, None))?;
                writeln!(out, "{}", render::metrics_lines(&self.warehouse.metrics()))?;
            }
            SessionCommand::Snapshot(date) => {
                let date = self.date_or_today(date);
                let id = self.warehouse.create_snapshot(date);
                let summary = self
                    .warehouse
                    .selected_snapshot()
                    .map(dorm_ledger::Snapshot::summary)
                    .unwrap_or_default();
                self.notify(
                    NoticeKind::Info,
                    "Інвентаризацію створено",
                    Some(format!("#{id} {summary}")),
                );
            }
            SessionCommand::History => {
                let selected = self.warehouse.selected_snapshot();
                writeln!(
                    out,
                    "{}",
                    render::history_table(self.warehouse.snapshots(), selected)
                )?;
            }
            SessionCommand::Select(id) => self.warehouse.select(id)?,
            SessionCommand::Show => match self.warehouse.selected_snapshot() {
                Some(snap) => {
                    writeln!(out, "Дата: {}  Усього: {}", snap.date(), snap.total())?;
                    writeln!(out, "{}", render::snapshot_table(snap))?;
                }
                None => writeln!(out, "Поки що немає вибраного запису.")?,
            },
            SessionCommand::Delete(id) => {
                if self.warehouse.delete_snapshot(id, self.confirm)? {
                    self.notify(NoticeKind::Info, "Інвентаризацію видалено", Some(format!("#{id}")));
                } else {
                    self.notify(NoticeKind::Warn, "Скасовано", None);
                }
            }
            SessionCommand::Export(dir) => {
                let file = self.warehouse.export_selected(self.prefs.export_quoting)?;
                let dir = self.export_dir(dir);
                let path = file
                    .write_to(&dir)
                    .with_context(|| format!("write export into {}", dir.display()))?;
                self.notify(NoticeKind::Info, "Експортовано", Some(path.display().to_string()));
            }
            SessionCommand::Items => {
                let ledger = self.detail.assignments();
                writeln!(out, "Активний ({})", ledger.active_count())?;
                writeln!(out, "{}", render::assignment_table(ledger.active()))?;
                writeln!(out, "Повернений ({})", ledger.returned_count())?;
                writeln!(out, "{}", render::assignment_table(ledger.returned()))?;
            }
            SessionCommand::Issue {
                item,
                quantity,
                date,
            } => {
                let date = self.date_or_today(date);
                let row = self
                    .detail
                    .issue(item, quantity, date, self.warehouse.stock_mut())?;
                self.notify(NoticeKind::Info, "Видано", Some(format!("рядок #{row}")));
            }
            SessionCommand::Return { row, date } => {
                let date = self.date_or_today(date);
                if self.detail.return_item(
                    row,
                    date,
                    self.warehouse.stock_mut(),
                    self.confirm,
                )? {
                    self.notify(NoticeKind::Info, "Повернено", Some(format!("рядок #{row}")));
                } else {
                    self.notify(NoticeKind::Warn, "Скасовано", None);
                }
            }
            SessionCommand::ExportStudent(dir) => {
                let file = self.detail.export(self.prefs.export_quoting);
                let dir = self.export_dir(dir);
                let path = file
                    .write_to(&dir)
                    .with_context(|| format!("write export into {}", dir.display()))?;
                self.notify(NoticeKind::Info, "Експортовано", Some(path.display().to_string()));
            }
            SessionCommand::Evict { return_items } => {
                let policy = if return_items {
                    EvictionPolicy::ReturnAll
                } else {
                    EvictionPolicy::Detach
                };
                let today = self.today.clone();
                match self
                    .detail
                    .evict(policy, &today, self.warehouse.stock_mut(), self.confirm)?
                {
                    Some(report) => {
                        debug!(stock = %render::stock_summary(self.warehouse.stock()), "stock after eviction");
                        self.notify(
                            NoticeKind::Info,
                            "Студента виселено",
                            Some(format!(
                                "повернено рядків: {}, одиниць на склад: {}",
                                report.returned.len(),
                                report.credited_units
                            )),
                        );
                        if !report.unmatched.is_empty() {
                            self.notify(
                                NoticeKind::Warn,
                                "Не знайдено на складі",
                                Some(report.unmatched.join(", ")),
                            );
                        }
                    }
                    None => self.notify(NoticeKind::Warn, "Скасовано", None),
                }
            }
            SessionCommand::Refresh => {
                self.warehouse.begin_refresh();
                writeln!(out, "Оновлення…")?;
                self.warehouse.finish_refresh();
            }
            SessionCommand::Help => writeln!(out, "{HELP}")?,
            SessionCommand::Quit => {}
        }
        Ok(())
    }
}
