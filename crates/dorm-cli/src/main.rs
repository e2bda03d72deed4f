// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `dorm`: command-line front end for dormitory stock, inventory counts,
//! residents and issued items.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

mod render;
mod session;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dorm_app_core::config::ConfigService;
use dorm_app_core::confirm::{AlwaysConfirm, ConfirmPort, NeverConfirm};
use dorm_app_core::prefs::{DormPrefs, ExportQuoting, PREFS_KEY};
use dorm_config_fs::FsConfigStore;
use dorm_ledger::{
    filter_options, page, ImportRequest, NewStudent, Roster, RosterFilter, StudentDetail,
    WarehouseState,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::session::Session;

#[derive(Parser, Debug)]
#[command(name = "dorm", version, about = "Dormitory administration tools")]
struct Cli {
    /// Directory holding saved preferences (defaults to the platform config dir).
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show warehouse stock with level flags and metrics.
    Stock {
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
        /// Add issued/total columns for the sample student's items.
        #[arg(long)]
        with_issued: bool,
    },
    /// List residents matching the filters.
    Roster {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        room: Option<String>,
        #[arg(long)]
        faculty: Option<String>,
        #[arg(long)]
        course: Option<String>,
        #[arg(long)]
        group: Option<String>,
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Add a resident to the sample roster and print the assigned id.
    AddStudent {
        #[arg(long)]
        name: String,
        #[arg(long)]
        room: String,
        #[arg(long, default_value = "")]
        faculty: String,
        /// Year of study; 0 when unknown.
        #[arg(long, default_value_t = 0)]
        course: u8,
        #[arg(long, default_value = "")]
        group: String,
    },
    /// Print combobox options for a roster field, filtered by `query`.
    Options {
        field: OptionField,
        query: Option<String>,
    },
    /// Record an inventory count of the current stock and write it as CSV.
    Export {
        /// Count date; defaults to today (UTC).
        #[arg(long)]
        date: Option<String>,
        /// Output directory; defaults to the saved `export_dir` or `.`.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Field quoting; defaults to the saved preference.
        #[arg(long)]
        quoting: Option<ExportQuoting>,
    },
    /// Select a spreadsheet of residents for import.
    Import { file: PathBuf },
    /// Show or change saved preferences.
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsAction>,
    },
    /// Run commands from stdin against one in-memory session.
    Session {
        /// Accept every confirmation prompt (declined otherwise).
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PrefsAction {
    /// Print the current preferences as JSON.
    Show,
    /// Set one preference.
    Set { key: String, value: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OptionField {
    Name,
    Room,
    Faculty,
    Course,
    Group,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn today() -> String {
    time::OffsetDateTime::now_utc().date().to_string()
}

fn config_service(dir: Option<&PathBuf>) -> Result<ConfigService<FsConfigStore>> {
    let store = match dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    }
    .context("open config store")?;
    Ok(ConfigService::new(store))
}

fn load_prefs(dir: Option<&PathBuf>) -> DormPrefs {
    match config_service(dir) {
        Ok(svc) => svc.load_or_default(PREFS_KEY),
        Err(err) => {
            warn!("{err:#}; using default preferences");
            DormPrefs::default()
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let prefs = load_prefs(cli.config_dir.as_ref());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Stock { json, with_issued } => {
            let warehouse = WarehouseState::seeded();
            let detail = with_issued.then(StudentDetail::seeded);
            let issued = detail.as_ref().map(StudentDetail::assignments);
            if json {
                let mut value = serde_json::json!({
                    "rows": warehouse.rows(),
                    "metrics": warehouse.metrics(),
                });
                if let Some(ledger) = issued {
                    value["allocations"] = serde_json::json!(warehouse
                        .stock()
                        .allocations(ledger.issued_units())
                        .into_iter()
                        .map(|(name, a)| serde_json::json!({
                            "name": name,
                            "issued": a.issued,
                            "total": a.total,
                            "available": a.available(),
                        }))
                        .collect::<Vec<_>>());
                }
                writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
            } else {
                writeln!(out, "{}", prefs.dormitory_name)?;
                writeln!(out, "{}", render::stock_table(&warehouse, issued))?;
                writeln!(out, "{}", render::metrics_lines(&warehouse.metrics()))?;
            }
        }
        Command::Roster {
            name,
            room,
            faculty,
            course,
            group,
            page: number,
            json,
        } => {
            let roster = Roster::seeded();
            let filter = RosterFilter {
                name,
                room,
                faculty,
                course,
                group,
            };
            let found = roster.search(&filter);
            let shown = page(&found, number, prefs.page_size);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(shown.rows)?)?;
            } else {
                writeln!(out, "{}", render::roster_table(&shown))?;
                writeln!(
                    out,
                    "Сторінка {} з {} (знайдено: {})",
                    shown.page,
                    shown.pages,
                    found.len()
                )?;
            }
        }
        Command::AddStudent {
            name,
            room,
            faculty,
            course,
            group,
        } => {
            let mut roster = Roster::seeded();
            let id = roster.add(NewStudent {
                full_name: name,
                room,
                faculty,
                course,
                group,
            })?;
            info!(%id, "student added");
            let added = roster.get(id)?;
            writeln!(out, "Додано: #{id} {} (кімната {})", added.full_name, added.room)?;
            writeln!(out, "Мешканців: {}", roster.students().len())?;
        }
        Command::Options { field, query } => {
            let roster = Roster::seeded();
            let options = match field {
                OptionField::Name => roster.name_options(),
                OptionField::Room => roster.room_options(),
                OptionField::Faculty => Roster::faculty_options(),
                OptionField::Course => Roster::course_options(),
                OptionField::Group => roster.group_options(),
            };
            for option in filter_options(&options, query.as_deref().unwrap_or("")) {
                writeln!(out, "{option}")?;
            }
        }
        Command::Export { date, out: dir, quoting } => {
            let mut warehouse = WarehouseState::seeded();
            warehouse.create_snapshot(date.unwrap_or_else(today));
            let file = warehouse.export_selected(quoting.unwrap_or(prefs.export_quoting))?;
            let dir = dir
                .or(prefs.export_dir)
                .unwrap_or_else(|| PathBuf::from("."));
            let path = file
                .write_to(&dir)
                .with_context(|| format!("write export into {}", dir.display()))?;
            info!(path = %path.display(), "inventory exported");
            writeln!(out, "{}", path.display())?;
        }
        Command::Import { file } => {
            let size = std::fs::metadata(&file)
                .with_context(|| format!("read {}", file.display()))?
                .len();
            let request = ImportRequest::from_path(file, size)?.submit();
            writeln!(out, "Вибрано: {}", request.label())?;
        }
        Command::Prefs { action } => {
            let svc = config_service(cli.config_dir.as_ref())?;
            match action.unwrap_or(PrefsAction::Show) {
                PrefsAction::Show => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&prefs)?)?;
                }
                PrefsAction::Set { key, value } => {
                    let mut prefs = prefs;
                    prefs.set(&key, &value)?;
                    svc.save(PREFS_KEY, &prefs)?;
                    writeln!(out, "{key} = {value}")?;
                }
            }
        }
        Command::Session { yes } => {
            let confirm: &dyn ConfirmPort = if yes { &AlwaysConfirm } else { &NeverConfirm };
            let mut session = Session::new(prefs, confirm, today());
            session.run(io::stdin().lock(), &mut out)?;
        }
    }
    Ok(())
}
