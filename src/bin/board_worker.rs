//! Runs task board operations against a JSON workbook file.
//!
//! Usage:
//!
//! ```text
//! board_worker sweep <workbook-path>
//! board_worker dashboard <workbook-path>
//! board_worker check <workbook-path> <row>
//! board_worker uncheck <workbook-path> <row>
//! ```
//!
//! `sweep` archives tasks completed more than the grace period ago.
//! `dashboard` writes the live counts to stdout as JSON. `check` and
//! `uncheck` set the done box of a sheet row and update its completion stamp
//! the way an interactive edit would.
//!
//! When `TASKBOARD_CONFIG` names a JSON file, it is loaded as the board
//! configuration; otherwise defaults apply. A representative configuration
//! is:
//!
//! ```json
//! {
//!   "live_sheet": "TODO",
//!   "team_roster": ["Mario", "Luigi"],
//!   "grace_period_hours": 24,
//!   "utc_offset_minutes": 60,
//!   "schedule": { "weekday": "Sun", "hour": 23 }
//! }
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::DefaultClock;
use std::env;
use std::io::{self, Write};
use std::sync::Arc;
use taskboard::config::{BoardConfig, ConfigError};
use taskboard::task::{
    adapters::json::JsonWorkbookStore,
    domain::{CellValue, EditEvent, RowIndex},
    ports::{StoreError, TabularStore},
    services::{ArchivalSweeper, DashboardService, SweepError, TaskLifecycleController},
};
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::info;

const CONFIG_ENV: &str = "TASKBOARD_CONFIG";

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during worker operations.
#[derive(Debug, Error)]
enum WorkerError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("failed to read board config: {0}")]
    ConfigRead(#[source] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Sweep(#[from] SweepError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] io::Error),
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

#[derive(Debug)]
enum Operation {
    Sweep,
    Dashboard,
    Check(usize),
    Uncheck(usize),
}

impl Operation {
    fn parse(name: &str, row: Option<&str>) -> Result<Self, WorkerError> {
        let parse_row = || {
            row.ok_or_else(|| WorkerError::InvalidArgs(format!("{name} requires a row argument")))
                .and_then(|raw| {
                    raw.parse::<usize>().map_err(|_| {
                        WorkerError::InvalidArgs(format!("row '{raw}' is not a positive integer"))
                    })
                })
        };
        match name {
            "sweep" => Ok(Self::Sweep),
            "dashboard" => Ok(Self::Dashboard),
            "check" => parse_row().map(Self::Check),
            "uncheck" => parse_row().map(Self::Uncheck),
            other => Err(WorkerError::InvalidArgs(format!(
                "unknown operation '{other}'; expected sweep, dashboard, check, or uncheck"
            ))),
        }
    }

    const fn takes_row(&self) -> bool {
        matches!(self, Self::Check(_) | Self::Uncheck(_))
    }
}

fn main() -> Result<(), BoxError> {
    taskboard::telemetry::init();
    let args = collect_args()?;
    run_worker(args.into_iter()).map_err(Into::into)
}

fn collect_args() -> Result<Vec<String>, WorkerError> {
    env::args_os()
        .map(|arg_os| {
            arg_os
                .into_string()
                .map_err(|_| WorkerError::InvalidArgs("argument is not valid UTF-8".into()))
        })
        .collect()
}

fn parse_args(
    mut args: impl Iterator<Item = String>,
) -> Result<(Operation, Utf8PathBuf), WorkerError> {
    let _program = args.next();
    let name = args
        .next()
        .ok_or_else(|| WorkerError::InvalidArgs("missing operation argument".into()))?;
    let workbook_path = args
        .next()
        .map(Utf8PathBuf::from)
        .ok_or_else(|| WorkerError::InvalidArgs("missing workbook path argument".into()))?;
    let row = args.next();
    let operation = Operation::parse(&name, row.as_deref())?;
    if !operation.takes_row() {
        if let Some(extra) = row {
            return Err(WorkerError::InvalidArgs(format!(
                "unexpected extra argument: {extra}"
            )));
        }
    }
    if let Some(extra) = args.next() {
        return Err(WorkerError::InvalidArgs(format!(
            "unexpected extra argument: {extra}"
        )));
    }
    Ok((operation, workbook_path))
}

fn load_config() -> Result<BoardConfig, WorkerError> {
    let Some(path) = env::var_os(CONFIG_ENV) else {
        return Ok(BoardConfig::default());
    };
    let path = path
        .into_string()
        .map(Utf8PathBuf::from)
        .map_err(|_| WorkerError::InvalidArgs(format!("{CONFIG_ENV} is not valid UTF-8")))?;
    let contents = read_text(&path).map_err(WorkerError::ConfigRead)?;
    Ok(BoardConfig::from_json_str(&contents)?)
}

fn read_text(path: &Utf8Path) -> io::Result<String> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    Dir::open_ambient_dir(parent, ambient_authority())?.read_to_string(file_name)
}

fn run_worker(args: impl Iterator<Item = String>) -> Result<(), WorkerError> {
    let (operation, workbook_path) = parse_args(args)?;
    let config = Arc::new(load_config()?);
    let store = Arc::new(JsonWorkbookStore::open(&workbook_path)?);
    let clock = Arc::new(DefaultClock);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(WorkerError::RuntimeInit)?;
    runtime.block_on(async {
        match operation {
            Operation::Sweep => {
                let sweeper = ArchivalSweeper::new(store, clock, config);
                let report = sweeper.sweep().await?;
                info!(run_id = %report.run_id, archived = report.archived, "sweep complete");
                Ok(())
            }
            Operation::Dashboard => {
                let snapshot = DashboardService::new(store, config).snapshot().await?;
                let mut stdout = io::stdout().lock();
                serde_json::to_writer_pretty(&mut stdout, &snapshot)
                    .map_err(|err| WorkerError::Output(err.into()))?;
                writeln!(stdout).map_err(WorkerError::Output)
            }
            Operation::Check(row) => toggle(store, clock, config, row, true).await,
            Operation::Uncheck(row) => toggle(store, clock, config, row, false).await,
        }
    })
}

async fn toggle(
    store: Arc<JsonWorkbookStore>,
    clock: Arc<DefaultClock>,
    config: Arc<BoardConfig>,
    row: usize,
    done: bool,
) -> Result<(), WorkerError> {
    let row_index = RowIndex::new(row)
        .map_err(|err| WorkerError::InvalidArgs(err.to_string()))?;
    let sheet = config.live_sheet.clone();
    let done_column = config.layout.done;
    store
        .write_cell(&sheet, row_index, done_column, CellValue::Bool(done))
        .await?;
    let controller = TaskLifecycleController::new(store, clock, config);
    controller
        .handle_edit(&EditEvent::new(
            sheet.as_str(),
            row,
            done_column.get(),
            CellValue::Bool(done),
        ))
        .await;
    Ok(())
}
