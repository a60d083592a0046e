//! End-to-end flows from checkbox edits through weekly sweeps.

use super::helpers::{Board, config, descriptions, start_of_scenario};
use eyre::{Result, ensure};
use rstest::rstest;
use taskboard::config::BoardConfig;
use taskboard::task::{
    domain::{ArchiveRecord, DashboardSnapshot, Priority, SheetName, TaskRecord},
    ports::TabularStore,
};

fn october() -> Result<SheetName> {
    Ok(SheetName::new("Archive_October_2023")?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn checked_task_is_archived_after_the_grace_period(config: BoardConfig) -> Result<()> {
    let board = Board::empty(config).await?;
    let row = board
        .add_task(
            TaskRecord::new("Order toner")
                .with_priority(Priority::Medium)
                .with_assignee("Luigi"),
        )
        .await?;

    board.set_done(row, true).await?;
    let stamped = board.live_tasks().await?;
    ensure!(
        stamped.first().and_then(TaskRecord::completed_at) == Some(start_of_scenario()),
        "checking the box should stamp the current time"
    );

    board.clock.advance_hours(23);
    let early = board.sweeper.sweep().await?;
    ensure!(early.archived == 0, "task must stay during the grace period");

    board.clock.advance_hours(2);
    let due = board.sweeper.sweep().await?;
    ensure!(due.archived == 1, "task should move once the grace period passes");
    ensure!(board.live_tasks().await?.is_empty(), "live table should be empty");

    let rows = board.store.read_all_rows(&october()?).await?;
    let archived: Vec<ArchiveRecord> = rows
        .iter()
        .filter_map(|row| ArchiveRecord::from_row(row))
        .collect();
    ensure!(archived.len() == 1, "expected one archived row");
    let record = archived.first().ok_or_else(|| eyre::eyre!("missing row"))?;
    ensure!(record.description() == "Order toner", "description preserved");
    ensure!(record.priority() == Some(Priority::Medium), "priority preserved");
    ensure!(record.assignee() == Some("Luigi"), "assignee preserved");
    ensure!(
        record.completed_at() == start_of_scenario(),
        "completion date preserved"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unchecking_before_the_sweep_keeps_the_task(config: BoardConfig) -> Result<()> {
    let board = Board::empty(config).await?;
    let row = board.add_task(TaskRecord::new("Book venue")).await?;

    board.set_done(row, true).await?;
    board.clock.advance_hours(12);
    board.set_done(row, false).await?;
    board.clock.advance_hours(48);
    let report = board.sweeper.sweep().await?;

    ensure!(report.archived == 0, "unchecked task must not be archived");
    let tasks = board.live_tasks().await?;
    let task = tasks.first().ok_or_else(|| eyre::eyre!("task missing"))?;
    ensure!(!task.is_done(), "task should be open");
    ensure!(task.completed_at().is_none(), "stamp should be cleared");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rechecking_restarts_the_grace_period(config: BoardConfig) -> Result<()> {
    let board = Board::empty(config).await?;
    let row = board.add_task(TaskRecord::new("Renew licence")).await?;

    board.set_done(row, true).await?;
    board.clock.advance_hours(20);
    board.set_done(row, false).await?;
    board.set_done(row, true).await?;
    board.clock.advance_hours(20);

    let report = board.sweeper.sweep().await?;

    ensure!(
        report.archived == 0,
        "re-checked task is only 20 hours old and must stay"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dashboard_tracks_the_table_through_a_sweep(config: BoardConfig) -> Result<()> {
    let board = Board::empty(config).await?;
    board
        .add_task(TaskRecord::new("Fix outage").with_priority(Priority::High))
        .await?;
    board
        .add_task(TaskRecord::new("Tidy wiki").with_priority(Priority::Low))
        .await?;
    let finished = board
        .add_task(TaskRecord::new("Ship patch").with_priority(Priority::High))
        .await?;
    board.set_done(finished, true).await?;

    let before = board.dashboard.snapshot().await?;
    ensure!(
        before
            == DashboardSnapshot {
                open: 2,
                urgent_open: 1,
                done_pending_archive: 1,
            },
        "unexpected counts before the sweep: {before:?}"
    );

    board.clock.advance_hours(30);
    board.sweeper.sweep().await?;
    let after = board.dashboard.snapshot().await?;

    ensure!(after.open == 2, "open tasks are never archived");
    ensure!(after.done_pending_archive == 0, "archived task no longer counts");
    ensure!(
        descriptions(&board.live_tasks().await?) == ["Fix outage", "Tidy wiki"],
        "live order preserved"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_month_follows_the_configured_offset() -> Result<()> {
    let config = BoardConfig {
        utc_offset_minutes: 14 * 60,
        ..BoardConfig::default()
    };
    let board = Board::empty(config).await?;
    board.clock.advance_hours(24 * 13);
    let row = board.add_task(TaskRecord::new("Close books")).await?;

    // 2023-10-31 12:00 UTC is already 1 November at UTC+14.
    board.set_done(row, true).await?;
    board.clock.advance_hours(25);
    board.sweeper.sweep().await?;

    let november = SheetName::new("Archive_November_2023")?;
    ensure!(
        board.store.has_sheet(&november).await?,
        "task should land in the November archive"
    );
    ensure!(
        !board.store.has_sheet(&october()?).await?,
        "no October archive expected"
    );
    Ok(())
}
