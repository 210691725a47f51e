//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `dragboard_core` linkage with deterministic output.
//! - Replay one scripted drag against a board loaded from JSON (or a built-in
//!   demo board) and print the committed result.

use dragboard_core::{
    device_viewport, init_logging, set_device_viewport, BoardConfig, DragSession, FixedAnchor,
    GestureEvent, LoggingConfig, Rect, Repository, SessionEffect, SourceColumn, SourceRow,
    Viewport,
};
use log::{info, warn};
use serde_json::{json, Value};
use std::process::ExitCode;

const COLUMN_WIDTH: f64 = 240.0;
const COLUMN_GAP: f64 = 16.0;
const ROW_HEIGHT: f64 = 64.0;
const MIN_COLUMN_HEIGHT: f64 = 480.0;

type Board = Repository<Value, Value>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    println!("dragboard_core ping={}", dragboard_core::ping());
    println!("dragboard_core version={}", dragboard_core::core_version());

    if let Err(err) = init_logging(&LoggingConfig {
        level: "info".to_string(),
        log_dir: None,
    }) {
        eprintln!("logging disabled: {err}");
    }

    let mut repo = match load_board(std::env::args().nth(1)) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let columns = repo.columns().len();
    set_device_viewport(Viewport::new(
        columns as f64 * (COLUMN_WIDTH + COLUMN_GAP) + COLUMN_GAP,
        MIN_COLUMN_HEIGHT,
    ));
    bind_grid(&mut repo);
    let measured = repo.measure_columns_layout().await;
    info!("event=cli_measure module=cli status=ok measured={measured} columns={columns}");

    match replay_drag(&mut repo).await {
        Some(summary) => println!("drag={summary}"),
        None => warn!("event=cli_drag module=cli status=skipped reason=board_too_small"),
    }

    match serde_json::to_string_pretty(repo.original_data()) {
        Ok(board) => {
            println!("{board}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: failed to encode board: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_board(path: Option<String>) -> Result<Board, String> {
    let Some(path) = path else {
        return Ok(Repository::new(demo_board()));
    };
    let json = std::fs::read_to_string(&path)
        .map_err(|err| format!("failed to read board `{path}`: {err}"))?;
    Repository::from_json_str(&json, BoardConfig::default()).map_err(|err| err.to_string())
}

fn demo_board() -> Vec<SourceColumn<Value, Value>> {
    vec![
        SourceColumn::with_id("todo", json!({ "name": "Todo" }))
            .with_row(SourceRow::with_id("t1", json!({ "name": "Write release notes" })))
            .with_row(SourceRow::with_id("t2", json!({ "name": "Fix flaky test" }))),
        SourceColumn::with_id("doing", json!({ "name": "Doing" }))
            .with_row(SourceRow::with_id("d1", json!({ "name": "Review PR" }))),
        SourceColumn::with_id("done", json!({ "name": "Done" })),
    ]
}

/// Places columns side by side and rows top to bottom.
fn bind_grid(repo: &mut Board) {
    let layout: Vec<(String, Vec<String>)> = repo
        .columns()
        .iter()
        .map(|column| {
            let rows = column.rows().iter().map(|row| row.id().to_string()).collect();
            (column.id().to_string(), rows)
        })
        .collect();

    for (column_index, (column_id, rows)) in layout.iter().enumerate() {
        let x = COLUMN_GAP + column_index as f64 * (COLUMN_WIDTH + COLUMN_GAP);
        let height = MIN_COLUMN_HEIGHT.max((rows.len() + 1) as f64 * ROW_HEIGHT);
        repo.update_column_ref(
            column_id,
            Some(FixedAnchor::shared(Rect::new(x, 0.0, COLUMN_WIDTH, height))),
        );
        for (row_index, row_id) in rows.iter().enumerate() {
            let rect = Rect::new(x, row_index as f64 * ROW_HEIGHT, COLUMN_WIDTH, ROW_HEIGHT);
            repo.update_row_ref(column_id, row_id, Some(FixedAnchor::shared(rect)));
        }
    }
}

/// Drags the first row of the first column below the last row of the second
/// column and releases it there.
async fn replay_drag(repo: &mut Board) -> Option<String> {
    let row_id = repo.columns().first()?.rows().first()?.id().to_string();
    let target = repo.columns().get(1)?.layout()?;

    let viewport = device_viewport().unwrap_or_default();
    let mut session = DragSession::new(repo.config().clone(), viewport);
    if !session.pick_up_row(repo, &row_id).await {
        return None;
    }

    let x = target.x + target.width / 2.0;
    let y = target.bottom() - ROW_HEIGHT / 2.0;
    if let SessionEffect::Scroll(request) = session.handle(repo, GestureEvent::Update { x, y }) {
        info!(
            "event=cli_scroll module=cli status=ok offset={}",
            request.offset
        );
        repo.measure_columns_layout().await;
    }

    match session.handle(repo, GestureEvent::End) {
        SessionEffect::Dropped(outcome) => Some(format!(
            "{} {}->{} index={}",
            outcome.item_id, outcome.from_column_id, outcome.to_column_id, outcome.index
        )),
        SessionEffect::None | SessionEffect::Scroll(_) => None,
    }
}
