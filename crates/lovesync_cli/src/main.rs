//! CLI smoke and inspection entry point.
//!
//! # Responsibility
//! - Verify `lovesync_core` linkage with deterministic output.
//! - Dump a stored room document for local debugging.
//!
//! Usage:
//! - `lovesync_cli` prints ping and version.
//! - `lovesync_cli inspect <db_path> <room_code>` prints the room as JSON
//!   plus a one-line board summary.

use lovesync_core::db::open_db;
use lovesync_core::view::board::board_view;
use lovesync_core::view::tracker::money_total;
use lovesync_core::{RoomFeed, RoomService, SqliteRoomRepository};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {
            println!("lovesync_core ping={}", lovesync_core::ping());
            println!("lovesync_core version={}", lovesync_core::core_version());
            ExitCode::SUCCESS
        }
        [command, db_path, code] if command == "inspect" => match inspect(db_path, code) {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                eprintln!("{message}");
                ExitCode::FAILURE
            }
        },
        _ => {
            eprintln!("usage: lovesync_cli [inspect <db_path> <room_code>]");
            ExitCode::from(2)
        }
    }
}

fn inspect(db_path: &str, code: &str) -> Result<(), String> {
    let conn = open_db(db_path).map_err(|err| format!("open failed: {err}"))?;
    let repo = SqliteRoomRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let service = RoomService::new(repo, Arc::new(RoomFeed::new()));

    let snapshot = service
        .get_room(code)
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("room not found: {}", code.trim().to_uppercase()))?;
    let json = serde_json::to_string_pretty(&snapshot.room).map_err(|err| err.to_string())?;
    println!("{json}");

    let board = board_view(&snapshot.room, service.now_ms(), service.policy());
    println!(
        "room={} revision={} stickies={} groceries_open={} todos={} goals={} balance_cents={}",
        snapshot.code,
        snapshot.revision,
        board.stickies.len(),
        board.unchecked_groceries,
        snapshot.room.todos.len(),
        snapshot.room.goals.len(),
        money_total(&snapshot.room)
    );
    Ok(())
}
