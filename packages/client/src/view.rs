//! Text rendering of the click counter.

use std::fmt::Write;

use crate::{
    controller::{ClickCounter, SessionState},
    leaderboard::clicks_or_zero,
    presence::describe_peer,
    service::QueryState,
};

pub const FAILURE_MESSAGE: &str = "Oops, something went wrong";

/// Render the whole view
///
/// A failed query replaces everything with [`FAILURE_MESSAGE`]. Loading only
/// affects the leaderboard section.
pub fn render(counter: &ClickCounter) -> String {
    if matches!(counter.query(), QueryState::Failed(_)) {
        return format!("{FAILURE_MESSAGE}\n");
    }

    let mut out = String::new();
    let _ = writeln!(out, "=== Click Counter Game ===");

    match counter.session() {
        SessionState::NotJoined => {
            let _ = writeln!(out, "Your Name: {}", counter.player_name());
            let _ = writeln!(out, "  /name <text> to type, /join to join the game");
        }
        SessionState::Joined { .. } => {
            let _ = writeln!(out, "Welcome, {}!", counter.player_name());
            let _ = writeln!(out, "  [ Click Me! ]  press Enter or /click");
        }
    }
    let _ = writeln!(out);

    match counter.leaderboard() {
        None => {
            let _ = writeln!(out, "Loading...");
        }
        Some(players) if players.is_empty() => {
            let _ = writeln!(out, "No players yet!");
        }
        Some(players) => {
            let _ = writeln!(out, "Leaderboard");
            let width = players
                .iter()
                .map(|p| p.name.chars().count())
                .max()
                .unwrap_or(0);
            for player in &players {
                let _ = writeln!(
                    out,
                    "  {:<width$}  {} clicks",
                    player.name,
                    clicks_or_zero(player)
                );
            }
        }
    }

    let total = match counter.query() {
        QueryState::Ready(players) => players.len(),
        _ => 0,
    };
    let _ = writeln!(out, "Total players: {total}");

    if !counter.peers().is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Cursors");
        for peer in counter.peers() {
            let _ = writeln!(out, "  {}", describe_peer(peer));
        }
    }

    out
}
