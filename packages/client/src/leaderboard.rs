//! Leaderboard derivation.

use tapboard_server::infrastructure::dto::websocket::PlayerDto;

/// Click count of a player; a missing value counts as 0
pub fn clicks_or_zero(player: &PlayerDto) -> u64 {
    player.clicks.unwrap_or(0)
}

/// Players ordered by clicks, highest first
///
/// The sort is stable, so ties keep the order of the snapshot.
pub fn derive(players: &[PlayerDto]) -> Vec<&PlayerDto> {
    let mut ranked: Vec<&PlayerDto> = players.iter().collect();
    ranked.sort_by_key(|p| std::cmp::Reverse(clicks_or_zero(p)));
    ranked
}
