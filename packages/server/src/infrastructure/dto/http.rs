//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::CursorDto;

/// Player entry of the leaderboard endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSummaryDto {
    pub id: String,
    pub name: String,
    pub clicks: u64,
    pub created_at: String, // ISO 8601
    pub updated_at: String, // ISO 8601
}

/// Room detail for the presence room endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub room_type: String,
    pub room_id: String,
    pub peers: Vec<PeerDetailDto>,
}

/// Peer detail for room detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerDetailDto {
    pub peer_id: String,
    pub name: String,
    pub color: Option<String>,
    pub cursor: Option<CursorDto>,
    pub connected_at: String, // ISO 8601
}
