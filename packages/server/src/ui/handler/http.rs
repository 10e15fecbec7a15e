//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tapboard_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    domain::RoomKey,
    infrastructure::dto::{
        http::{PeerDetailDto, PlayerSummaryDto, RoomDetailDto},
        websocket::CursorDto,
    },
    ui::state::AppState,
    usecase::QueryPlayersUseCase,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Players in leaderboard order
pub async fn get_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PlayerSummaryDto>>, StatusCode> {
    let usecase = QueryPlayersUseCase::new(state.players.clone());
    let players = usecase.leaderboard().await.map_err(|e| {
        tracing::error!("Failed to list players: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let summaries = players
        .iter()
        .map(|p| PlayerSummaryDto {
            id: p.id.as_str().to_string(),
            name: p.name.as_str().to_string(),
            clicks: p.clicks.value(),
            created_at: timestamp_to_jst_rfc3339(p.created_at.value()),
            updated_at: timestamp_to_jst_rfc3339(p.updated_at.value()),
        })
        .collect();

    Ok(Json(summaries))
}

/// Peers currently in a presence room
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path((room_type, room_id)): Path<(String, String)>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room = RoomKey::new(room_type, room_id).map_err(|_| StatusCode::BAD_REQUEST)?;

    let peers = state.presence.room_snapshot(&room).await.peers;
    // Rooms only exist while someone is in them.
    if peers.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }

    let room_detail = RoomDetailDto {
        room_type: room.room_type().to_string(),
        room_id: room.room_id().to_string(),
        peers: peers
            .iter()
            .map(|p| PeerDetailDto {
                peer_id: p.id.as_str().to_string(),
                name: p.name.as_str().to_string(),
                color: p.color.as_ref().map(|c| c.as_str().to_string()),
                cursor: p.cursor.map(|c| CursorDto { x: c.x, y: c.y }),
                connected_at: timestamp_to_jst_rfc3339(p.connected_at.value()),
            })
            .collect(),
    };

    Ok(Json(room_detail))
}
