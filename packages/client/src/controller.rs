//! The click counter controller.
//!
//! Owns the local session state (entered name, current player) and the latest
//! snapshots delivered by the service. It never reads its own writes: every
//! change becomes visible only through a later query snapshot.

use std::sync::Arc;

use tapboard_server::infrastructure::dto::websocket::{
    PeerPresenceDto, PlayerDto, PlayerFieldsDto, PresenceDto, TxOpDto,
};

use crate::{
    config::ClickMode,
    leaderboard,
    service::{DataService, QueryState},
};

/// Per-session state machine; `NotJoined -> Joined` only
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NotJoined,
    Joined { player_id: String },
}

pub struct ClickCounter {
    service: Arc<dyn DataService>,
    click_mode: ClickMode,
    /// Contents of the name field, published through presence as typed
    player_name: String,
    session: SessionState,
    query: QueryState,
    color: String,
    cursor: Option<(f64, f64)>,
    peers: Vec<PeerPresenceDto>,
}

impl ClickCounter {
    pub fn new(service: Arc<dyn DataService>, click_mode: ClickMode, color: String) -> Self {
        Self {
            service,
            click_mode,
            player_name: String::new(),
            session: SessionState::NotJoined,
            query: QueryState::Loading,
            color,
            cursor: None,
            peers: Vec::new(),
        }
    }

    /// Edit the name field
    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player_name = name.into();
    }

    /// Submit the join form
    ///
    /// Creates a player with the trimmed name and 0 clicks and switches to
    /// `Joined`. Returns `false` without side effects when the name is blank
    /// or the session already joined.
    pub fn join_game(&mut self) -> bool {
        if matches!(self.session, SessionState::Joined { .. }) {
            return false;
        }
        let name = self.player_name.trim();
        if name.is_empty() {
            return false;
        }

        let player_id = uuid::Uuid::new_v4().to_string();
        let op = TxOpDto::update_player(
            player_id.clone(),
            PlayerFieldsDto {
                name: Some(name.to_string()),
                clicks: Some(0),
            },
        );
        if let Err(e) = self.service.transact(vec![op]) {
            tracing::warn!("Failed to queue join transaction: {}", e);
        }

        tracing::info!("Joined as '{}' ({})", name, player_id);
        self.session = SessionState::Joined { player_id };
        true
    }

    /// Register one click for the current player
    ///
    /// Silently dropped before joining, or while the current player is not in
    /// the latest snapshot. In [`ClickMode::Snapshot`] the written value is
    /// computed from that snapshot, so two clicks issued before it refreshes
    /// both write the same value and one click is lost.
    pub fn register_click(&mut self) -> bool {
        let SessionState::Joined { player_id } = &self.session else {
            return false;
        };
        let Some(current) = self.current_player() else {
            tracing::debug!("Current player not in snapshot yet, dropping click");
            return false;
        };

        let op = match self.click_mode {
            ClickMode::Snapshot => TxOpDto::update_player(
                player_id.clone(),
                PlayerFieldsDto {
                    name: None,
                    clicks: Some(leaderboard::clicks_or_zero(current).saturating_add(1)),
                },
            ),
            ClickMode::Atomic => TxOpDto::increment_clicks(player_id.clone(), 1),
        };
        if let Err(e) = self.service.transact(vec![op]) {
            tracing::warn!("Failed to queue click transaction: {}", e);
        }
        true
    }

    /// Replace the query state with the latest delivery
    pub fn apply_query(&mut self, state: QueryState) {
        if let QueryState::Failed(reason) = &state {
            tracing::error!("Player query failed: {}", reason);
        }
        self.query = state;
    }

    /// Replace the remote peers with the latest presence snapshot
    pub fn apply_peers(&mut self, peers: Vec<PeerPresenceDto>) {
        self.peers = peers;
    }

    /// Move the local cursor
    pub fn move_cursor(&mut self, x: f64, y: f64) {
        self.cursor = Some((x, y));
    }

    /// Payload published to the presence room
    pub fn presence(&self) -> PresenceDto {
        PresenceDto {
            name: self.player_name.clone(),
        }
    }

    /// The current player's record in the latest snapshot
    pub fn current_player(&self) -> Option<&PlayerDto> {
        let SessionState::Joined { player_id } = &self.session else {
            return None;
        };
        match &self.query {
            QueryState::Ready(players) => players.iter().find(|p| &p.id == player_id),
            _ => None,
        }
    }

    /// Players in leaderboard order, `None` while loading or failed
    pub fn leaderboard(&self) -> Option<Vec<&PlayerDto>> {
        match &self.query {
            QueryState::Ready(players) => Some(leaderboard::derive(players)),
            _ => None,
        }
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn cursor(&self) -> Option<(f64, f64)> {
        self.cursor
    }

    pub fn peers(&self) -> &[PeerPresenceDto] {
        &self.peers
    }
}
