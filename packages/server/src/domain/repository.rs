//! Repository traits
//!
//! Durable player records and ephemeral presence live behind two separate
//! interfaces even though both travel over the same WebSocket.

use async_trait::async_trait;
use tokio::sync::{mpsc::UnboundedSender, watch};

use super::{
    entity::{Peer, Player},
    error::RepositoryError,
    transaction::Transaction,
    value_object::{CursorColor, CursorPosition, PeerId, PresenceName, RoomKey, Timestamp},
};

/// Outbound message queue of one connection (serialized JSON frames)
pub type PeerSender = UnboundedSender<String>;

/// Durable store of the player table
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// All players in insertion order
    async fn list_players(&self) -> Result<Vec<Player>, RepositoryError>;

    /// Apply a transaction atomically and bump the revision on success
    async fn apply_transaction(
        &self,
        transaction: Transaction,
        now: Timestamp,
    ) -> Result<(), RepositoryError>;

    /// Revision counter, bumped after every committed transaction
    fn watch_revision(&self) -> watch::Receiver<u64>;
}

/// A change applied to a peer's presence
#[derive(Debug, Clone, PartialEq)]
pub enum PeerUpdate {
    JoinRoom {
        room: RoomKey,
        color: Option<CursorColor>,
    },
    LeaveRoom,
    Name(PresenceName),
    Cursor(CursorPosition),
}

/// Result of a presence update
#[derive(Debug, Clone, PartialEq)]
pub struct PeerChange {
    /// Peer after the update
    pub peer: Peer,
    /// Room the peer was in before the update
    pub previous_room: Option<RoomKey>,
}

/// Peers of one room as of a registry revision
///
/// The revision grows with every presence change, so of two snapshots the one
/// with the higher revision is the more recent.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSnapshot {
    pub revision: u64,
    pub peers: Vec<Peer>,
}

/// Volatile registry of connected peers
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// Register a freshly connected peer with its outbound queue
    async fn add_peer(&self, peer: Peer, sender: PeerSender) -> Result<(), RepositoryError>;

    /// Remove a peer, returning its last state
    async fn remove_peer(&self, peer_id: &PeerId) -> Result<Peer, RepositoryError>;

    /// Apply a presence update
    async fn update_peer(
        &self,
        peer_id: &PeerId,
        update: PeerUpdate,
    ) -> Result<PeerChange, RepositoryError>;

    /// Peers currently in the room, ordered by connection time
    async fn room_snapshot(&self, room: &RoomKey) -> RoomSnapshot;

    /// Outbound queue of a peer
    async fn sender(&self, peer_id: &PeerId) -> Option<PeerSender>;

    /// Number of connected peers
    async fn count_peers(&self) -> usize;
}
