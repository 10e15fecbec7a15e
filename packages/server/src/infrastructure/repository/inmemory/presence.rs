//! InMemory Presence Repository 実装
//!
//! 接続中のピア（プレゼンス状態と WebSocket 送信チャンネル）を HashMap で保持します。
//! 切断されたピアの状態は保持しません。
//! ルームの状態を変える操作のたびにリビジョンを 1 進め、スナップショットに付与します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Peer, PeerChange, PeerId, PeerSender, PeerUpdate, PresenceRepository, RepositoryError, RoomKey,
    RoomSnapshot,
};

/// 接続中のピア情報
struct PeerEntry {
    peer: Peer,
    sender: PeerSender,
}

/// ロックで保護される状態
#[derive(Default)]
struct PresenceState {
    peers: HashMap<PeerId, PeerEntry>,
    revision: u64,
}

/// インメモリ Presence Repository 実装
#[derive(Default)]
pub struct InMemoryPresenceRepository {
    state: Mutex<PresenceState>,
}

impl InMemoryPresenceRepository {
    /// 新しい InMemoryPresenceRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresenceRepository for InMemoryPresenceRepository {
    async fn add_peer(&self, peer: Peer, sender: PeerSender) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        if state.peers.contains_key(&peer.id) {
            return Err(RepositoryError::DuplicatePeer(peer.id.to_string()));
        }
        state.peers.insert(peer.id.clone(), PeerEntry { peer, sender });
        Ok(())
    }

    async fn remove_peer(&self, peer_id: &PeerId) -> Result<Peer, RepositoryError> {
        let mut state = self.state.lock().await;
        let entry = state
            .peers
            .remove(peer_id)
            .ok_or_else(|| RepositoryError::PeerNotFound(peer_id.to_string()))?;
        state.revision += 1;
        Ok(entry.peer)
    }

    async fn update_peer(
        &self,
        peer_id: &PeerId,
        update: PeerUpdate,
    ) -> Result<PeerChange, RepositoryError> {
        let mut state = self.state.lock().await;
        let entry = state
            .peers
            .get_mut(peer_id)
            .ok_or_else(|| RepositoryError::PeerNotFound(peer_id.to_string()))?;
        let peer = &mut entry.peer;
        let previous_room = peer.room.clone();

        match update {
            PeerUpdate::JoinRoom { room, color } => {
                if previous_room.as_ref() != Some(&room) {
                    // Cursor positions do not carry over between rooms.
                    peer.cursor = None;
                }
                peer.room = Some(room);
                if color.is_some() {
                    peer.color = color;
                }
            }
            PeerUpdate::LeaveRoom => {
                if peer.room.is_none() {
                    return Err(RepositoryError::NotInRoom(peer_id.to_string()));
                }
                peer.room = None;
                peer.cursor = None;
            }
            PeerUpdate::Name(name) => peer.name = name,
            PeerUpdate::Cursor(position) => {
                if peer.room.is_none() {
                    return Err(RepositoryError::NotInRoom(peer_id.to_string()));
                }
                peer.cursor = Some(position);
            }
        }

        let change = PeerChange {
            peer: peer.clone(),
            previous_room,
        };
        state.revision += 1;
        Ok(change)
    }

    async fn room_snapshot(&self, room: &RoomKey) -> RoomSnapshot {
        let state = self.state.lock().await;
        let mut in_room: Vec<Peer> = state
            .peers
            .values()
            .filter(|entry| entry.peer.is_in(room))
            .map(|entry| entry.peer.clone())
            .collect();
        in_room.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        RoomSnapshot {
            revision: state.revision,
            peers: in_room,
        }
    }

    async fn sender(&self, peer_id: &PeerId) -> Option<PeerSender> {
        let state = self.state.lock().await;
        state.peers.get(peer_id).map(|entry| entry.sender.clone())
    }

    async fn count_peers(&self) -> usize {
        self.state.lock().await.peers.len()
    }
}
