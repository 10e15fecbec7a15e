//! UseCase: プレゼンス更新処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdatePresenceUseCase::execute() メソッド
//! - ルーム参加・名前の同期・カーソル移動・退室と、それに伴う通知対象の選定
//!
//! ### どのような状況を想定しているか
//! - 正常系：同じルームの他のピアへスナップショットが届く
//! - エッジケース：ルーム移動時は移動前のルームにも通知される
//! - 異常系：ルーム未参加のままカーソルを動かす

use std::sync::Arc;

use crate::domain::{Peer, PeerId, PeerUpdate, PresenceRepository, RoomKey};

use super::error::PresenceError;

/// 1 ピア宛てのプレゼンススナップショット
///
/// `peers` には宛先ピア自身は含まれない。
/// 受信側は `revision` が古い通知を無視する（配送順は保証されないため）。
#[derive(Debug, Clone, PartialEq)]
pub struct RoomNotice {
    pub recipient: PeerId,
    pub room: RoomKey,
    pub revision: u64,
    pub peers: Vec<Peer>,
}

/// ルーム内の全ピアに向けた通知を構築
pub(crate) async fn room_notices(
    repository: &dyn PresenceRepository,
    room: &RoomKey,
) -> Vec<RoomNotice> {
    let snapshot = repository.room_snapshot(room).await;
    let peers = &snapshot.peers;
    peers
        .iter()
        .map(|recipient| RoomNotice {
            recipient: recipient.id.clone(),
            room: room.clone(),
            revision: snapshot.revision,
            peers: peers
                .iter()
                .filter(|p| p.id != recipient.id)
                .cloned()
                .collect(),
        })
        .collect()
}

/// プレゼンス更新のユースケース
pub struct UpdatePresenceUseCase {
    repository: Arc<dyn PresenceRepository>,
}

impl UpdatePresenceUseCase {
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self { repository }
    }

    /// プレゼンス更新を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<RoomNotice>)` - 送信すべきスナップショット
    /// * `Err(PresenceError)` - 更新失敗
    pub async fn execute(
        &self,
        peer_id: &PeerId,
        update: PeerUpdate,
    ) -> Result<Vec<RoomNotice>, PresenceError> {
        let change = self.repository.update_peer(peer_id, update).await?;

        let mut rooms = Vec::new();
        if let Some(previous) = change.previous_room
            && change.peer.room.as_ref() != Some(&previous)
        {
            rooms.push(previous);
        }
        if let Some(current) = change.peer.room {
            rooms.push(current);
        }

        let mut notices = Vec::new();
        for room in &rooms {
            notices.extend(room_notices(self.repository.as_ref(), room).await);
        }
        Ok(notices)
    }
}
