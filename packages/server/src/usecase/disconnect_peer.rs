//! UseCase: ピア切断処理
//!
//! ピアをレジストリから削除し、参加していたルームの残りのピアへ通知を構築します。

use std::sync::Arc;

use crate::domain::{PeerId, PresenceRepository};

use super::{error::PresenceError, update_presence::room_notices, RoomNotice};

/// ピア切断のユースケース
pub struct DisconnectPeerUseCase {
    repository: Arc<dyn PresenceRepository>,
}

impl DisconnectPeerUseCase {
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self { repository }
    }

    /// ピア切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<RoomNotice>)` - 残りのピアへ送るスナップショット
    /// * `Err(PresenceError)` - 切断失敗（未登録のピア）
    pub async fn execute(&self, peer_id: &PeerId) -> Result<Vec<RoomNotice>, PresenceError> {
        let peer = self.repository.remove_peer(peer_id).await?;
        match peer.room {
            Some(room) => Ok(room_notices(self.repository.as_ref(), &room).await),
            None => Ok(Vec::new()),
        }
    }

    /// 残りのピア数を取得
    pub async fn count_remaining_peers(&self) -> usize {
        self.repository.count_peers().await
    }
}
