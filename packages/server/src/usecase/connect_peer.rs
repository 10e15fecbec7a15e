//! UseCase: ピア接続処理
//!
//! WebSocket 接続ごとに新しいピア ID を払い出し、プレゼンスレジストリへ登録します。

use std::sync::Arc;

use crate::domain::{Peer, PeerId, PeerIdFactory, PeerSender, PresenceRepository, Timestamp};

use super::error::PresenceError;

/// ピア接続のユースケース
pub struct ConnectPeerUseCase {
    repository: Arc<dyn PresenceRepository>,
}

impl ConnectPeerUseCase {
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self { repository }
    }

    /// ピア接続を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - このピアへのメッセージ送信チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(PeerId)` - 払い出したピア ID
    /// * `Err(PresenceError)` - 登録失敗
    pub async fn execute(&self, sender: PeerSender) -> Result<PeerId, PresenceError> {
        use tapboard_shared::time::get_jst_timestamp;

        let peer = Peer::new(
            PeerIdFactory::generate(),
            Timestamp::new(get_jst_timestamp()),
        );
        let peer_id = peer.id.clone();
        self.repository.add_peer(peer, sender).await?;
        Ok(peer_id)
    }
}
