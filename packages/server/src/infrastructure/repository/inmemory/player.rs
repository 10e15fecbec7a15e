//! InMemory Player Repository 実装
//!
//! ドメイン層が定義する PlayerRepository trait の具体的な実装。
//! `PlayerTable` ドメインモデルをそのままストレージとして使用し、
//! コミットごとに `watch` チャンネルのリビジョンを進めます。

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};

use crate::domain::{
    Player, PlayerRepository, PlayerTable, RepositoryError, Timestamp, Transaction,
};

/// インメモリ Player Repository 実装
pub struct InMemoryPlayerRepository {
    /// PlayerTable ドメインモデル
    table: Mutex<PlayerTable>,
    /// 変更通知用のリビジョン
    revision: watch::Sender<u64>,
}

impl InMemoryPlayerRepository {
    /// 新しい InMemoryPlayerRepository を作成
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            table: Mutex::new(PlayerTable::new()),
            revision,
        }
    }
}

impl Default for InMemoryPlayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn list_players(&self) -> Result<Vec<Player>, RepositoryError> {
        let table = self.table.lock().await;
        Ok(table.players().to_vec())
    }

    async fn apply_transaction(
        &self,
        transaction: Transaction,
        now: Timestamp,
    ) -> Result<(), RepositoryError> {
        let mut table = self.table.lock().await;
        table.apply(&transaction, now)?;
        // Bump while still holding the lock so revisions follow commit order.
        self.revision.send_modify(|rev| *rev += 1);
        Ok(())
    }

    fn watch_revision(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}
