//! UseCase: プレイヤー一覧クエリ
//!
//! 「全プレイヤー」クエリの評価と、変更通知（リビジョン）の購読を提供します。

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{Player, PlayerRepository};

use super::error::QueryError;

/// プレイヤー一覧クエリのユースケース
pub struct QueryPlayersUseCase {
    repository: Arc<dyn PlayerRepository>,
}

impl QueryPlayersUseCase {
    pub fn new(repository: Arc<dyn PlayerRepository>) -> Self {
        Self { repository }
    }

    /// 全プレイヤーを挿入順で取得
    pub async fn execute(&self) -> Result<Vec<Player>, QueryError> {
        Ok(self.repository.list_players().await?)
    }

    /// クリック数の降順（同数は挿入順）で全プレイヤーを取得
    pub async fn leaderboard(&self) -> Result<Vec<Player>, QueryError> {
        let mut players = self.execute().await?;
        players.sort_by(|a, b| b.clicks.cmp(&a.clicks));
        Ok(players)
    }

    /// コミットごとに値が進むリビジョンを購読
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.repository.watch_revision()
    }
}
