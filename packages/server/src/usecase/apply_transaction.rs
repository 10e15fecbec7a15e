//! UseCase: トランザクション適用処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ApplyTransactionUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：プレイヤー作成とクリック数更新
//! - 異常系：空のトランザクション、クリック数の減少
//! - エッジケース：古いスナップショットからの書き込み競合（更新の消失）

use std::sync::Arc;

use crate::domain::{PlayerRepository, Timestamp, Transaction, TxOperation};

use super::error::TransactError;

/// トランザクション適用のユースケース
pub struct ApplyTransactionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn PlayerRepository>,
}

impl ApplyTransactionUseCase {
    /// 新しい ApplyTransactionUseCase を作成
    pub fn new(repository: Arc<dyn PlayerRepository>) -> Self {
        Self { repository }
    }

    /// トランザクションを適用
    ///
    /// 全ての操作が適用されるか、どれも適用されないかのいずれか。
    ///
    /// # Returns
    ///
    /// * `Ok(())` - コミット成功（購読者へはリビジョン経由で通知される）
    /// * `Err(TransactError)` - 拒否
    pub async fn execute(&self, operations: Vec<TxOperation>) -> Result<(), TransactError> {
        use tapboard_shared::time::get_jst_timestamp;

        let transaction = Transaction::new(operations)?;
        let op_count = transaction.operations().len();
        self.repository
            .apply_transaction(transaction, Timestamp::new(get_jst_timestamp()))
            .await?;
        tracing::debug!("Committed transaction with {} operation(s)", op_count);
        Ok(())
    }
}
