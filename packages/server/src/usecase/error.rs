//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{PlayerError, RepositoryError, ValueObjectError};

/// トランザクション適用時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactError {
    /// 操作の値が不正
    #[error("Invalid operation: {0}")]
    InvalidOperation(#[from] ValueObjectError),

    /// ドメインルールにより拒否された
    #[error("{0}")]
    Rejected(#[from] PlayerError),

    /// ストアが利用できない
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<RepositoryError> for TransactError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Rejected(e) => Self::Rejected(e),
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}

/// クエリ評価時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<RepositoryError> for QueryError {
    fn from(error: RepositoryError) -> Self {
        Self::StoreUnavailable(error.to_string())
    }
}

/// プレゼンス操作時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PresenceError {
    /// 値が不正
    #[error("Invalid presence: {0}")]
    Invalid(#[from] ValueObjectError),

    /// ピアが登録されていない
    #[error("Peer '{0}' not found")]
    PeerNotFound(String),

    /// ピアが既に登録されている
    #[error("Peer '{0}' is already connected")]
    DuplicatePeer(String),

    /// ルームに参加していない
    #[error("Peer '{0}' has not joined a room")]
    NotInRoom(String),
}

impl From<RepositoryError> for PresenceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::DuplicatePeer(id) => Self::DuplicatePeer(id),
            RepositoryError::NotInRoom(id) => Self::NotInRoom(id),
            RepositoryError::PeerNotFound(id) => Self::PeerNotFound(id),
            other => Self::PeerNotFound(other.to_string()),
        }
    }
}
