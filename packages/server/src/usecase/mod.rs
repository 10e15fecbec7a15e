//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod apply_transaction;
pub mod connect_peer;
pub mod disconnect_peer;
pub mod error;
pub mod query_players;
pub mod update_presence;

pub use apply_transaction::ApplyTransactionUseCase;
pub use connect_peer::ConnectPeerUseCase;
pub use disconnect_peer::DisconnectPeerUseCase;
pub use error::{PresenceError, QueryError, TransactError};
pub use query_players::QueryPlayersUseCase;
pub use update_presence::{RoomNotice, UpdatePresenceUseCase};
