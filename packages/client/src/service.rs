//! Service seam between the controller and the realtime transport.

use tapboard_server::infrastructure::dto::websocket::{PlayerDto, TxOpDto};

use crate::error::ClientError;

/// State of the "all players" query as seen by the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState {
    /// No result delivered yet
    Loading,
    /// Latest snapshot, unordered
    Ready(Vec<PlayerDto>),
    /// The subscription failed; no retry is attempted
    Failed(String),
}

/// Write side of the realtime data service
///
/// Writes are fire-and-forget: `Ok` only means the transaction was queued,
/// its effect shows up in a later query snapshot.
#[cfg_attr(test, mockall::automock)]
pub trait DataService: Send + Sync {
    fn transact(&self, ops: Vec<TxOpDto>) -> Result<(), ClientError>;
}
