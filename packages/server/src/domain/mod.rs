//! Domain layer for the realtime service.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod transaction;
pub mod value_object;

pub use entity::{Peer, Player, PlayerChanges, PlayerTable};
pub use error::{PlayerError, RepositoryError, ValueObjectError};
pub use factory::{PeerIdFactory, PlayerIdFactory};
pub use repository::{
    PeerChange, PeerSender, PeerUpdate, PlayerRepository, PresenceRepository, RoomSnapshot,
};
pub use transaction::{Transaction, TxOperation};
pub use value_object::{
    Clicks, CursorColor, CursorPosition, PeerId, PlayerId, PlayerName, PresenceName, RoomKey,
    Timestamp,
};
