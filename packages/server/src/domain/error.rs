//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// PlayerId validation error
    #[error("PlayerId cannot be empty")]
    PlayerIdEmpty,

    /// PlayerId invalid format error (not a valid UUID format)
    #[error("PlayerId must be a valid UUID format (got: {0})")]
    PlayerIdInvalidFormat(String),

    /// PlayerName validation error
    #[error("PlayerName cannot be empty")]
    PlayerNameEmpty,

    /// PeerId invalid format error
    #[error("PeerId must be a valid UUID format (got: {0})")]
    PeerIdInvalidFormat(String),

    /// RoomKey validation error
    #[error("Room type and room id cannot be empty")]
    RoomKeyEmpty,

    /// RoomKey too long error
    #[error("Room key component cannot exceed {max} characters (got {actual})")]
    RoomKeyTooLong { max: usize, actual: usize },

    /// CursorColor invalid format error
    #[error("CursorColor must look like #rrggbb (got: {0})")]
    CursorColorInvalidFormat(String),

    /// CursorPosition non-finite coordinate error
    #[error("CursorPosition coordinates must be finite")]
    CursorPositionNotFinite,
}

/// Errors related to Player domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// A player record has to be created with a name
    #[error("Player '{0}' does not exist and the update carries no name")]
    NameRequired(String),

    /// Clicks can only grow
    #[error("Clicks of player '{id}' cannot decrease from {current} to {requested}")]
    ClicksDecreased {
        id: String,
        current: u64,
        requested: u64,
    },

    /// Increment target does not exist
    #[error("Player '{0}' not found")]
    NotFound(String),

    /// Clicks counter overflow
    #[error("Clicks of player '{0}' overflowed")]
    ClicksOverflow(String),

    /// Transaction without operations
    #[error("Transaction must contain at least one operation")]
    EmptyTransaction,
}

/// Errors raised by repository implementations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Transaction rejected by the domain model
    #[error("Transaction rejected: {0}")]
    Rejected(#[from] PlayerError),

    /// Presence peer not registered
    #[error("Peer '{0}' not found")]
    PeerNotFound(String),

    /// Presence peer already registered
    #[error("Peer '{0}' is already registered")]
    DuplicatePeer(String),

    /// Peer has not joined any room
    #[error("Peer '{0}' has not joined a room")]
    NotInRoom(String),
}
