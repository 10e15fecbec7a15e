//! Domain factories for generating identifiers.

use super::{PeerId, PlayerId};

/// Factory for generating PlayerId instances.
///
/// Players are normally created with an id generated on the client; the
/// server only generates ids in tests and tooling.
pub struct PlayerIdFactory;

impl PlayerIdFactory {
    /// Generate a new PlayerId with a random UUID v4.
    pub fn generate() -> PlayerId {
        PlayerId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for generating PeerId instances, one per WebSocket connection.
pub struct PeerIdFactory;

impl PeerIdFactory {
    /// Generate a new PeerId with a random UUID v4.
    pub fn generate() -> PeerId {
        PeerId::from_uuid(uuid::Uuid::new_v4())
    }
}
