//! InMemory Repository 実装

mod player;
mod presence;

pub use player::InMemoryPlayerRepository;
pub use presence::InMemoryPresenceRepository;
