//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of a room type or room id
pub const ROOM_KEY_MAX_LEN: usize = 100;

/// Player identifier value object.
///
/// Generated by the client when joining, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a new PlayerId.
    ///
    /// # Arguments
    ///
    /// * `id` - The player identifier string (UUID format)
    ///
    /// # Returns
    ///
    /// A Result containing the PlayerId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::PlayerIdEmpty);
        }
        let uuid =
            Uuid::parse_str(&id).map_err(|_| ValueObjectError::PlayerIdInvalidFormat(id.clone()))?;
        Ok(Self(uuid.hyphenated().to_string()))
    }

    /// Create a PlayerId from an already generated UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.hyphenated().to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Player display name.
///
/// Stored trimmed; whitespace-only names are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    /// Create a new PlayerName from user input.
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::PlayerNameEmpty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name a peer publishes through presence.
///
/// Unlike [`PlayerName`] it may be empty: peers publish whatever is typed
/// into the name field, including nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceName(String);

impl PresenceName {
    pub fn new(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Click counter of a player.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Clicks(u64);

impl Clicks {
    /// Create a new Clicks value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the inner value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Add `by` clicks, `None` on overflow.
    pub fn checked_add(self, by: u64) -> Option<Self> {
        self.0.checked_add(by).map(Self)
    }
}

impl fmt::Display for Clicks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one live connection in the presence registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(String);

impl PeerId {
    /// Create a new PeerId.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        let uuid =
            Uuid::parse_str(&id).map_err(|_| ValueObjectError::PeerIdInvalidFormat(id.clone()))?;
        Ok(Self(uuid.hyphenated().to_string()))
    }

    /// Create a PeerId from an already generated UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.hyphenated().to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Presence room key: a room type plus a room id, e.g. `cursor/123`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomKey {
    room_type: String,
    room_id: String,
}

impl RoomKey {
    /// Create a new RoomKey.
    pub fn new(room_type: String, room_id: String) -> Result<Self, ValueObjectError> {
        if room_type.is_empty() || room_id.is_empty() {
            return Err(ValueObjectError::RoomKeyEmpty);
        }
        for part in [&room_type, &room_id] {
            let len = part.chars().count();
            if len > ROOM_KEY_MAX_LEN {
                return Err(ValueObjectError::RoomKeyTooLong {
                    max: ROOM_KEY_MAX_LEN,
                    actual: len,
                });
            }
        }
        Ok(Self { room_type, room_id })
    }

    pub fn room_type(&self) -> &str {
        &self.room_type
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.room_type, self.room_id)
    }
}

/// Cursor color in `#rrggbb` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorColor(String);

impl CursorColor {
    /// Create a new CursorColor.
    pub fn new(color: String) -> Result<Self, ValueObjectError> {
        let valid = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(ValueObjectError::CursorColorInvalidFormat(color));
        }
        Ok(Self(color.to_ascii_lowercase()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CursorColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cursor position reported by a peer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
}

impl CursorPosition {
    /// Create a new CursorPosition. NaN and infinities are rejected.
    pub fn new(x: f64, y: f64) -> Result<Self, ValueObjectError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ValueObjectError::CursorPositionNotFinite);
        }
        Ok(Self { x, y })
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (JST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
