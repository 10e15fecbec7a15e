//! Well-known defaults shared by the server and the client.

/// Application identifier the client connects with unless overridden.
pub const DEFAULT_APP_ID: &str = "00b7eeac-4f11-4095-8df4-0d037679c915";

/// Room type used for cursor presence.
pub const DEFAULT_ROOM_TYPE: &str = "cursor";

/// Room id used for cursor presence. Every client shares this room.
pub const DEFAULT_ROOM_ID: &str = "123";

/// Default bind host of the realtime service.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port of the realtime service.
pub const DEFAULT_PORT: u16 = 8080;
