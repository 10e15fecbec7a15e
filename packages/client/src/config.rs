//! Command line configuration of the terminal client.

use clap::Parser;
use tapboard_shared::constants::{DEFAULT_APP_ID, DEFAULT_ROOM_ID, DEFAULT_ROOM_TYPE};

/// How a click is written to the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClickMode {
    /// Read the count from the latest snapshot and write `count + 1`.
    /// Clicks faster than the snapshot refresh can be lost.
    #[default]
    Snapshot,
    /// Ask the service to add 1 to the stored count.
    Atomic,
}

/// Click counter game in the terminal
#[derive(Debug, Clone, Parser)]
#[command(name = "tapboard-client", version, about)]
pub struct ClientConfig {
    /// Base WebSocket URL of the realtime service
    #[arg(long, default_value = "ws://127.0.0.1:8080")]
    pub url: String,

    /// Application identifier
    #[arg(long, default_value = DEFAULT_APP_ID)]
    pub app_id: String,

    /// Presence room type
    #[arg(long, default_value = DEFAULT_ROOM_TYPE)]
    pub room_type: String,

    /// Presence room id
    #[arg(long, default_value = DEFAULT_ROOM_ID)]
    pub room_id: String,

    /// Use server-side increments instead of writing `count + 1`
    #[arg(long)]
    pub atomic_clicks: bool,
}

impl ClientConfig {
    pub fn click_mode(&self) -> ClickMode {
        if self.atomic_clicks {
            ClickMode::Atomic
        } else {
            ClickMode::Snapshot
        }
    }

    /// Full WebSocket endpoint including the app id
    pub fn endpoint(&self) -> String {
        format!(
            "{}/ws?app_id={}",
            self.url.trim_end_matches('/'),
            self.app_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // テスト項目: 引数なしでは固定のルームとスナップショット方式が使われる
        let config = ClientConfig::parse_from(["tapboard-client"]);

        assert_eq!(config.room_type, "cursor");
        assert_eq!(config.room_id, "123");
        assert_eq!(config.click_mode(), ClickMode::Snapshot);
        assert_eq!(
            config.endpoint(),
            format!("ws://127.0.0.1:8080/ws?app_id={DEFAULT_APP_ID}")
        );
    }

    #[test]
    fn test_atomic_clicks_flag() {
        // テスト項目: --atomic-clicks でサーバー側加算方式になる
        let config = ClientConfig::parse_from([
            "tapboard-client",
            "--url",
            "ws://example.com:9000/",
            "--atomic-clicks",
        ]);

        assert_eq!(config.click_mode(), ClickMode::Atomic);
        assert!(config.endpoint().starts_with("ws://example.com:9000/ws?"));
    }
}
