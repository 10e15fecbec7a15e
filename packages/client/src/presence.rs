//! Local presence: cursor color and remote cursor display.

use rand::Rng;
use tapboard_server::infrastructure::dto::websocket::PeerPresenceDto;

/// Color used for peers that did not publish one
pub const FALLBACK_COLOR: &str = "gray";

/// Random dark `#rrggbb` color, each channel below 200
pub fn random_dark_color() -> String {
    let mut rng = rand::thread_rng();
    let [r, g, b]: [u8; 3] = std::array::from_fn(|_| rng.gen_range(0..200));
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// One remote cursor line of the view
pub fn describe_peer(peer: &PeerPresenceDto) -> String {
    let name = if peer.presence.name.is_empty() {
        "(anonymous)"
    } else {
        peer.presence.name.as_str()
    };
    let color = peer.color.as_deref().unwrap_or(FALLBACK_COLOR);
    match peer.cursor {
        Some(cursor) => format!("{name} {color} @ ({}, {})", cursor.x, cursor.y),
        None => format!("{name} {color}"),
    }
}
