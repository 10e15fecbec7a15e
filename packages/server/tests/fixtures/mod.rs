//! Test fixtures: an in-process server bound to an ephemeral port.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use tapboard_server::{
    infrastructure::dto::websocket::{ClientMessage, ServerMessage},
    serve,
    ui::state::AppState,
};
use tokio::{net::TcpStream, sync::oneshot};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub const TEST_APP_ID: &str = "test-app";

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let state = Arc::new(AppState::in_memory(TEST_APP_ID));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            serve(listener, state, async {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Test server failed");
        });

        Self {
            addr,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, app_id: &str) -> String {
        format!("ws://{}/ws?app_id={}", self.addr, app_id)
    }

    /// Connect with the test app id and return the socket plus the peer id
    pub async fn connect(&self) -> (WsStream, String) {
        let (mut ws, _) = connect_async(self.ws_url(TEST_APP_ID))
            .await
            .expect("Failed to connect");
        match next_message(&mut ws).await {
            ServerMessage::Connected { peer_id } => (ws, peer_id),
            other => panic!("expected connected message, got {other:?}"),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn send(ws: &mut WsStream, message: &ClientMessage) {
    let json = serde_json::to_string(message).expect("Failed to serialize");
    ws.send(Message::text(json)).await.expect("Failed to send");
}

/// Next protocol message, failing the test after 5 seconds
pub async fn next_message(ws: &mut WsStream) -> ServerMessage {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("Timed out waiting for a message")
            .expect("Connection closed")
            .expect("WebSocket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).expect("Failed to parse server message");
        }
    }
}

/// Skip messages until one matches `predicate`
pub async fn wait_for<F>(ws: &mut WsStream, mut predicate: F) -> ServerMessage
where
    F: FnMut(&ServerMessage) -> bool,
{
    loop {
        let message = next_message(ws).await;
        if predicate(&message) {
            return message;
        }
    }
}

/// Fail if any protocol message arrives within 300 ms
pub async fn assert_silent(ws: &mut WsStream) {
    loop {
        match tokio::time::timeout(Duration::from_millis(300), ws.next()).await {
            Err(_) => return,
            Ok(Some(Ok(Message::Text(text)))) => panic!("unexpected message: {}", text.as_str()),
            Ok(Some(Ok(_))) => continue,
            Ok(other) => panic!("connection ended: {other:?}"),
        }
    }
}
