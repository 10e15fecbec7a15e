//! WebSocket connection to the realtime service.
//!
//! One socket carries both the durable-data traffic (query subscription and
//! transactions) and presence. A reader task routes incoming frames to the
//! live [`QuerySubscription`] and [`RoomHandle`]; a writer task drains the
//! outbound queue. Dropping a handle unsubscribes or leaves the room.

use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use tapboard_server::infrastructure::dto::websocket::{
    ClientMessage, Namespace, PeerPresenceDto, PresenceDto, ServerMessage, TxOpDto,
};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::{
    error::ClientError,
    service::{DataService, QueryState},
};

enum Outbound {
    Message(ClientMessage),
    Close,
}

/// Where incoming snapshots go
#[derive(Default)]
struct Routes {
    query: Option<UnboundedSender<QueryState>>,
    room: Option<RoomRoute>,
}

struct RoomRoute {
    tx: UnboundedSender<Vec<PeerPresenceDto>>,
    /// Revision of the newest snapshot forwarded so far
    revision: Option<u64>,
}

/// Connected client of the realtime service
pub struct RealtimeClient {
    peer_id: String,
    outbound: UnboundedSender<Outbound>,
    routes: Arc<Mutex<Routes>>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl RealtimeClient {
    /// Connect to `endpoint` (`ws://host:port/ws?app_id=...`)
    ///
    /// Waits for the service's `connected` frame before returning.
    pub async fn connect(endpoint: &str) -> Result<Self, ClientError> {
        let (socket, _) = connect_async(endpoint).await?;
        let (mut sink, mut stream) = socket.split();

        let peer_id = loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ServerMessage>(text.as_str())? {
                        ServerMessage::Connected { peer_id } => break peer_id,
                        other => {
                            return Err(ClientError::Protocol(format!(
                                "expected connected message, got {other:?}"
                            )));
                        }
                    }
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
                None => return Err(ClientError::Closed),
            }
        };
        tracing::info!("Connected as peer '{}'", peer_id);

        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Outbound>();
        let routes = Arc::new(Mutex::new(Routes::default()));

        let writer = tokio::spawn(async move {
            while let Some(item) = outbound_rx.recv().await {
                let message = match item {
                    Outbound::Message(message) => message,
                    Outbound::Close => {
                        let _ = sink.close().await;
                        break;
                    }
                };
                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize message: {}", e);
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::text(json)).await {
                    tracing::error!("Failed to send message: {}", e);
                    break;
                }
            }
        });

        let reader_routes = routes.clone();
        let reader = tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                let text = match frame {
                    Ok(Message::Text(text)) => text,
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                };
                match serde_json::from_str::<ServerMessage>(text.as_str()) {
                    Ok(message) => route(&reader_routes, message),
                    Err(e) => tracing::warn!("Ignoring unparsable frame: {}", e),
                }
            }
            tracing::info!("Connection closed by the service");
            route(
                &reader_routes,
                ServerMessage::QueryError {
                    namespace: Namespace::Players,
                    message: "connection closed".to_string(),
                },
            );
        });

        Ok(Self {
            peer_id,
            outbound,
            routes,
            reader,
            writer,
        })
    }

    /// Peer id assigned by the service
    pub fn peer_id(&self) -> &str {
        &self.peer_id
    }

    /// Subscribe to "all players"
    ///
    /// Replaces any previous subscription of this client.
    pub fn subscribe_players(&self) -> Result<QuerySubscription, ClientError> {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.routes).query = Some(tx);
        self.send(ClientMessage::SubscribeQuery {
            namespace: Namespace::Players,
        })?;
        Ok(QuerySubscription {
            rx,
            outbound: self.outbound.clone(),
            routes: self.routes.clone(),
        })
    }

    /// Join a presence room with the given cursor color
    pub fn join_room(
        &self,
        room_type: &str,
        room_id: &str,
        color: &str,
    ) -> Result<RoomHandle, ClientError> {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.routes).room = Some(RoomRoute { tx, revision: None });
        self.send(ClientMessage::JoinRoom {
            room_type: room_type.to_string(),
            room_id: room_id.to_string(),
            color: Some(color.to_string()),
        })?;
        Ok(RoomHandle {
            rx,
            outbound: self.outbound.clone(),
            routes: self.routes.clone(),
            published: None,
        })
    }

    /// Flush queued messages and close the socket
    pub async fn disconnect(&self) {
        let _ = self.outbound.send(Outbound::Close);
        // The writer drops its receiver once the close frame is out.
        self.outbound.closed().await;
    }

    fn send(&self, message: ClientMessage) -> Result<(), ClientError> {
        self.outbound
            .send(Outbound::Message(message))
            .map_err(|_| ClientError::Closed)
    }
}

impl Drop for RealtimeClient {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}

impl DataService for RealtimeClient {
    fn transact(&self, ops: Vec<TxOpDto>) -> Result<(), ClientError> {
        self.send(ClientMessage::Transact { ops })
    }
}

/// Stream of "all players" snapshots; unsubscribes on drop
pub struct QuerySubscription {
    rx: UnboundedReceiver<QueryState>,
    outbound: UnboundedSender<Outbound>,
    routes: Arc<Mutex<Routes>>,
}

impl QuerySubscription {
    /// Next delivery, `None` once the connection is gone
    pub async fn next(&mut self) -> Option<QueryState> {
        self.rx.recv().await
    }
}

impl Drop for QuerySubscription {
    fn drop(&mut self) {
        lock(&self.routes).query = None;
        let _ = self
            .outbound
            .send(Outbound::Message(ClientMessage::UnsubscribeQuery {
                namespace: Namespace::Players,
            }));
    }
}

/// Membership in a presence room; leaves on drop
pub struct RoomHandle {
    rx: UnboundedReceiver<Vec<PeerPresenceDto>>,
    outbound: UnboundedSender<Outbound>,
    routes: Arc<Mutex<Routes>>,
    published: Option<PresenceDto>,
}

impl RoomHandle {
    /// Handle whose connection is already gone
    #[cfg(test)]
    pub(crate) fn closed() -> Self {
        let (_, rx) = mpsc::unbounded_channel();
        let (outbound, _) = mpsc::unbounded_channel();
        Self {
            rx,
            outbound,
            routes: Arc::new(Mutex::new(Routes::default())),
            published: None,
        }
    }

    /// Next snapshot of the other peers
    pub async fn next(&mut self) -> Option<Vec<PeerPresenceDto>> {
        self.rx.recv().await
    }

    /// Publish `presence` unless it equals the last published payload
    pub fn sync_presence(&mut self, presence: PresenceDto) -> Result<(), ClientError> {
        if self.published.as_ref() == Some(&presence) {
            return Ok(());
        }
        self.outbound
            .send(Outbound::Message(ClientMessage::SyncPresence {
                presence: presence.clone(),
            }))
            .map_err(|_| ClientError::Closed)?;
        self.published = Some(presence);
        Ok(())
    }

    /// Publish the local cursor position
    pub fn move_cursor(&self, x: f64, y: f64) -> Result<(), ClientError> {
        self.outbound
            .send(Outbound::Message(ClientMessage::MoveCursor { x, y }))
            .map_err(|_| ClientError::Closed)
    }
}

impl Drop for RoomHandle {
    fn drop(&mut self) {
        lock(&self.routes).room = None;
        let _ = self
            .outbound
            .send(Outbound::Message(ClientMessage::LeaveRoom));
    }
}

fn route(routes: &Mutex<Routes>, message: ServerMessage) {
    let mut routes = lock(routes);
    match message {
        ServerMessage::QueryResult { players, .. } => {
            if let Some(tx) = &routes.query {
                let _ = tx.send(QueryState::Ready(players));
            }
        }
        ServerMessage::QueryError { message, .. } => {
            if let Some(tx) = &routes.query {
                let _ = tx.send(QueryState::Failed(message));
            }
        }
        ServerMessage::PresenceSnapshot {
            revision, peers, ..
        } => {
            let Some(room) = routes.room.as_mut() else {
                return;
            };
            // Snapshots can overtake each other on the way here.
            if room.revision.is_some_and(|latest| revision < latest) {
                tracing::debug!("Dropping stale presence snapshot {}", revision);
                return;
            }
            room.revision = Some(revision);
            let _ = room.tx.send(peers);
        }
        ServerMessage::TransactionRejected { reason } => {
            tracing::warn!("Transaction rejected: {}", reason);
        }
        ServerMessage::Error { message } => {
            tracing::warn!("Service error: {}", message);
        }
        ServerMessage::Connected { peer_id } => {
            tracing::debug!("Unexpected connected message for '{}'", peer_id);
        }
    }
}

/// Lock the routes; a poisoned lock still holds valid routes
fn lock(routes: &Mutex<Routes>) -> std::sync::MutexGuard<'_, Routes> {
    routes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
