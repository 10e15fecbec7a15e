//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{
        CursorColor, CursorPosition, PeerId, PeerSender, PeerUpdate, PresenceName, RoomKey,
        TxOperation, ValueObjectError,
    },
    infrastructure::dto::websocket::{
        ClientMessage, Namespace, PeerPresenceDto, PlayerDto, ServerMessage, TxOpDto,
    },
    ui::state::{AppState, ConnectQuery},
    usecase::{
        ApplyTransactionUseCase, ConnectPeerUseCase, DisconnectPeerUseCase, PresenceError,
        QueryPlayersUseCase, RoomNotice, TransactError, UpdatePresenceUseCase,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    if query.app_id != state.app_id {
        tracing::warn!("Rejecting connection for unknown app id '{}'", query.app_id);
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state)))
}

/// Forwarding task of a live query subscription, aborted on drop
struct QuerySubscription(JoinHandle<()>);

impl Drop for QuerySubscription {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Create a channel for this peer to receive messages
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let connect_usecase = ConnectPeerUseCase::new(state.presence.clone());
    let peer_id = match connect_usecase.execute(tx.clone()).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to register peer: {}", e);
            return;
        }
    };
    tracing::info!("Peer '{}' connected", peer_id);

    send_message(
        &tx,
        &ServerMessage::Connected {
            peer_id: peer_id.as_str().to_string(),
        },
    );

    let (mut sender, mut receiver) = socket.split();

    let peer_id_clone = peer_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive messages from this peer
    let mut recv_task = tokio::spawn(async move {
        let mut subscription: Option<QuerySubscription> = None;

        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(message) => {
                        handle_client_message(
                            &state_clone,
                            &peer_id_clone,
                            &tx,
                            &mut subscription,
                            message,
                        )
                        .await;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse message from '{}': {}", peer_id_clone, e);
                        send_message(
                            &tx,
                            &ServerMessage::Error {
                                message: format!("malformed message: {e}"),
                            },
                        );
                    }
                },
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Peer '{}' requested close", peer_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to write queued messages to this peer
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let disconnect_usecase = DisconnectPeerUseCase::new(state.presence.clone());
    match disconnect_usecase.execute(&peer_id).await {
        Ok(notices) => {
            tracing::info!(
                "Peer '{}' disconnected ({} remaining)",
                peer_id,
                disconnect_usecase.count_remaining_peers().await
            );
            deliver_notices(&state, notices).await;
        }
        Err(e) => {
            tracing::warn!("Failed to disconnect peer '{}': {}", peer_id, e);
        }
    }
}

async fn handle_client_message(
    state: &Arc<AppState>,
    peer_id: &PeerId,
    tx: &PeerSender,
    subscription: &mut Option<QuerySubscription>,
    message: ClientMessage,
) {
    match message {
        ClientMessage::SubscribeQuery { namespace } => {
            tracing::debug!("Peer '{}' subscribed to {:?}", peer_id, namespace);
            // Replacing the previous subscription aborts its task.
            *subscription = Some(spawn_query_subscription(state, namespace, tx.clone()));
        }
        ClientMessage::UnsubscribeQuery { namespace } => {
            tracing::debug!("Peer '{}' unsubscribed from {:?}", peer_id, namespace);
            *subscription = None;
        }
        ClientMessage::Transact { ops } => {
            if let Err(e) = apply_transaction(state, ops).await {
                tracing::warn!("Transaction from '{}' rejected: {}", peer_id, e);
                send_message(
                    tx,
                    &ServerMessage::TransactionRejected {
                        reason: e.to_string(),
                    },
                );
            }
        }
        ClientMessage::JoinRoom {
            room_type,
            room_id,
            color,
        } => {
            let update = join_room_update(room_type, room_id, color);
            update_presence(state, peer_id, tx, update).await;
        }
        ClientMessage::SyncPresence { presence } => {
            let update = PeerUpdate::Name(PresenceName::new(presence.name));
            update_presence(state, peer_id, tx, Ok(update)).await;
        }
        ClientMessage::MoveCursor { x, y } => {
            let update = CursorPosition::new(x, y).map(PeerUpdate::Cursor);
            update_presence(state, peer_id, tx, update).await;
        }
        ClientMessage::LeaveRoom => {
            update_presence(state, peer_id, tx, Ok(PeerUpdate::LeaveRoom)).await;
        }
    }
}

/// Convert String -> Domain Models and apply them as one transaction
async fn apply_transaction(
    state: &Arc<AppState>,
    ops: Vec<TxOpDto>,
) -> Result<(), TransactError> {
    let operations = ops
        .into_iter()
        .map(TxOperation::try_from)
        .collect::<Result<Vec<_>, ValueObjectError>>()?;

    ApplyTransactionUseCase::new(state.players.clone())
        .execute(operations)
        .await
}

fn join_room_update(
    room_type: String,
    room_id: String,
    color: Option<String>,
) -> Result<PeerUpdate, ValueObjectError> {
    Ok(PeerUpdate::JoinRoom {
        room: RoomKey::new(room_type, room_id)?,
        color: color.map(CursorColor::new).transpose()?,
    })
}

async fn update_presence(
    state: &Arc<AppState>,
    peer_id: &PeerId,
    tx: &PeerSender,
    update: Result<PeerUpdate, ValueObjectError>,
) {
    let result = match update {
        Ok(update) => {
            UpdatePresenceUseCase::new(state.presence.clone())
                .execute(peer_id, update)
                .await
        }
        Err(e) => Err(PresenceError::from(e)),
    };

    match result {
        Ok(notices) => deliver_notices(state, notices).await,
        Err(e) => {
            tracing::warn!("Presence update from '{}' failed: {}", peer_id, e);
            send_message(
                tx,
                &ServerMessage::Error {
                    message: e.to_string(),
                },
            );
        }
    }
}

fn spawn_query_subscription(
    state: &Arc<AppState>,
    namespace: Namespace,
    tx: PeerSender,
) -> QuerySubscription {
    let usecase = QueryPlayersUseCase::new(state.players.clone());
    let mut revision = usecase.subscribe();

    QuerySubscription(tokio::spawn(async move {
        loop {
            // Mark the current revision as seen before reading, so a commit
            // racing with the read triggers another snapshot.
            revision.borrow_and_update();
            let message = match usecase.execute().await {
                Ok(players) => ServerMessage::QueryResult {
                    namespace,
                    players: players.iter().map(PlayerDto::from).collect(),
                },
                Err(e) => {
                    tracing::error!("Query failed: {}", e);
                    ServerMessage::QueryError {
                        namespace,
                        message: e.to_string(),
                    }
                }
            };
            if !send_message(&tx, &message) {
                break;
            }
            if revision.changed().await.is_err() {
                break;
            }
        }
    }))
}

async fn deliver_notices(state: &Arc<AppState>, notices: Vec<RoomNotice>) {
    for notice in notices {
        let Some(sender) = state.presence.sender(&notice.recipient).await else {
            continue;
        };
        let message = ServerMessage::PresenceSnapshot {
            room_type: notice.room.room_type().to_string(),
            room_id: notice.room.room_id().to_string(),
            revision: notice.revision,
            peers: notice.peers.iter().map(PeerPresenceDto::from).collect(),
        };
        if !send_message(&sender, &message) {
            tracing::warn!("Failed to send presence snapshot to '{}'", notice.recipient);
        }
    }
}

/// Queue a message for a peer; `false` when the peer is gone
fn send_message(tx: &PeerSender, message: &ServerMessage) -> bool {
    match serde_json::to_string(message) {
        Ok(json) => tx.send(json).is_ok(),
        Err(e) => {
            tracing::error!("Failed to serialize message: {}", e);
            false
        }
    }
}
