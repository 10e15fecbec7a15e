//! End-to-end tests of the terminal client against an in-process service.

use std::{future::Future, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use tapboard_client::{ClickCounter, ClickMode, QueryState, RealtimeClient, view};
use tapboard_server::{
    infrastructure::dto::websocket::{ClientMessage, ServerMessage},
    serve,
    ui::state::AppState,
};
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;

const TEST_APP_ID: &str = "test-app";

/// Start a service on an ephemeral port; dropping the sender stops it
async fn start_server() -> (String, oneshot::Sender<()>) {
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

    (format!("ws://{addr}/ws?app_id={TEST_APP_ID}"), shutdown_tx)
}

async fn within<T>(future: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), future)
        .await
        .expect("Timed out")
}

/// Feed query deliveries into `counter` until `predicate` holds
async fn pump_until<F>(
    counter: &mut ClickCounter,
    query: &mut tapboard_client::QuerySubscription,
    predicate: F,
) where
    F: Fn(&ClickCounter) -> bool,
{
    within(async {
        while !predicate(counter) {
            let state = query.next().await.expect("Subscription ended");
            counter.apply_query(state);
        }
    })
    .await;
}

#[tokio::test]
async fn test_join_and_click_updates_leaderboard() {
    // テスト項目: 参加してクリックすると、自分の行がリーダーボードに現れ、回数が増える
    // given (前提条件):
    let (endpoint, _shutdown) = start_server().await;
    let client = Arc::new(within(RealtimeClient::connect(&endpoint)).await.unwrap());
    let mut query = client.subscribe_players().unwrap();
    let mut counter = ClickCounter::new(client.clone(), ClickMode::Snapshot, "#102030".into());
    pump_until(&mut counter, &mut query, |c| {
        matches!(c.query(), QueryState::Ready(_))
    })
    .await;
    assert!(view::render(&counter).contains("No players yet!"));

    // when (操作):
    counter.set_player_name("Alice");
    assert!(counter.join_game());
    pump_until(&mut counter, &mut query, |c| c.current_player().is_some()).await;
    assert!(counter.register_click());
    pump_until(&mut counter, &mut query, |c| {
        c.current_player().and_then(|p| p.clicks) == Some(1)
    })
    .await;

    // then (期待する結果):
    let screen = view::render(&counter);
    assert!(screen.contains("Welcome, Alice!"));
    assert!(screen.contains("Alice  1 clicks"));
    assert!(screen.contains("Total players: 1"));

    client.disconnect().await;
}

#[tokio::test]
async fn test_atomic_clicks_are_not_lost() {
    // テスト項目: アトミックモードでは、スナップショット更新前の連続クリックもすべて数えられる
    // given (前提条件):
    let (endpoint, _shutdown) = start_server().await;
    let client = Arc::new(within(RealtimeClient::connect(&endpoint)).await.unwrap());
    let mut query = client.subscribe_players().unwrap();
    let mut counter = ClickCounter::new(client.clone(), ClickMode::Atomic, "#102030".into());
    counter.set_player_name("Bob");
    counter.join_game();
    pump_until(&mut counter, &mut query, |c| c.current_player().is_some()).await;

    // when (操作):
    for _ in 0..3 {
        assert!(counter.register_click());
    }

    // then (期待する結果):
    pump_until(&mut counter, &mut query, |c| {
        c.current_player().and_then(|p| p.clicks) == Some(3)
    })
    .await;

    client.disconnect().await;
}

#[tokio::test]
async fn test_presence_is_shared_between_clients() {
    // テスト項目: 同じルームの別クライアントには、入力中の名前と色、カーソル位置が届く
    // given (前提条件):
    let (endpoint, _shutdown) = start_server().await;
    let alice = within(RealtimeClient::connect(&endpoint)).await.unwrap();
    let bob = within(RealtimeClient::connect(&endpoint)).await.unwrap();
    let mut alice_room = alice.join_room("cursor", "123", "#112233").unwrap();
    let mut bob_room = bob.join_room("cursor", "123", "#445566").unwrap();

    // when (操作):
    alice_room
        .sync_presence(tapboard_server::infrastructure::dto::websocket::PresenceDto {
            name: "Ali".to_string(),
        })
        .unwrap();
    alice_room.move_cursor(10.0, 20.0).unwrap();

    // then (期待する結果):
    let peer = within(async {
        loop {
            let peers = bob_room.next().await.expect("Room closed");
            if let Some(peer) = peers
                .into_iter()
                .find(|p| p.peer_id == alice.peer_id() && p.cursor.is_some())
            {
                break peer;
            }
        }
    })
    .await;
    assert_eq!(peer.presence.name, "Ali");
    assert_eq!(peer.color.as_deref(), Some("#112233"));
    let cursor = peer.cursor.unwrap();
    assert_eq!((cursor.x, cursor.y), (10.0, 20.0));

    // Alice never sees herself
    let alice_view = within(alice_room.next()).await.expect("Room closed");
    assert!(alice_view.iter().all(|p| p.peer_id != alice.peer_id()));

    bob.disconnect().await;
}

#[tokio::test]
async fn test_connect_with_unknown_app_id_fails() {
    // テスト項目: 存在しないアプリ ID では接続できない
    let (endpoint, _shutdown) = start_server().await;
    let endpoint = endpoint.replace(TEST_APP_ID, "unknown-app");

    let result = within(RealtimeClient::connect(&endpoint)).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_long_name_still_creates_player() {
    // テスト項目: 空白でない名前なら長くても参加でき、プレイヤーが 1 人作成される
    // given (前提条件):
    let (endpoint, _shutdown) = start_server().await;
    let client = Arc::new(within(RealtimeClient::connect(&endpoint)).await.unwrap());
    let mut query = client.subscribe_players().unwrap();
    let mut counter = ClickCounter::new(client.clone(), ClickMode::Snapshot, "#102030".into());
    let name = "x".repeat(101);
    counter.set_player_name(name.clone());

    // when (操作):
    assert!(counter.join_game());
    pump_until(&mut counter, &mut query, |c| c.current_player().is_some()).await;

    // then (期待する結果):
    assert_eq!(counter.current_player().unwrap().name, name);
    assert!(matches!(counter.query(), QueryState::Ready(players) if players.len() == 1));
    assert!(counter.register_click());

    client.disconnect().await;
}

/// Service that answers the first subscription and then drops the socket
async fn start_dropping_service() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("Failed to accept");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("Failed to upgrade");
        let send = |message: ServerMessage| {
            Message::text(serde_json::to_string(&message).expect("Failed to serialize"))
        };
        ws.send(send(ServerMessage::Connected {
            peer_id: "peer".to_string(),
        }))
        .await
        .expect("Failed to send");
        while let Some(Ok(frame)) = ws.next().await {
            let Message::Text(text) = frame else { continue };
            if let Ok(ClientMessage::SubscribeQuery { namespace }) =
                serde_json::from_str(text.as_str())
            {
                ws.send(send(ServerMessage::QueryResult {
                    namespace,
                    players: Vec::new(),
                }))
                .await
                .expect("Failed to send");
                break;
            }
        }
        drop(ws);
    });

    format!("ws://{addr}/ws?app_id={TEST_APP_ID}")
}

#[tokio::test]
async fn test_connection_loss_shows_failure_view() {
    // テスト項目: 接続が切れるとクエリ失敗として扱われ、画面全体がエラーメッセージになる
    // given (前提条件):
    let endpoint = start_dropping_service().await;
    let client = Arc::new(within(RealtimeClient::connect(&endpoint)).await.unwrap());
    let mut query = client.subscribe_players().unwrap();
    let mut counter = ClickCounter::new(client.clone(), ClickMode::Snapshot, "#102030".into());
    counter.set_player_name("Alice");

    // when (操作):
    pump_until(&mut counter, &mut query, |c| {
        matches!(c.query(), QueryState::Failed(_))
    })
    .await;

    // then (期待する結果):
    assert_eq!(view::render(&counter), "Oops, something went wrong\n");
}
