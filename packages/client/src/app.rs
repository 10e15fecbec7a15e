//! Interactive terminal session.

use std::sync::Arc;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::{
    config::ClientConfig,
    connection::{RealtimeClient, RoomHandle},
    controller::{ClickCounter, SessionState},
    error::ClientError,
    input::{Command, HELP},
    presence::random_dark_color,
    view,
};

const PROMPT: &str = "> ";

/// Connect to the service and run the game until the user quits
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let endpoint = config.endpoint();
    tracing::info!("Connecting to {}", endpoint);
    let client = Arc::new(RealtimeClient::connect(&endpoint).await?);

    let color = random_dark_color();
    let mut counter = ClickCounter::new(client.clone(), config.click_mode(), color.clone());
    let mut query = client.subscribe_players()?;
    let mut room = client.join_room(&config.room_type, &config.room_id, &color)?;
    room.sync_presence(counter.presence())?;

    println!("{HELP}");
    let mut screen = show(&counter, None);
    let mut lines = spawn_input_thread();

    loop {
        tokio::select! {
            line = lines.recv() => {
                let line = match line {
                    Some(Ok(line)) => line,
                    Some(Err(ReadlineError::Interrupted | ReadlineError::Eof)) | None => break,
                    Some(Err(e)) => return Err(e.into()),
                };
                if !handle_command(&mut counter, &mut room, Command::parse(&line)) {
                    break;
                }
            }
            Some(state) = query.next() => counter.apply_query(state),
            Some(peers) = room.next() => counter.apply_peers(peers),
        }
        screen = show(&counter, Some(screen));
    }

    drop(room);
    drop(query);
    client.disconnect().await;
    tracing::info!("Disconnected");
    Ok(())
}

/// Apply one command; `false` means quit
///
/// Presence is best effort: once the connection is gone the failure view is
/// already on screen, so send errors are only logged.
fn handle_command(counter: &mut ClickCounter, room: &mut RoomHandle, command: Command) -> bool {
    match command {
        Command::Quit => return false,
        Command::Help => println!("{HELP}"),
        Command::Name(name) => {
            counter.set_player_name(name);
            publish_presence(counter, room);
        }
        Command::Join(name) => {
            if let Some(name) = name {
                counter.set_player_name(name);
                publish_presence(counter, room);
            }
            if !counter.join_game() && counter.session() == &SessionState::NotJoined {
                println!("Type your name first: /name <your name>");
            }
        }
        Command::Click => {
            if counter.session() == &SessionState::NotJoined {
                println!("Join the game first: /join <your name>");
            } else {
                counter.register_click();
            }
        }
        Command::Move { x, y } => {
            counter.move_cursor(x, y);
            if let Err(e) = room.move_cursor(x, y) {
                tracing::warn!("Failed to publish cursor: {}", e);
            }
        }
        Command::Invalid(hint) => println!("{hint}"),
    }
    true
}

fn publish_presence(counter: &ClickCounter, room: &mut RoomHandle) {
    if let Err(e) = room.sync_presence(counter.presence()) {
        tracing::warn!("Failed to publish presence: {}", e);
    }
}

/// Print the view when it differs from what is on screen
fn show(counter: &ClickCounter, previous: Option<String>) -> String {
    let screen = view::render(counter);
    if previous.as_deref() != Some(screen.as_str()) {
        println!("\n{screen}");
    }
    screen
}

/// Read lines on a dedicated thread since rustyline blocks
fn spawn_input_thread() -> UnboundedReceiver<Result<String, ReadlineError>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                let _ = tx.send(Err(e));
                return;
            }
        };
        loop {
            let line = editor.readline(PROMPT);
            if let Ok(line) = &line
                && !line.trim().is_empty()
            {
                let _ = editor.add_history_entry(line.as_str());
            }
            let done = line.is_err();
            if tx.send(line).is_err() || done {
                break;
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ClickMode, service::MockDataService};

    fn counter() -> ClickCounter {
        let mut mock = MockDataService::new();
        mock.expect_transact().returning(|_| Err(ClientError::Closed));
        ClickCounter::new(Arc::new(mock), ClickMode::Snapshot, "#102030".to_string())
    }

    #[test]
    fn test_commands_keep_running_after_connection_loss() {
        // テスト項目: 接続が切れた後も名前変更・カーソル移動・参加でセッションは終了しない
        // given (前提条件):
        let mut counter = counter();
        let mut room = RoomHandle::closed();

        // when (操作):
        let after_name = handle_command(&mut counter, &mut room, Command::Name("Ali".into()));
        let after_move =
            handle_command(&mut counter, &mut room, Command::Move { x: 1.0, y: 2.0 });
        let after_join = handle_command(&mut counter, &mut room, Command::Join(None));

        // then (期待する結果):
        assert!(after_name && after_move && after_join);
        assert_eq!(counter.player_name(), "Ali");
        assert_eq!(counter.cursor(), Some((1.0, 2.0)));
        assert!(matches!(counter.session(), SessionState::Joined { .. }));
    }

    #[test]
    fn test_quit_stops_the_loop() {
        // テスト項目: /quit でループが終了する
        let mut counter = counter();
        let mut room = RoomHandle::closed();

        assert!(!handle_command(&mut counter, &mut room, Command::Quit));
    }
}
