//! Core domain models: the durable player table and ephemeral presence peers.

use serde::{Deserialize, Serialize};

use super::{
    error::PlayerError,
    transaction::{Transaction, TxOperation},
    value_object::{
        Clicks, CursorColor, CursorPosition, PeerId, PlayerId, PlayerName, PresenceName, RoomKey,
        Timestamp,
    },
};

/// A participant of the game and their score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Player identifier (generated by the client)
    pub id: PlayerId,
    /// Display name set when joining
    pub name: PlayerName,
    /// Number of clicks, never decreasing
    pub clicks: Clicks,
    /// Timestamp when the record was created
    pub created_at: Timestamp,
    /// Timestamp of the last committed change
    pub updated_at: Timestamp,
}

impl Player {
    /// Create a new player
    pub fn new(id: PlayerId, name: PlayerName, clicks: Clicks, now: Timestamp) -> Self {
        Self {
            id,
            name,
            clicks,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge field changes into the player
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::ClicksDecreased` if the change would lower the counter
    pub fn merge(&mut self, changes: &PlayerChanges, now: Timestamp) -> Result<(), PlayerError> {
        if let Some(clicks) = changes.clicks {
            if clicks < self.clicks {
                return Err(PlayerError::ClicksDecreased {
                    id: self.id.to_string(),
                    current: self.clicks.value(),
                    requested: clicks.value(),
                });
            }
            self.clicks = clicks;
        }
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        self.updated_at = now;
        Ok(())
    }

    /// Add `by` clicks to the counter
    pub fn increment(&mut self, by: u64, now: Timestamp) -> Result<(), PlayerError> {
        self.clicks = self
            .clicks
            .checked_add(by)
            .ok_or_else(|| PlayerError::ClicksOverflow(self.id.to_string()))?;
        self.updated_at = now;
        Ok(())
    }
}

/// Field-level changes carried by an update operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerChanges {
    pub name: Option<PlayerName>,
    pub clicks: Option<Clicks>,
}

/// The single global table of players
///
/// Insertion order is kept so that equal scores list in join order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerTable {
    players: Vec<Player>,
}

impl PlayerTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// All players in insertion order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Get a player by ID
    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    fn get_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// Apply every operation of the transaction, or none of them
    ///
    /// # Errors
    ///
    /// Returns the first `PlayerError` raised by an operation; the table is
    /// left untouched in that case.
    pub fn apply(&mut self, transaction: &Transaction, now: Timestamp) -> Result<(), PlayerError> {
        let mut staged = self.clone();
        for op in transaction.operations() {
            staged.apply_operation(op, now)?;
        }
        *self = staged;
        Ok(())
    }

    fn apply_operation(&mut self, op: &TxOperation, now: Timestamp) -> Result<(), PlayerError> {
        match op {
            TxOperation::Update { id, changes } => match self.get_mut(id) {
                Some(player) => player.merge(changes, now),
                None => {
                    let name = changes
                        .name
                        .clone()
                        .ok_or_else(|| PlayerError::NameRequired(id.to_string()))?;
                    let clicks = changes.clicks.unwrap_or_default();
                    self.players
                        .push(Player::new(id.clone(), name, clicks, now));
                    Ok(())
                }
            },
            TxOperation::Increment { id, by } => self
                .get_mut(id)
                .ok_or_else(|| PlayerError::NotFound(id.to_string()))?
                .increment(*by, now),
        }
    }
}

/// One live connection in the presence registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peer {
    /// Connection identifier
    pub id: PeerId,
    /// Room the peer has joined, if any
    pub room: Option<RoomKey>,
    /// Published presence name (may be empty)
    pub name: PresenceName,
    /// Cursor color picked by the peer
    pub color: Option<CursorColor>,
    /// Last reported cursor position
    pub cursor: Option<CursorPosition>,
    /// Timestamp when the peer connected
    pub connected_at: Timestamp,
}

impl Peer {
    /// Create a peer that has not joined a room yet
    pub fn new(id: PeerId, connected_at: Timestamp) -> Self {
        Self {
            id,
            room: None,
            name: PresenceName::default(),
            color: None,
            cursor: None,
            connected_at,
        }
    }

    /// Whether the peer is in the given room
    pub fn is_in(&self, room: &RoomKey) -> bool {
        self.room.as_ref() == Some(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factory::PlayerIdFactory;

    fn name(value: &str) -> PlayerName {
        PlayerName::new(value.to_string()).unwrap()
    }

    fn create(id: &PlayerId, player_name: &str) -> Transaction {
        Transaction::new(vec![TxOperation::Update {
            id: id.clone(),
            changes: PlayerChanges {
                name: Some(name(player_name)),
                clicks: Some(Clicks::new(0)),
            },
        }])
        .unwrap()
    }

    fn set_clicks(id: &PlayerId, clicks: u64) -> Transaction {
        Transaction::new(vec![TxOperation::Update {
            id: id.clone(),
            changes: PlayerChanges {
                name: None,
                clicks: Some(Clicks::new(clicks)),
            },
        }])
        .unwrap()
    }

    #[test]
    fn test_update_creates_missing_player() {
        // テスト項目: 存在しないプレイヤーへの update はレコードを作成する
        // given (前提条件):
        let mut table = PlayerTable::new();
        let id = PlayerIdFactory::generate();

        // when (操作):
        let result = table.apply(&create(&id, "Alice"), Timestamp::new(1000));

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(table.players().len(), 1);
        let player = table.get(&id).unwrap();
        assert_eq!(player.name.as_str(), "Alice");
        assert_eq!(player.clicks, Clicks::new(0));
        assert_eq!(player.created_at, Timestamp::new(1000));
    }

    #[test]
    fn test_update_without_name_on_missing_player_fails() {
        // テスト項目: 名前なしで新規プレイヤーは作成できない
        // given (前提条件):
        let mut table = PlayerTable::new();
        let id = PlayerIdFactory::generate();

        // when (操作):
        let result = table.apply(&set_clicks(&id, 1), Timestamp::new(0));

        // then (期待する結果):
        assert_eq!(result, Err(PlayerError::NameRequired(id.to_string())));
        assert!(table.players().is_empty());
    }

    #[test]
    fn test_update_merges_clicks() {
        // テスト項目: 既存プレイヤーへの update はフィールドをマージする
        // given (前提条件):
        let mut table = PlayerTable::new();
        let id = PlayerIdFactory::generate();
        table.apply(&create(&id, "Alice"), Timestamp::new(0)).unwrap();

        // when (操作):
        table.apply(&set_clicks(&id, 1), Timestamp::new(5)).unwrap();

        // then (期待する結果): 名前は保持され、クリック数だけ更新される
        let player = table.get(&id).unwrap();
        assert_eq!(player.name.as_str(), "Alice");
        assert_eq!(player.clicks, Clicks::new(1));
        assert_eq!(player.updated_at, Timestamp::new(5));
    }

    #[test]
    fn test_update_same_clicks_is_accepted() {
        // テスト項目: 同じクリック数の書き込み（競合した +1）は受け付ける
        // given (前提条件):
        let mut table = PlayerTable::new();
        let id = PlayerIdFactory::generate();
        table.apply(&create(&id, "Alice"), Timestamp::new(0)).unwrap();
        table.apply(&set_clicks(&id, 1), Timestamp::new(0)).unwrap();

        // when (操作): 古いスナップショットから計算した同じ値を書き込む
        let result = table.apply(&set_clicks(&id, 1), Timestamp::new(0));

        // then (期待する結果): 受け付けられるが +1 分は失われる
        assert!(result.is_ok());
        assert_eq!(table.get(&id).unwrap().clicks, Clicks::new(1));
    }

    #[test]
    fn test_decreasing_clicks_rejects_whole_transaction() {
        // テスト項目: クリック数を減らす操作を含むトランザクションは全体が拒否される
        // given (前提条件):
        let mut table = PlayerTable::new();
        let alice = PlayerIdFactory::generate();
        let bob = PlayerIdFactory::generate();
        table.apply(&create(&alice, "Alice"), Timestamp::new(0)).unwrap();
        table.apply(&set_clicks(&alice, 3), Timestamp::new(0)).unwrap();

        let transaction = Transaction::new(vec![
            create(&bob, "Bob").operations()[0].clone(),
            set_clicks(&alice, 2).operations()[0].clone(),
        ])
        .unwrap();

        // when (操作):
        let result = table.apply(&transaction, Timestamp::new(0));

        // then (期待する結果):
        assert_eq!(
            result,
            Err(PlayerError::ClicksDecreased {
                id: alice.to_string(),
                current: 3,
                requested: 2,
            })
        );
        assert_eq!(table.players().len(), 1);
        assert!(table.get(&bob).is_none());
    }

    #[test]
    fn test_increment_adds_clicks() {
        // テスト項目: increment は保存済みの値に加算する
        // given (前提条件):
        let mut table = PlayerTable::new();
        let id = PlayerIdFactory::generate();
        table.apply(&create(&id, "Alice"), Timestamp::new(0)).unwrap();
        let increment = Transaction::new(vec![TxOperation::Increment {
            id: id.clone(),
            by: 1,
        }])
        .unwrap();

        // when (操作): 2 回 increment する
        table.apply(&increment, Timestamp::new(0)).unwrap();
        table.apply(&increment, Timestamp::new(0)).unwrap();

        // then (期待する結果):
        assert_eq!(table.get(&id).unwrap().clicks, Clicks::new(2));
    }

    #[test]
    fn test_increment_missing_player_fails() {
        // テスト項目: 存在しないプレイヤーへの increment は失敗する
        let mut table = PlayerTable::new();
        let id = PlayerIdFactory::generate();
        let increment =
            Transaction::new(vec![TxOperation::Increment { id: id.clone(), by: 1 }]).unwrap();

        let result = table.apply(&increment, Timestamp::new(0));

        assert_eq!(result, Err(PlayerError::NotFound(id.to_string())));
    }

    #[test]
    fn test_players_keep_insertion_order() {
        // テスト項目: プレイヤーは参加順に保持される
        // given (前提条件):
        let mut table = PlayerTable::new();
        let alice = PlayerIdFactory::generate();
        let bob = PlayerIdFactory::generate();

        // when (操作):
        table.apply(&create(&alice, "Alice"), Timestamp::new(0)).unwrap();
        table.apply(&create(&bob, "Bob"), Timestamp::new(0)).unwrap();

        // then (期待する結果):
        let names: Vec<&str> = table.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_peer_is_in_room() {
        // テスト項目: ルームに参加したピアだけがそのルームに属する
        let room = RoomKey::new("cursor".to_string(), "123".to_string()).unwrap();
        let other = RoomKey::new("cursor".to_string(), "456".to_string()).unwrap();
        let mut peer = Peer::new(crate::domain::factory::PeerIdFactory::generate(), Timestamp::new(0));
        assert!(!peer.is_in(&room));

        peer.room = Some(room.clone());

        assert!(peer.is_in(&room));
        assert!(!peer.is_in(&other));
    }
}
