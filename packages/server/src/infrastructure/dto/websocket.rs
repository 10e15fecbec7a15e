//! WebSocket protocol messages.
//!
//! Every frame is a JSON object tagged by `type`. Both the service and the
//! terminal client use these definitions.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Clicks, Peer, Player, PlayerChanges, PlayerId, PlayerName, TxOperation, ValueObjectError,
};

/// Queryable entity namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Players,
}

/// Counter fields accepted by `increment`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterField {
    Clicks,
}

/// Messages sent from a client to the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    SubscribeQuery {
        namespace: Namespace,
    },
    UnsubscribeQuery {
        namespace: Namespace,
    },
    Transact {
        ops: Vec<TxOpDto>,
    },
    JoinRoom {
        room_type: String,
        room_id: String,
        #[serde(default)]
        color: Option<String>,
    },
    SyncPresence {
        presence: PresenceDto,
    },
    MoveCursor {
        x: f64,
        y: f64,
    },
    LeaveRoom,
}

/// Messages sent from the service to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// First frame of every connection
    Connected { peer_id: String },
    /// Latest result of a query subscription
    QueryResult {
        namespace: Namespace,
        players: Vec<PlayerDto>,
    },
    /// The query could not be evaluated
    QueryError {
        namespace: Namespace,
        message: String,
    },
    /// A transaction sent by this client was not applied
    TransactionRejected { reason: String },
    /// Other peers currently in the room
    ///
    /// Snapshots may arrive out of order; one with a lower `revision` than
    /// an already applied snapshot is stale.
    PresenceSnapshot {
        room_type: String,
        room_id: String,
        revision: u64,
        peers: Vec<PeerPresenceDto>,
    },
    /// A frame could not be understood
    Error { message: String },
}

/// One operation of a `transact` message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum TxOpDto {
    /// Merge `fields` into the record, creating it if absent
    Update {
        namespace: Namespace,
        id: String,
        fields: PlayerFieldsDto,
    },
    /// Add `by` to a counter field on the service side
    Increment {
        namespace: Namespace,
        id: String,
        field: CounterField,
        by: u64,
    },
}

impl TxOpDto {
    /// `update(players, id, fields)`
    pub fn update_player(id: impl Into<String>, fields: PlayerFieldsDto) -> Self {
        Self::Update {
            namespace: Namespace::Players,
            id: id.into(),
            fields,
        }
    }

    /// `increment(players, id, clicks, by)`
    pub fn increment_clicks(id: impl Into<String>, by: u64) -> Self {
        Self::Increment {
            namespace: Namespace::Players,
            id: id.into(),
            field: CounterField::Clicks,
            by,
        }
    }
}

/// Player fields of an update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerFieldsDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clicks: Option<u64>,
}

/// Player record as delivered by queries
///
/// `clicks` may be missing on the wire; readers treat that as 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub clicks: Option<u64>,
}

/// Payload published through presence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceDto {
    pub name: String,
}

/// Cursor position on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorDto {
    pub x: f64,
    pub y: f64,
}

/// A remote peer as seen by presence subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerPresenceDto {
    pub peer_id: String,
    pub presence: PresenceDto,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub cursor: Option<CursorDto>,
}

impl From<&Player> for PlayerDto {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.as_str().to_string(),
            name: player.name.as_str().to_string(),
            clicks: Some(player.clicks.value()),
        }
    }
}

impl From<&Peer> for PeerPresenceDto {
    fn from(peer: &Peer) -> Self {
        Self {
            peer_id: peer.id.as_str().to_string(),
            presence: PresenceDto {
                name: peer.name.as_str().to_string(),
            },
            color: peer.color.as_ref().map(|c| c.as_str().to_string()),
            cursor: peer.cursor.map(|c| CursorDto { x: c.x, y: c.y }),
        }
    }
}

impl TryFrom<TxOpDto> for TxOperation {
    type Error = ValueObjectError;

    fn try_from(dto: TxOpDto) -> Result<Self, Self::Error> {
        match dto {
            TxOpDto::Update {
                namespace: Namespace::Players,
                id,
                fields,
            } => Ok(TxOperation::Update {
                id: PlayerId::try_from(id)?,
                changes: PlayerChanges {
                    name: fields.name.map(PlayerName::try_from).transpose()?,
                    clicks: fields.clicks.map(Clicks::new),
                },
            }),
            TxOpDto::Increment {
                namespace: Namespace::Players,
                id,
                field: CounterField::Clicks,
                by,
            } => Ok(TxOperation::Increment {
                id: PlayerId::try_from(id)?,
                by,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transact_message_wire_format() {
        // テスト項目: transact メッセージが想定した JSON 形式にシリアライズされる
        // given (前提条件):
        let message = ClientMessage::Transact {
            ops: vec![TxOpDto::update_player(
                "0f8fad5b-d9cb-469f-a165-70867728950e",
                PlayerFieldsDto {
                    name: Some("Alice".to_string()),
                    clicks: Some(0),
                },
            )],
        };

        // when (操作):
        let value = serde_json::to_value(&message).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({
                "type": "transact",
                "ops": [{
                    "op": "update",
                    "namespace": "players",
                    "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
                    "fields": {"name": "Alice", "clicks": 0}
                }]
            })
        );
    }

    #[test]
    fn test_player_dto_missing_clicks_is_none() {
        // テスト項目: clicks が欠けたプレイヤーも読み込める
        let dto: PlayerDto = serde_json::from_value(json!({"id": "x", "name": "Alice"})).unwrap();

        assert_eq!(dto.clicks, None);
    }

    #[test]
    fn test_leave_room_unit_variant() {
        // テスト項目: フィールドのないメッセージも type タグだけで表現される
        let message: ClientMessage = serde_json::from_str(r#"{"type":"leave-room"}"#).unwrap();

        assert_eq!(message, ClientMessage::LeaveRoom);
    }

    #[test]
    fn test_update_op_into_domain_trims_name() {
        // テスト項目: update 操作はドメインの操作に変換され、名前はトリムされる
        // given (前提条件):
        let dto = TxOpDto::update_player(
            "0f8fad5b-d9cb-469f-a165-70867728950e",
            PlayerFieldsDto {
                name: Some(" Bob ".to_string()),
                clicks: None,
            },
        );

        // when (操作):
        let op = TxOperation::try_from(dto).unwrap();

        // then (期待する結果):
        match op {
            TxOperation::Update { changes, .. } => {
                assert_eq!(changes.name.unwrap().as_str(), "Bob");
                assert_eq!(changes.clicks, None);
            }
            other => panic!("unexpected operation: {other:?}"),
        }
    }

    #[test]
    fn test_update_op_with_invalid_id_fails() {
        // テスト項目: UUID でない ID の操作は変換できない
        let dto = TxOpDto::increment_clicks("not-a-uuid", 1);

        assert_eq!(
            TxOperation::try_from(dto),
            Err(ValueObjectError::PlayerIdInvalidFormat(
                "not-a-uuid".to_string()
            ))
        );
    }
}
