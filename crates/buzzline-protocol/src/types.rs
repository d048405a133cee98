//! Core protocol types for the Buzzline wire format.
//!
//! Every structure here is something that travels "on the wire" between a
//! connected game client and the server, or a piece of vocabulary shared by
//! both sides (states, categories, message tags).
//!
//! The wire format is flat JSON: inbound events carry a `request_type`
//! discriminator, outbound events a `response_type`. Both are modeled as
//! closed enums so dispatch is exhaustive pattern matching rather than
//! string branching.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A generated opaque identifier for a user, independent of any room.
///
/// Newtype over `String` so a `UserId` can't be confused with a `PlayerId`
/// even though both are strings underneath. `#[serde(transparent)]` keeps
/// the JSON representation a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u-{}", self.0)
    }
}

/// A generated identifier for a player — one user's participation record
/// inside one room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Shared vocabulary
// ---------------------------------------------------------------------------

/// The room's game state.
///
/// - **Idle**: no question being read, no contest.
/// - **Playing**: a question is being "read" — the countdown runs from
///   `start_time` to `end_time`.
/// - **Contest**: a buzz is being resolved; the countdown is frozen for
///   everyone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    Idle,
    Playing,
    Contest,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Playing => write!(f, "playing"),
            Self::Contest => write!(f, "contest"),
        }
    }
}

/// Raised when a string doesn't name a known enum value.
#[derive(Debug, thiserror::Error)]
#[error("unrecognized value: {0}")]
pub struct ParseEnumError(pub String);

/// Question categories a room can filter on.
///
/// `Everything` is the wildcard — it matches questions of any category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Everything,
    Science,
    History,
    Literature,
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Everything" => Ok(Self::Everything),
            "Science" => Ok(Self::Science),
            "History" => Ok(Self::History),
            "Literature" => Ok(Self::Literature),
            other => Err(ParseEnumError(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Everything => write!(f, "Everything"),
            Self::Science => write!(f, "Science"),
            Self::History => write!(f, "History"),
            Self::Literature => write!(f, "Literature"),
        }
    }
}

/// Question difficulty tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(ParseEnumError(other.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// Tags classifying entries in a room's append-only message log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageTag {
    Join,
    Leave,
    BuzzInit,
    BuzzCorrect,
    BuzzWrong,
    BuzzForfeit,
    Chat,
    SetCategory,
    SetDifficulty,
    ResetScore,
}

impl MessageTag {
    /// Only chat and answered-buzz messages can be reported for moderation.
    pub fn reportable(self) -> bool {
        matches!(self, Self::Chat | Self::BuzzCorrect | Self::BuzzWrong)
    }
}

// ---------------------------------------------------------------------------
// Inbound events
// ---------------------------------------------------------------------------

/// The closed set of request types a client can send.
///
/// The `#[serde(other)]` catch-all absorbs unrecognized strings instead of
/// failing deserialization — unknown request types are silently ignored,
/// per the protocol's resilience-over-diagnostics posture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    NewUser,
    Join,
    Ping,
    Leave,
    GetAnswer,
    SetName,
    Next,
    BuzzInit,
    BuzzAnswer,
    SetCategory,
    SetDifficulty,
    ResetScore,
    Chat,
    ReportMessage,
    #[serde(other)]
    Unknown,
}

/// An inbound client event, as it appears on the wire.
///
/// Every field is optional at the parse layer; the session coordinator
/// decides what a missing field means (usually: drop the event silently).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientEvent {
    #[serde(default)]
    pub request_type: Option<RequestType>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ClientEvent {
    /// The event's content, with missing/null defaulted to empty.
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Outbound events
// ---------------------------------------------------------------------------

/// One player's row in the room scoreboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub player_id: PlayerId,
    pub name: String,
    pub score: i64,
    pub correct: u32,
    pub negs: u32,
    pub last_seen: f64,
}

/// One entry of the room's message feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSnapshot {
    pub message_id: String,
    pub tag: MessageTag,
    pub player_name: Option<String>,
    pub content: Option<String>,
}

/// The full room-state snapshot broadcast on every update.
///
/// `category` is the *current question's* category (empty string when no
/// question is loaded); `room_category` is the room's filter setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub game_state: GameState,
    pub current_time: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub buzz_start_time: f64,
    pub current_question_content: String,
    pub category: String,
    pub room_category: Category,
    pub messages: Vec<MessageSnapshot>,
    pub difficulty: Difficulty,
    pub players: Vec<PlayerSnapshot>,
    pub change_locked: bool,
}

/// Outbound events, tagged by `response_type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "response_type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Freshly minted credentials — sent only to the originating connection.
    NewUser { user_id: UserId, user_name: String },
    /// Full room snapshot, broadcast to the room group.
    Update(RoomSnapshot),
    /// Personal lockout notice.
    LockOut { locked_out: bool },
    /// The caller won the buzz race — sent to the buzzing connection only.
    BuzzGrant,
    /// The current question's answer, broadcast on `get_answer` while idle.
    SendAnswer { answer: String },
    /// Sent to a banned player's connection before forced removal.
    Kick,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The wire format is consumed by a JavaScript client, so these tests
    //! pin the exact JSON shapes — a serde-attribute mismatch means the
    //! client can't parse our messages.

    use super::*;

    // =====================================================================
    // Vocabulary enums
    // =====================================================================

    #[test]
    fn test_game_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&GameState::Idle).unwrap(),
            "\"idle\""
        );
        assert_eq!(
            serde_json::to_string(&GameState::Contest).unwrap(),
            "\"contest\""
        );
    }

    #[test]
    fn test_category_round_trips_through_display_and_from_str() {
        for cat in [
            Category::Everything,
            Category::Science,
            Category::History,
            Category::Literature,
        ] {
            assert_eq!(cat.to_string().parse::<Category>().unwrap(), cat);
        }
    }

    #[test]
    fn test_category_from_str_rejects_unknown() {
        assert!("Sports".parse::<Category>().is_err());
        // Case matters — the wire value is PascalCase.
        assert!("science".parse::<Category>().is_err());
    }

    #[test]
    fn test_difficulty_from_str_accepts_lowercase_only() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert!("Easy".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_message_tag_reportable() {
        assert!(MessageTag::Chat.reportable());
        assert!(MessageTag::BuzzCorrect.reportable());
        assert!(MessageTag::BuzzWrong.reportable());
        assert!(!MessageTag::Join.reportable());
        assert!(!MessageTag::BuzzForfeit.reportable());
        assert!(!MessageTag::ResetScore.reportable());
    }

    #[test]
    fn test_message_tag_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&MessageTag::BuzzForfeit).unwrap(),
            "\"buzz_forfeit\""
        );
    }

    // =====================================================================
    // ClientEvent parsing
    // =====================================================================

    #[test]
    fn test_client_event_full_record() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"request_type": "buzz_answer", "user_id": "abc123", "content": "paris"}"#,
        )
        .unwrap();
        assert_eq!(event.request_type, Some(RequestType::BuzzAnswer));
        assert_eq!(event.user_id, Some(UserId("abc123".into())));
        assert_eq!(event.content_or_empty(), "paris");
    }

    #[test]
    fn test_client_event_missing_fields_parse_as_none() {
        let event: ClientEvent = serde_json::from_str(r#"{}"#).unwrap();
        assert!(event.request_type.is_none());
        assert!(event.user_id.is_none());
        assert_eq!(event.content_or_empty(), "");
    }

    #[test]
    fn test_client_event_null_content_defaults_to_empty() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"request_type": "chat", "user_id": "u", "content": null}"#,
        )
        .unwrap();
        assert_eq!(event.content_or_empty(), "");
    }

    #[test]
    fn test_client_event_unknown_request_type_is_absorbed() {
        // Unknown request types must not fail the parse — they are
        // dispatched to the Unknown variant and ignored downstream.
        let event: ClientEvent = serde_json::from_str(
            r#"{"request_type": "fly_to_moon", "user_id": "u"}"#,
        )
        .unwrap();
        assert_eq!(event.request_type, Some(RequestType::Unknown));
    }

    #[test]
    fn test_request_type_known_values_parse() {
        let cases = [
            ("new_user", RequestType::NewUser),
            ("join", RequestType::Join),
            ("ping", RequestType::Ping),
            ("leave", RequestType::Leave),
            ("get_answer", RequestType::GetAnswer),
            ("set_name", RequestType::SetName),
            ("next", RequestType::Next),
            ("buzz_init", RequestType::BuzzInit),
            ("buzz_answer", RequestType::BuzzAnswer),
            ("set_category", RequestType::SetCategory),
            ("set_difficulty", RequestType::SetDifficulty),
            ("reset_score", RequestType::ResetScore),
            ("chat", RequestType::Chat),
            ("report_message", RequestType::ReportMessage),
        ];
        for (wire, expected) in cases {
            let parsed: RequestType =
                serde_json::from_str(&format!("\"{wire}\"")).unwrap();
            assert_eq!(parsed, expected, "for wire value {wire}");
        }
    }

    // =====================================================================
    // ServerEvent shapes
    // =====================================================================

    #[test]
    fn test_server_event_new_user_json_format() {
        let event = ServerEvent::NewUser {
            user_id: UserId("abc".into()),
            user_name: "SwiftOtter12".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["response_type"], "new_user");
        assert_eq!(json["user_id"], "abc");
        assert_eq!(json["user_name"], "SwiftOtter12");
    }

    #[test]
    fn test_server_event_update_flattens_snapshot_fields() {
        let event = ServerEvent::Update(RoomSnapshot {
            game_state: GameState::Playing,
            current_time: 105.0,
            start_time: 100.0,
            end_time: 110.0,
            buzz_start_time: 0.0,
            current_question_content: "This city...".into(),
            category: "History".into(),
            room_category: Category::Everything,
            messages: vec![],
            difficulty: Difficulty::Easy,
            players: vec![],
            change_locked: false,
        });
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["response_type"], "update");
        assert_eq!(json["game_state"], "playing");
        assert_eq!(json["room_category"], "Everything");
        assert_eq!(json["category"], "History");
        assert_eq!(json["difficulty"], "easy");
        assert_eq!(json["change_locked"], false);
        assert!(json["players"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_server_event_lock_out_json_format() {
        let json: serde_json::Value =
            serde_json::to_value(&ServerEvent::LockOut { locked_out: true })
                .unwrap();
        assert_eq!(json["response_type"], "lock_out");
        assert_eq!(json["locked_out"], true);
    }

    #[test]
    fn test_server_event_buzz_grant_is_bare_tag() {
        let json: serde_json::Value =
            serde_json::to_value(&ServerEvent::BuzzGrant).unwrap();
        assert_eq!(json["response_type"], "buzz_grant");
    }

    #[test]
    fn test_server_event_kick_is_bare_tag() {
        let json: serde_json::Value =
            serde_json::to_value(&ServerEvent::Kick).unwrap();
        assert_eq!(json["response_type"], "kick");
    }

    #[test]
    fn test_server_event_send_answer_round_trip() {
        let event = ServerEvent::SendAnswer { answer: "paris".into() };
        let text = serde_json::to_string(&event).unwrap();
        let decoded: ServerEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_message_snapshot_round_trip() {
        let snap = MessageSnapshot {
            message_id: "m1".into(),
            tag: MessageTag::Chat,
            player_name: Some("SwiftOtter12".into()),
            content: Some("gg".into()),
        };
        let text = serde_json::to_string(&snap).unwrap();
        let decoded: MessageSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(snap, decoded);
    }
}
