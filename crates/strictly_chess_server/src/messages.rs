//! Payloads exchanged with clients.
//!
//! Every frame is a JSON object tagged by `type`. Field names are camelCase
//! and absent optional fields are omitted.

use derive_new::new;
use serde::{Deserialize, Serialize};
use strictly_chess::Color;

/// Opaque game identifier.
pub type GameId = String;

/// Opaque user identifier taken from the connection path.
pub type UserId = String;

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Lifecycle phase announced by an Init message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GamePhase {
    /// Waiting for an opponent.
    Init,
    /// Both players are present.
    Start,
}

/// Announces a waiting or started game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct InitMessage {
    /// Waiting or started.
    pub phase: GamePhase,
    /// Color assigned to the recipient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Game the recipient belongs to.
    pub game_id: GameId,
}

/// Rook relocation reported with a castle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastleMessage {
    /// Rook id.
    pub rook: String,
    /// Rook square before the castle.
    pub rook_pos_start: String,
    /// Rook square after the castle.
    pub rook_pos_end: String,
}

/// Remaining clock time per side, as sent by clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeLeft {
    /// White's remaining time.
    pub white: f64,
    /// Black's remaining time.
    pub black: f64,
}

/// Terminal position reached by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveEnd {
    /// The side to move is mated.
    Checkmate,
    /// The side to move has no legal move.
    Stalemate,
}

/// A move request from a client, echoed back with the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveMessage {
    /// Id of the moving piece as the client knows it.
    pub piece: String,
    /// Origin square, e.g. `e2`.
    pub square_from: String,
    /// Destination square, e.g. `e4`.
    pub square_to: String,
    /// Game the move belongs to.
    pub game_id: GameId,
    /// Verdict, filled in by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    /// Client-side position snapshot, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<serde_json::Value>,
    /// Square of a pawn removed en passant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en_passant_capture_pos: Option<String>,
    /// Promotion token on the way in, promoted piece id on the way out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
    /// Rook relocation of a castle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub castle: Option<CastleMessage>,
    /// Checkmate or stalemate reached by this move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<MoveEnd>,
    /// Ids of Black pieces captured by White.
    #[serde(default)]
    pub white_captures: Vec<String>,
    /// Ids of White pieces captured by Black.
    #[serde(default)]
    pub black_captures: Vec<String>,
    /// Clock state carried by the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_left: Option<TimeLeft>,
    /// Side to move after this message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn: Option<Color>,
}

impl MoveMessage {
    /// Creates a bare move request.
    pub fn new(
        piece: impl Into<String>,
        square_from: impl Into<String>,
        square_to: impl Into<String>,
        game_id: impl Into<GameId>,
    ) -> Self {
        Self {
            piece: piece.into(),
            square_from: square_from.into(),
            square_to: square_to.into(),
            game_id: game_id.into(),
            valid: None,
            position: None,
            en_passant_capture_pos: None,
            promotion: None,
            castle: None,
            end: None,
            white_captures: Vec::new(),
            black_captures: Vec::new(),
            time_left: None,
            turn: None,
        }
    }
}

/// Winner of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    /// White won.
    #[serde(rename = "w")]
    White,
    /// Black won.
    #[serde(rename = "b")]
    Black,
    /// Nobody won.
    #[serde(rename = "draw")]
    Draw,
}

impl From<Color> for Winner {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }
}

/// Final result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct GameOver {
    /// Who won.
    pub winner: Winner,
    /// How the game ended, e.g. `Checkmate` or `Resignation`.
    #[new(into)]
    pub result: String,
}

/// Session lifecycle signal: close, rematch, draw, resignation, timeout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct EndMessage {
    /// Game the signal applies to.
    pub game_id: GameId,
    /// A clock ran out.
    #[new(default)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub timeout: bool,
    /// The game is over.
    #[new(default)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub ended: bool,
    /// A player left the game.
    #[new(default)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub left_game: bool,
    /// The session should close.
    #[new(default)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub close: bool,
    /// A rematch offer.
    #[new(default)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub rematch: bool,
    /// Both players agreed to a rematch.
    #[new(default)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub rematch_success: bool,
    /// Id of the provisioned rematch game.
    #[new(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rematch_game_id: Option<GameId>,
    /// A draw offer.
    #[new(default)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub offer_draw: bool,
    /// A draw offer was accepted.
    #[new(default)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub draw_accepted: bool,
    /// A draw offer was declined or refused.
    #[new(default)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub draw_denied: bool,
    /// A resignation request.
    #[new(default)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub resign: bool,
    /// A confirmed resignation.
    #[new(default)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub resign_confirm: bool,
    /// Final result.
    #[new(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_over: Option<GameOver>,
}

/// Renames a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeNameMessage {
    /// Game the player is in.
    pub game_id: GameId,
    /// New display name.
    pub name: String,
}

/// One chat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    /// Author.
    pub username: String,
    /// Text.
    pub text: String,
}

/// Chat lines relayed between players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEntriesMessage {
    /// Game the chat belongs to.
    pub game_id: GameId,
    /// New lines.
    pub entries: Vec<ChatEntry>,
}

/// User-facing error report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationErrorMessage {
    /// Text to show the user.
    pub user_message: String,
}

/// Any frame on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(tag = "type")]
pub enum Message {
    /// Game waiting or started.
    #[serde(rename = "INIT")]
    Init(InitMessage),
    /// Move request or verdict.
    #[serde(rename = "MOVE")]
    Move(MoveMessage),
    /// Session lifecycle signal.
    #[serde(rename = "END")]
    End(EndMessage),
    /// Player rename.
    #[serde(rename = "CHANGE_NAME")]
    ChangeName(ChangeNameMessage),
    /// Chat relay.
    #[serde(rename = "CHAT_ENTRIES")]
    ChatEntries(ChatEntriesMessage),
    /// Error report.
    #[serde(rename = "COMMUNICATION_ERROR")]
    CommunicationError(CommunicationErrorMessage),
}

impl Message {
    /// Game the frame refers to, if any.
    pub fn game_id(&self) -> Option<&str> {
        match self {
            Message::Init(m) => Some(&m.game_id),
            Message::Move(m) => Some(&m.game_id),
            Message::End(m) => Some(&m.game_id),
            Message::ChangeName(m) => Some(&m.game_id),
            Message::ChatEntries(m) => Some(&m.game_id),
            Message::CommunicationError(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_wire_shape() {
        let message = Message::from(InitMessage::new(GamePhase::Start, Some(Color::Black), "g1".into()));
        let json = serde_json::to_value(&message).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({ "type": "INIT", "phase": "START", "color": "b", "gameId": "g1" })
        );
    }

    #[test]
    fn test_end_omits_unset_flags() {
        let end = EndMessage {
            resign_confirm: true,
            game_over: Some(GameOver::new(Winner::Draw, "Draw by agreement")),
            ..EndMessage::new("g".into())
        };
        let json = serde_json::to_value(Message::End(end)).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({
                "type": "END",
                "gameId": "g",
                "resignConfirm": true,
                "gameOver": { "winner": "draw", "result": "Draw by agreement" }
            })
        );
    }

    #[test]
    fn test_move_request_parses_minimal_client_frame() {
        let text = r#"{"type":"MOVE","piece":"wp5","squareFrom":"e2","squareTo":"e4","gameId":"g","position":{"e4":"wp5"}}"#;
        let Message::Move(request) = serde_json::from_str(text).expect("parses") else {
            panic!("expected a move");
        };
        assert_eq!(request.square_to, "e4");
        assert!(request.white_captures.is_empty());
        assert_eq!(request.position, Some(serde_json::json!({ "e4": "wp5" })));
    }
}
