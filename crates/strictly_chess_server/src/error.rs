//! Game session error types.

use crate::GameId;
use derive_more::{Display, Error};
use strictly_chess::RulesError;
use tracing::instrument;

/// Specific failure of a session operation.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GameErrorKind {
    /// The referenced game id is not in the registry.
    #[display("Game not found: {}", _0)]
    GameNotFound(GameId),

    /// A transition that cannot happen in a consistent session.
    #[display("Invalid game state: {}", _0)]
    InvalidGameState(String),

    /// A custom room was joined without existing and without creator intent.
    #[display("Custom game does not exist: {}", _0)]
    BadCustomGameRequest(GameId),

    /// The client broke the move contract (bad square or promotion token).
    #[display("Protocol violation: {}", _0)]
    Protocol(RulesError),
}

impl std::error::Error for GameErrorKind {}

/// Session error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Game error: {} at {}:{}", kind, file, line)]
pub struct GameError {
    /// What went wrong.
    pub kind: GameErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl GameError {
    /// Creates a new game error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind), fields(kind = %kind))]
    pub fn new(kind: GameErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Unknown game id.
    #[track_caller]
    pub fn game_not_found(game_id: impl Into<GameId>) -> Self {
        Self::new(GameErrorKind::GameNotFound(game_id.into()))
    }

    /// Impossible state transition.
    #[track_caller]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(GameErrorKind::InvalidGameState(message.into()))
    }

    /// Custom room missing without creator intent.
    #[track_caller]
    pub fn bad_custom_game(game_id: impl Into<GameId>) -> Self {
        Self::new(GameErrorKind::BadCustomGameRequest(game_id.into()))
    }

    /// Text shown to the user in a `CommunicationError` payload.
    pub fn user_message(&self) -> String {
        match &self.kind {
            GameErrorKind::GameNotFound(_) => "Your game has ended unexpectedly. \
                You can report a problem or try another game from the 'Play' button!"
                .to_string(),
            GameErrorKind::BadCustomGameRequest(_) => "The game room doesn't exist. \
                Please check with your friend or start another game!"
                .to_string(),
            GameErrorKind::InvalidGameState(_) => {
                "Something went wrong with this game. Please start another game!".to_string()
            }
            GameErrorKind::Protocol(error) => format!("That move could not be understood: {error}"),
        }
    }

    /// Whether the transport should close the offending connection.
    pub fn closes_connection(&self) -> bool {
        !matches!(self.kind, GameErrorKind::Protocol(_))
    }
}

impl From<RulesError> for GameError {
    #[track_caller]
    fn from(err: RulesError) -> Self {
        Self::new(GameErrorKind::Protocol(err))
    }
}
