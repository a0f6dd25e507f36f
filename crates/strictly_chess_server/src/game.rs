//! A game: two seats, one authoritative chess state.

use crate::messages::{ChatEntry, GameOver};
use crate::{GameId, Player};
use std::time::{Duration, Instant};
use strictly_chess::{Color, GameState};
use tracing::{info, instrument};

/// One game session.
///
/// Seats are indexed by color. The chess state is only touched while the
/// game's mutex is held by the manager.
#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    players: [Player; 2],
    pub(crate) state: GameState,
    chat: Vec<ChatEntry>,
    result: Option<GameOver>,
    rematch_id: Option<GameId>,
    created_at: Instant,
}

impl Game {
    /// Creates a game from the standard position.
    ///
    /// Seats are placed by their own color, whatever the argument order.
    #[instrument(skip(first, second))]
    pub fn new(id: GameId, first: Player, second: Player) -> Self {
        info!(game_id = %id, "Creating new game");
        let players = if *first.color() == Color::White {
            [first, second]
        } else {
            [second, first]
        };
        Self {
            id,
            players,
            state: GameState::new(),
            chat: Vec::new(),
            result: None,
            rematch_id: None,
            created_at: Instant::now(),
        }
    }

    /// Game id.
    pub fn id(&self) -> &GameId {
        &self.id
    }

    /// Seat playing `color`.
    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    pub(crate) fn player_mut(&mut self, color: Color) -> &mut Player {
        &mut self.players[color.index()]
    }

    /// Both seats, White first.
    pub fn players(&self) -> [&Player; 2] {
        [&self.players[0], &self.players[1]]
    }

    /// Color of the seat held by `user_id`.
    pub fn seat_of(&self, user_id: &str) -> Option<Color> {
        self.players
            .iter()
            .find(|p| p.is_user(user_id))
            .map(|p| *p.color())
    }

    /// Seat a connecting user should take: one reserved for them, else the
    /// first unjoined seat. A user who already joined gets no second seat.
    pub fn seat_for_join(&self, user_id: &str) -> Option<Color> {
        let open = |p: &&Player| !*p.has_joined_session();
        if self.players.iter().any(|p| !open(&p) && p.is_user(user_id)) {
            return None;
        }
        self.players
            .iter()
            .filter(open)
            .find(|p| p.is_user(user_id))
            .or_else(|| self.players.iter().find(|p| open(p) && p.user_id().is_none()))
            .or_else(|| self.players.iter().find(open))
            .map(|p| *p.color())
    }

    /// Whether both seats have joined.
    pub fn is_full(&self) -> bool {
        self.players.iter().all(|p| *p.has_joined_session())
    }

    /// Authoritative chess state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Chat lines relayed so far.
    pub fn chat(&self) -> &[ChatEntry] {
        &self.chat
    }

    pub(crate) fn append_chat(&mut self, entries: &[ChatEntry]) {
        self.chat.extend_from_slice(entries);
    }

    /// Final result, once the game is over.
    pub fn result(&self) -> Option<&GameOver> {
        self.result.as_ref()
    }

    /// Id of the rematch game provisioned from this one.
    pub fn rematch_id(&self) -> Option<&GameId> {
        self.rematch_id.as_ref()
    }

    pub(crate) fn set_rematch_id(&mut self, rematch_id: GameId) {
        self.rematch_id = Some(rematch_id);
    }

    /// Time since the game was created.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Whether nobody has joined either seat yet.
    pub fn is_unclaimed(&self) -> bool {
        self.players.iter().all(|p| !*p.has_joined_session())
    }

    /// Whether `user_id` has joined a seat of a game still in progress.
    pub fn is_live_for(&self, user_id: &str) -> bool {
        self.result.is_none()
            && self
                .players
                .iter()
                .any(|p| p.is_user(user_id) && *p.has_joined_session())
    }

    pub(crate) fn finish(&mut self, result: GameOver) {
        info!(game_id = %self.id, winner = ?result.winner, result = %result.result, "Game over");
        self.result = Some(result);
    }
}
