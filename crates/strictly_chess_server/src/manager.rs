//! Matchmaking, game registry and session lifecycle.
//!
//! Shared state lives behind three kinds of mutex, always taken in this
//! order: the waiting queue, the game registry, then a single game. A game
//! lock is never held while taking the registry lock. Messages produced
//! under a lock go into an [`Outbox`] and are sent after every lock is
//! released.

use crate::connection::ConnectionHandle;
use crate::messages::{
    CastleMessage, ChangeNameMessage, ChatEntriesMessage, EndMessage, GameOver, GamePhase,
    InitMessage, MoveEnd, MoveMessage, Winner,
};
use crate::{Game, GameError, GameId, Outbox, Player, UserId};
use derive_getters::Getters;
use derive_new::new;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use strictly_chess::{Color, MoveRequest, Position, Termination};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Tunables of the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, new)]
pub struct ManagerSettings {
    /// Draw offers allowed per player per game.
    max_draw_offers: u32,
    /// How long a provisioned rematch may sit with no player joined before
    /// it is dropped from the registry.
    rematch_claim_timeout: Duration,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(60))
    }
}

#[derive(Debug)]
struct WaitingPlayer {
    game_id: GameId,
    player: Player,
}

type SharedGame = Arc<Mutex<Game>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn new_game_id() -> GameId {
    Uuid::new_v4().to_string()
}

/// Manages waiting players and all games.
#[derive(Debug, Clone)]
pub struct GamesManager {
    waiting: Arc<Mutex<VecDeque<WaitingPlayer>>>,
    games: Arc<Mutex<HashMap<GameId, SharedGame>>>,
    settings: ManagerSettings,
}

impl GamesManager {
    /// Creates an empty manager.
    #[instrument]
    pub fn new(settings: ManagerSettings) -> Self {
        info!("Creating games manager");
        Self {
            waiting: Arc::new(Mutex::new(VecDeque::new())),
            games: Arc::new(Mutex::new(HashMap::new())),
            settings,
        }
    }

    /// Manager settings.
    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    /// Looks up a game without holding the registry lock afterwards.
    fn game(&self, game_id: &str) -> Result<SharedGame, GameError> {
        lock(&self.games).get(game_id).cloned().ok_or_else(|| {
            warn!(game_id, "Game not found");
            GameError::game_not_found(game_id)
        })
    }

    /// Removes a game from the registry.
    fn remove_game(&self, game_id: &str) -> Option<SharedGame> {
        let removed = lock(&self.games).remove(game_id);
        if removed.is_some() {
            info!(game_id, "Removed game from registry");
        }
        removed
    }

    /// Drops rematch games nobody joined within the claim window.
    fn reap_unclaimed_rematches(&self) {
        let timeout = *self.settings.rematch_claim_timeout();
        lock(&self.games).retain(|game_id, shared| {
            let game = lock(&**shared);
            let stale = game.is_unclaimed() && game.age() >= timeout;
            if stale {
                info!(%game_id, "Dropping unclaimed rematch game");
            }
            !stale
        });
    }

    /// Takes `user_id` out of the waiting queue and out of every unfinished
    /// game they joined, other than `except`. Opponents of a left game are
    /// told the player left.
    fn leave_current_games(&self, user_id: &str, except: Option<&str>, outbox: &mut Outbox) {
        lock(&self.waiting).retain(|w| !w.player.is_user(user_id));

        let left: Vec<SharedGame> = {
            let mut games = lock(&self.games);
            let ids: Vec<GameId> = games
                .iter()
                .filter(|(id, _)| except != Some(id.as_str()))
                .filter(|(_, game)| lock(game).is_live_for(user_id))
                .map(|(id, _)| id.clone())
                .collect();
            ids.iter().filter_map(|id| games.remove(id)).collect()
        };
        for game in left {
            let game = lock(&game);
            let end = EndMessage {
                left_game: true,
                ..EndMessage::new(game.id().clone())
            };
            for player in game.players() {
                if !player.is_user(user_id) {
                    outbox.to(player, end.clone());
                }
            }
            info!(game_id = %game.id(), user_id, "Player left an unfinished game to join another");
        }
    }

    /// Pairs the caller with the oldest waiting player, or queues them.
    ///
    /// A queued player gets an `INIT` carrying the id the game will have.
    /// When paired, the newcomer plays Black and both sides get `START`.
    #[instrument(skip(self, connection))]
    pub fn connect_to_random_game(
        &self,
        user_id: UserId,
        connection: ConnectionHandle,
    ) -> Result<GameId, GameError> {
        let mut outbox = Outbox::default();
        self.leave_current_games(&user_id, None, &mut outbox);
        let game_id = {
            let mut waiting = lock(&self.waiting);
            waiting.retain(|w| !w.player.is_user(&user_id));
            match waiting.pop_front() {
                None => {
                    let game_id = new_game_id();
                    let player = Player::new(user_id.clone(), connection, Color::White);
                    outbox.to(&player, InitMessage::new(GamePhase::Init, Some(Color::White), game_id.clone()));
                    waiting.push_back(WaitingPlayer {
                        game_id: game_id.clone(),
                        player,
                    });
                    info!(%user_id, %game_id, waiting = waiting.len(), "Player waiting for an opponent");
                    game_id
                }
                Some(matched) => {
                    let black = Player::new(user_id.clone(), connection, Color::Black);
                    let game = Game::new(matched.game_id.clone(), matched.player, black);
                    for player in game.players() {
                        outbox.to(player, InitMessage::new(GamePhase::Start, Some(*player.color()), game.id().clone()));
                    }
                    let game_id = game.id().clone();
                    let mut games = lock(&self.games);
                    games.insert(game_id.clone(), Arc::new(Mutex::new(game)));
                    info!(%user_id, %game_id, active_games = games.len(), "Match formed");
                    game_id
                }
            }
        };
        outbox.flush();
        Ok(game_id)
    }

    /// Seats the caller in a provisioned rematch game.
    #[instrument(skip(self, connection))]
    pub fn connect_to_rematch_game(
        &self,
        game_id: &str,
        user_id: UserId,
        connection: ConnectionHandle,
    ) -> Result<(), GameError> {
        let game = self.game(game_id)?;
        let mut outbox = Outbox::default();
        self.leave_current_games(&user_id, Some(game_id), &mut outbox);
        {
            let mut game = lock(&game);
            let seat = Self::join_seat(&mut game, user_id, connection, &mut outbox)?;
            game.player_mut(seat).set_connected_to_rematch(true);
        }
        outbox.flush();
        Ok(())
    }

    /// Creates or joins a room keyed by a caller-supplied id.
    ///
    /// Only a creator may bring a missing room into existence; the creator
    /// plays White.
    #[instrument(skip(self, connection))]
    pub fn connect_to_custom_game(
        &self,
        game_id: &str,
        is_creator: bool,
        user_id: UserId,
        connection: ConnectionHandle,
    ) -> Result<(), GameError> {
        let mut outbox = Outbox::default();
        if is_creator || lock(&self.games).contains_key(game_id) {
            self.leave_current_games(&user_id, Some(game_id), &mut outbox);
        }
        let existing = {
            let mut games = lock(&self.games);
            match games.get(game_id) {
                Some(game) => Some(game.clone()),
                None if is_creator => {
                    let creator = Player::new(user_id.clone(), connection.clone(), Color::White);
                    outbox.to(&creator, InitMessage::new(GamePhase::Init, Some(Color::White), game_id.to_string()));
                    let game = Game::new(game_id.to_string(), creator, Player::vacant(Color::Black));
                    games.insert(game_id.to_string(), Arc::new(Mutex::new(game)));
                    info!(%user_id, game_id, "Custom game created");
                    None
                }
                None => {
                    warn!(%user_id, game_id, "Custom game does not exist");
                    return Err(GameError::bad_custom_game(game_id));
                }
            }
        };
        if let Some(game) = existing {
            let mut game = lock(&game);
            Self::join_seat(&mut game, user_id, connection, &mut outbox)?;
        }
        outbox.flush();
        Ok(())
    }

    /// Fills a seat of a reserved game. `INIT` to a lone joiner, `START` to
    /// both once the second seat fills.
    fn join_seat(
        game: &mut Game,
        user_id: UserId,
        connection: ConnectionHandle,
        outbox: &mut Outbox,
    ) -> Result<Color, GameError> {
        let Some(seat) = game.seat_for_join(&user_id) else {
            error!(game_id = %game.id(), %user_id, "Both seats already joined");
            return Err(GameError::invalid_state(format!(
                "Both players of game {} have already joined",
                game.id()
            )));
        };
        game.player_mut(seat).join(user_id.clone(), connection);
        if game.is_full() {
            for player in game.players() {
                outbox.to(player, InitMessage::new(GamePhase::Start, Some(*player.color()), game.id().clone()));
            }
            info!(game_id = %game.id(), %user_id, "Both players joined, game starts");
        } else {
            outbox.to(game.player(seat), InitMessage::new(GamePhase::Init, Some(seat), game.id().clone()));
            info!(game_id = %game.id(), %user_id, "First player joined, waiting for opponent");
        }
        Ok(seat)
    }

    /// Seat of `user_id` in `game`, or `InvalidGameState` for outsiders.
    #[track_caller]
    fn participant(game: &Game, user_id: &str) -> Result<Color, GameError> {
        game.seat_of(user_id).ok_or_else(|| {
            warn!(game_id = %game.id(), user_id, "User is not part of this game");
            GameError::invalid_state(format!("User {user_id} is not part of game {}", game.id()))
        })
    }

    /// Validates and applies a move, then reports it to both players.
    ///
    /// A move out of turn or an illegal move is echoed back to the mover
    /// with `valid: false`. Checkmate and stalemate end the game and are
    /// followed by an End message.
    #[instrument(skip(self, request), fields(game_id = %request.game_id, from = %request.square_from, to = %request.square_to))]
    pub fn process_turn(&self, user_id: &str, request: MoveMessage) -> Result<(), GameError> {
        let game = self.game(&request.game_id)?;
        let from = Position::from_notation(&request.square_from)?;
        let to = Position::from_notation(&request.square_to)?;
        let mut move_request = MoveRequest::new(from, to);
        if let Some(token) = &request.promotion {
            move_request = move_request.with_promotion(token.clone());
        }

        let mut outbox = Outbox::default();
        {
            let mut game = lock(&game);
            if game.result().is_some() {
                warn!(user_id, "Move after the game ended");
                return Err(GameError::invalid_state(format!("Game {} is already over", game.id())));
            }
            let seat = Self::participant(&game, user_id)?;
            let turn = game.state().turn();
            if seat != turn {
                debug!(user_id, ?seat, ?turn, "Move out of turn");
                let reply = Self::move_reply(&game, request, false);
                outbox.to(game.player(seat), reply);
                drop(game);
                outbox.flush();
                return Ok(());
            }

            let report = game.state.process_move(&move_request)?;
            let mut reply = Self::move_reply(&game, request, report.is_valid());
            if !report.is_valid() {
                outbox.to(game.player(seat), reply);
            } else {
                let outcome = report.outcome();
                reply.en_passant_capture_pos = outcome.en_passant_capture().as_ref().map(|p| p.to_notation());
                reply.promotion = outcome.promotion().as_ref().map(|id| id.to_string());
                reply.castle = outcome.castle().as_ref().map(|castle| CastleMessage {
                    rook: castle.rook().to_string(),
                    rook_pos_start: castle.rook_from().to_notation(),
                    rook_pos_end: castle.rook_to().to_notation(),
                });
                reply.end = report.termination().as_ref().map(|t| match t {
                    Termination::Checkmate { .. } => MoveEnd::Checkmate,
                    Termination::Stalemate => MoveEnd::Stalemate,
                });
                outbox.to_both(game.players(), reply);

                if let Some(termination) = report.termination() {
                    let result = match termination {
                        Termination::Checkmate { winner } => GameOver::new(Winner::from(*winner), "Checkmate"),
                        Termination::Stalemate => GameOver::new(Winner::Draw, "Stalemate"),
                    };
                    game.finish(result.clone());
                    let end = EndMessage {
                        ended: true,
                        game_over: Some(result),
                        ..EndMessage::new(game.id().clone())
                    };
                    outbox.to_both(game.players(), end);
                }
            }
        }
        outbox.flush();
        Ok(())
    }

    /// Builds the verdict echo of a move request from the current state.
    fn move_reply(game: &Game, request: MoveMessage, valid: bool) -> MoveMessage {
        let state = game.state();
        let ids = |color: Color| state.captures(color).iter().map(|id| id.to_string()).collect();
        MoveMessage {
            valid: Some(valid),
            en_passant_capture_pos: None,
            promotion: None,
            castle: None,
            end: None,
            white_captures: ids(Color::White),
            black_captures: ids(Color::Black),
            turn: Some(state.turn()),
            ..request
        }
    }

    /// Records a rematch offer. Once both players have offered, a fresh game
    /// with swapped colors is provisioned and announced to both.
    #[instrument(skip(self))]
    pub fn offer_rematch(&self, game_id: &str, user_id: &str) -> Result<(), GameError> {
        let game = self.game(game_id)?;
        let mut outbox = Outbox::default();
        let provisioned = {
            let mut game = lock(&game);
            let seat = Self::participant(&game, user_id)?;
            game.player_mut(seat).set_offered_rematch(true);
            let opponent = seat.opponent();

            if *game.player(opponent).offered_rematch() {
                let rematch_id = new_game_id();
                let white = Player::reserved(Color::White, game.player(Color::Black).user_id().clone());
                let black = Player::reserved(Color::Black, game.player(Color::White).user_id().clone());
                for color in [Color::White, Color::Black] {
                    game.player_mut(color).set_offered_rematch(false);
                }
                let end = EndMessage {
                    rematch_success: true,
                    rematch_game_id: Some(rematch_id.clone()),
                    ..EndMessage::new(game_id.to_string())
                };
                outbox.to_both(game.players(), end);
                game.set_rematch_id(rematch_id.clone());
                info!(game_id, %rematch_id, "Rematch accepted, provisioning new game");
                Some(Game::new(rematch_id, white, black))
            } else {
                let end = EndMessage {
                    rematch: true,
                    ..EndMessage::new(game_id.to_string())
                };
                outbox.to(game.player(opponent), end);
                info!(game_id, user_id, "Rematch offered");
                None
            }
        };
        if let Some(rematch) = provisioned {
            self.reap_unclaimed_rematches();
            lock(&self.games).insert(rematch.id().clone(), Arc::new(Mutex::new(rematch)));
        }
        outbox.flush();
        Ok(())
    }

    /// Records a draw offer. Mutual offers end the game as a draw; offers
    /// past the per-player cap are refused.
    #[instrument(skip(self))]
    pub fn offer_draw(&self, game_id: &str, user_id: &str) -> Result<(), GameError> {
        let game = self.game(game_id)?;
        let mut outbox = Outbox::default();
        {
            let mut game = lock(&game);
            let seat = Self::participant(&game, user_id)?;
            if game.result().is_some() {
                return Err(GameError::invalid_state(format!("Game {game_id} is already over")));
            }
            let opponent = seat.opponent();
            let offers = *game.player(seat).draw_offer_count();

            if offers >= *self.settings.max_draw_offers() {
                warn!(user_id, offers, "Draw offer refused, limit reached");
                let end = EndMessage {
                    draw_denied: true,
                    ..EndMessage::new(game_id.to_string())
                };
                outbox.to(game.player(seat), end);
            } else if *game.player(opponent).offered_draw() {
                game.player_mut(seat).record_draw_offer();
                for color in [Color::White, Color::Black] {
                    game.player_mut(color).set_offered_draw(false);
                }
                let result = GameOver::new(Winner::Draw, "Draw by agreement");
                game.finish(result.clone());
                let end = EndMessage {
                    ended: true,
                    draw_accepted: true,
                    game_over: Some(result),
                    ..EndMessage::new(game_id.to_string())
                };
                outbox.to_both(game.players(), end);
                info!(game_id, "Draw agreed");
            } else {
                game.player_mut(seat).record_draw_offer();
                let end = EndMessage {
                    offer_draw: true,
                    ..EndMessage::new(game_id.to_string())
                };
                outbox.to(game.player(opponent), end);
                info!(game_id, user_id, offers = offers + 1, "Draw offered");
            }
        }
        outbox.flush();
        Ok(())
    }

    /// Declines the opponent's draw offer.
    #[instrument(skip(self))]
    pub fn deny_draw_offer(&self, game_id: &str, user_id: &str) -> Result<(), GameError> {
        let game = self.game(game_id)?;
        let mut outbox = Outbox::default();
        {
            let mut game = lock(&game);
            let seat = Self::participant(&game, user_id)?;
            for color in [Color::White, Color::Black] {
                game.player_mut(color).set_offered_draw(false);
            }
            let end = EndMessage {
                draw_denied: true,
                ..EndMessage::new(game_id.to_string())
            };
            outbox.to(game.player(seat.opponent()), end);
            info!(game_id, user_id, "Draw offer declined");
        }
        outbox.flush();
        Ok(())
    }

    /// Asks the requester to confirm resignation.
    #[instrument(skip(self))]
    pub fn request_resignation(&self, game_id: &str, user_id: &str) -> Result<(), GameError> {
        let game = self.game(game_id)?;
        let mut outbox = Outbox::default();
        {
            let mut game = lock(&game);
            let seat = Self::participant(&game, user_id)?;
            game.player_mut(seat).set_pending_resignation(true);
            let end = EndMessage {
                resign: true,
                ..EndMessage::new(game_id.to_string())
            };
            outbox.to(game.player(seat), end);
            debug!(user_id, "Resignation awaiting confirmation");
        }
        outbox.flush();
        Ok(())
    }

    /// Ends the game with the confirming player as loser and removes it.
    #[instrument(skip(self))]
    pub fn resignation_confirm(&self, game_id: &str, user_id: &str) -> Result<(), GameError> {
        let game = self.game(game_id)?;
        let mut outbox = Outbox::default();
        {
            let mut game = lock(&game);
            let Some(seat) = game.seat_of(user_id) else {
                error!(game_id, user_id, "Resignation confirmed by a non-participant");
                return Err(GameError::invalid_state(format!(
                    "User {user_id} cannot resign game {game_id}"
                )));
            };
            game.player_mut(seat).set_pending_resignation(false);
            let result = GameOver::new(Winner::from(seat.opponent()), "Resignation");
            game.finish(result.clone());
            let end = EndMessage {
                ended: true,
                resign_confirm: true,
                game_over: Some(result),
                ..EndMessage::new(game_id.to_string())
            };
            outbox.to_both(game.players(), end);
            info!(game_id, user_id, "Player resigned");
        }
        self.remove_game(game_id);
        self.reap_unclaimed_rematches();
        outbox.flush();
        Ok(())
    }

    /// Ends the game on a clock flag and relays the End to both players.
    ///
    /// The payload's `gameOver` is used when present; otherwise the side to
    /// move, whose clock was running, loses.
    #[instrument(skip(self, end), fields(game_id = %end.game_id))]
    pub fn timeout_end(&self, user_id: &str, end: EndMessage) -> Result<(), GameError> {
        let game = self.game(&end.game_id)?;
        let mut outbox = Outbox::default();
        {
            let mut game = lock(&game);
            Self::participant(&game, user_id)?;
            if game.result().is_some() {
                debug!("Timeout after the game ended, ignoring");
                return Ok(());
            }
            let result = end.game_over.clone().unwrap_or_else(|| {
                GameOver::new(Winner::from(game.state().turn().opponent()), "Timeout")
            });
            game.finish(result.clone());
            let end = EndMessage {
                timeout: true,
                ended: true,
                game_over: Some(result),
                ..end
            };
            outbox.to_both(game.players(), end);
        }
        outbox.flush();
        Ok(())
    }

    /// Relays a player's End message unchanged to both players.
    ///
    /// Results and rematch announcements are produced by the server only,
    /// so a relayed End carrying `ended`, `gameOver`, `rematchSuccess` or
    /// `rematchGameId` is refused.
    #[instrument(skip(self, end), fields(game_id = %end.game_id))]
    pub fn broadcast_end(&self, user_id: &str, end: EndMessage) -> Result<(), GameError> {
        let game = self.game(&end.game_id)?;
        let mut outbox = Outbox::default();
        {
            let game = lock(&game);
            Self::participant(&game, user_id)?;
            if end.ended || end.game_over.is_some() || end.rematch_success || end.rematch_game_id.is_some() {
                warn!(user_id, "Client tried to announce a result");
                return Err(GameError::invalid_state(format!(
                    "User {user_id} cannot announce the outcome of game {}",
                    game.id()
                )));
            }
            outbox.to_both(game.players(), end);
        }
        outbox.flush();
        Ok(())
    }

    /// Closes a game on request: removes it, drops its players from the
    /// waiting queue, notifies the other side and closes both connections.
    #[instrument(skip(self, end), fields(game_id = %end.game_id))]
    pub fn close_game(&self, user_id: &str, end: EndMessage) -> Result<(), GameError> {
        let game_id = end.game_id.clone();
        {
            let game = self.game(&game_id)?;
            Self::participant(&lock(&game), user_id)?;
        }
        let removed = self.remove_game(&game_id).ok_or_else(|| {
            error!(%game_id, "Trying to close a game that is not registered");
            GameError::game_not_found(game_id.as_str())
        })?;

        let mut outbox = Outbox::default();
        let (connections, users) = {
            let game = lock(&removed);
            for player in game.players() {
                if !player.is_user(user_id) {
                    outbox.to(player, end.clone());
                }
            }
            let connections: Vec<ConnectionHandle> =
                game.players().iter().filter_map(|p| p.connection().cloned()).collect();
            let users: Vec<UserId> =
                game.players().iter().filter_map(|p| p.user_id().clone()).collect();
            (connections, users)
        };
        lock(&self.waiting).retain(|w| !users.iter().any(|u| w.player.is_user(u)));
        self.reap_unclaimed_rematches();
        outbox.flush();
        for connection in connections {
            connection.close();
        }
        info!(%game_id, user_id, "Game closed");
        Ok(())
    }

    /// Cleans up after a dropped connection: leaves the waiting queue and
    /// removes every game seated through it, telling opponents they left.
    #[instrument(skip(self, connection))]
    pub fn close_game_upon_disconnect(&self, user_id: &str, connection: &ConnectionHandle) {
        lock(&self.waiting).retain(|w| !w.player.holds_connection(connection));

        let mut outbox = Outbox::default();
        let affected: Vec<SharedGame> = {
            let mut games = lock(&self.games);
            let ids: Vec<GameId> = games
                .iter()
                .filter(|(_, game)| lock(game).players().iter().any(|p| p.holds_connection(connection)))
                .map(|(id, _)| id.clone())
                .collect();
            ids.iter().filter_map(|id| games.remove(id)).collect()
        };
        for game in affected {
            let game = lock(&game);
            let end = EndMessage {
                left_game: true,
                ..EndMessage::new(game.id().clone())
            };
            for player in game.players() {
                if !player.holds_connection(connection) {
                    outbox.to(player, end.clone());
                }
            }
            info!(game_id = %game.id(), user_id, "Game removed after disconnect");
        }
        self.reap_unclaimed_rematches();
        outbox.flush();
    }

    /// Renames a player and forwards the change to the opponent.
    #[instrument(skip(self, message), fields(game_id = %message.game_id))]
    pub fn change_player_name(&self, user_id: &str, message: ChangeNameMessage) -> Result<(), GameError> {
        let game = self.game(&message.game_id)?;
        let mut outbox = Outbox::default();
        {
            let mut game = lock(&game);
            let seat = Self::participant(&game, user_id)?;
            game.player_mut(seat).set_username(message.name.clone());
            outbox.to(game.player(seat.opponent()), message);
        }
        outbox.flush();
        Ok(())
    }

    /// Stores chat lines and forwards them to the opponent.
    #[instrument(skip(self, message), fields(game_id = %message.game_id))]
    pub fn relay_chat(&self, user_id: &str, message: ChatEntriesMessage) -> Result<(), GameError> {
        let game = self.game(&message.game_id)?;
        let mut outbox = Outbox::default();
        {
            let mut game = lock(&game);
            let seat = Self::participant(&game, user_id)?;
            game.append_chat(&message.entries);
            outbox.to(game.player(seat.opponent()), message);
        }
        outbox.flush();
        Ok(())
    }

    /// Players waiting for a random opponent.
    pub fn waiting_count(&self) -> usize {
        lock(&self.waiting).len()
    }

    /// Games in the registry.
    pub fn active_game_count(&self) -> usize {
        lock(&self.games).len()
    }

    /// Copy of a game's current state.
    pub fn game_snapshot(&self, game_id: &str) -> Option<Game> {
        let game = lock(&self.games).get(game_id).cloned()?;
        let snapshot = lock(&game).clone();
        Some(snapshot)
    }
}

impl Default for GamesManager {
    fn default() -> Self {
        Self::new(ManagerSettings::default())
    }
}
