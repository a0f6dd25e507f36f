//! Transport-facing entry points: connect, message, disconnect.

use crate::connection::ConnectionHandle;
use crate::messages::{CommunicationErrorMessage, EndMessage};
use crate::{GameError, GamesManager, Message, Outbox, UserId};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Query parameters of a connection request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectParams {
    /// Join this provisioned rematch game.
    pub rematch_game_id: Option<String>,
    /// Create or join this custom room.
    pub custom_game_id: Option<String>,
    /// The caller may create the custom room.
    #[serde(default)]
    pub is_creator: bool,
}

/// Routes connection events to the games manager and reports failures to
/// the offending client.
#[derive(Debug, Clone)]
pub struct SessionHandler {
    manager: GamesManager,
}

impl SessionHandler {
    /// Creates a handler over a manager.
    pub fn new(manager: GamesManager) -> Self {
        Self { manager }
    }

    /// Underlying manager.
    pub fn manager(&self) -> &GamesManager {
        &self.manager
    }

    /// Handles a new connection. Returns whether it should stay open.
    #[instrument(skip(self, connection))]
    pub fn on_player_connect(
        &self,
        user_id: UserId,
        connection: ConnectionHandle,
        params: ConnectParams,
    ) -> bool {
        let result = if let Some(game_id) = &params.rematch_game_id {
            self.manager
                .connect_to_rematch_game(game_id, user_id.clone(), connection.clone())
        } else if let Some(game_id) = &params.custom_game_id {
            self.manager.connect_to_custom_game(
                game_id,
                params.is_creator,
                user_id.clone(),
                connection.clone(),
            )
        } else {
            self.manager
                .connect_to_random_game(user_id.clone(), connection.clone())
                .map(|_| ())
        };
        self.settle(&user_id, &connection, result)
    }

    /// Handles an inbound frame. Returns whether the connection should stay
    /// open.
    #[instrument(skip(self, connection, message), fields(game_id = message.game_id()))]
    pub fn on_player_message(
        &self,
        user_id: &str,
        connection: &ConnectionHandle,
        message: Message,
    ) -> bool {
        let result = match message {
            Message::Move(request) => self.manager.process_turn(user_id, request),
            Message::End(end) => self.dispatch_end(user_id, end),
            Message::ChangeName(rename) => self.manager.change_player_name(user_id, rename),
            Message::ChatEntries(chat) => self.manager.relay_chat(user_id, chat),
            Message::Init(_) | Message::CommunicationError(_) => {
                debug!(user_id, "Ignoring client frame with no server action");
                Ok(())
            }
        };
        self.settle(user_id, connection, result)
    }

    /// Handles a dropped connection.
    #[instrument(skip(self, connection))]
    pub fn on_player_disconnect(&self, user_id: &str, connection: &ConnectionHandle) {
        self.manager.close_game_upon_disconnect(user_id, connection);
    }

    fn dispatch_end(&self, user_id: &str, end: EndMessage) -> Result<(), GameError> {
        let game_id = end.game_id.clone();
        if end.left_game || end.close {
            self.manager.close_game(user_id, end)
        } else if end.rematch {
            self.manager.offer_rematch(&game_id, user_id)
        } else if end.offer_draw {
            self.manager.offer_draw(&game_id, user_id)
        } else if end.draw_denied {
            self.manager.deny_draw_offer(&game_id, user_id)
        } else if end.resign {
            self.manager.request_resignation(&game_id, user_id)
        } else if end.resign_confirm {
            self.manager.resignation_confirm(&game_id, user_id)
        } else if end.timeout {
            self.manager.timeout_end(user_id, end)
        } else {
            self.manager.broadcast_end(user_id, end)
        }
    }

    fn settle(&self, user_id: &str, connection: &ConnectionHandle, result: Result<(), GameError>) -> bool {
        match result {
            Ok(()) => true,
            Err(error) => !Self::report_error(user_id, connection, &error),
        }
    }

    /// Sends the user-facing text of `error` and closes the connection when
    /// the error calls for it. Returns whether the connection was closed.
    fn report_error(user_id: &str, connection: &ConnectionHandle, error: &GameError) -> bool {
        warn!(user_id, %error, "Session operation failed");
        let mut outbox = Outbox::default();
        outbox.to_connection(
            user_id,
            connection,
            CommunicationErrorMessage {
                user_message: error.user_message(),
            },
        );
        outbox.flush();
        let close = error.closes_connection();
        if close {
            connection.close();
        }
        close
    }
}
