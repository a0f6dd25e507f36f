//! A seat in a game.

use crate::connection::{ConnectionHandle, same_connection};
use crate::UserId;
use derive_getters::Getters;
use strictly_chess::Color;

/// One of the two seats of a game.
///
/// A seat can be reserved (for a rematch or custom room) before anyone has
/// connected to it; `has_joined_session` tells the two apart.
#[derive(Debug, Clone, Getters)]
pub struct Player {
    /// User occupying the seat.
    user_id: Option<UserId>,
    /// Live connection, if joined and not disconnected.
    #[getter(skip)]
    connection: Option<ConnectionHandle>,
    /// Display name.
    username: Option<String>,
    /// Color played from this seat.
    color: Color,
    /// Offered a rematch of this game.
    offered_rematch: bool,
    /// Joined the rematch game provisioned from this one.
    connected_to_rematch: bool,
    /// Has an outstanding draw offer.
    offered_draw: bool,
    /// Draw offers made so far.
    draw_offer_count: u32,
    /// A connection has taken the seat.
    has_joined_session: bool,
    /// Asked to resign and awaits confirmation.
    pending_resignation: bool,
}

impl Player {
    /// Creates a joined player.
    pub fn new(user_id: UserId, connection: ConnectionHandle, color: Color) -> Self {
        Self {
            user_id: Some(user_id),
            connection: Some(connection),
            has_joined_session: true,
            ..Self::vacant(color)
        }
    }

    /// Creates an empty seat.
    pub fn vacant(color: Color) -> Self {
        Self {
            user_id: None,
            connection: None,
            username: None,
            color,
            offered_rematch: false,
            connected_to_rematch: false,
            offered_draw: false,
            draw_offer_count: 0,
            has_joined_session: false,
            pending_resignation: false,
        }
    }

    /// Creates a seat reserved for a known user who has not connected yet.
    pub fn reserved(color: Color, user_id: Option<UserId>) -> Self {
        Self {
            user_id,
            ..Self::vacant(color)
        }
    }

    /// Seats a connection.
    pub fn join(&mut self, user_id: UserId, connection: ConnectionHandle) {
        self.user_id = Some(user_id);
        self.connection = Some(connection);
        self.has_joined_session = true;
    }

    /// Whether the seat belongs to `user_id`.
    pub fn is_user(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }

    /// Whether the seat is held through `connection`.
    pub fn holds_connection(&self, connection: &ConnectionHandle) -> bool {
        self.connection
            .as_ref()
            .is_some_and(|own| same_connection(own, connection))
    }

    /// Live connection, if any.
    pub fn connection(&self) -> Option<&ConnectionHandle> {
        self.connection.as_ref().filter(|c| c.is_open())
    }

    pub(crate) fn set_username(&mut self, name: String) {
        self.username = Some(name);
    }

    pub(crate) fn set_offered_rematch(&mut self, offered: bool) {
        self.offered_rematch = offered;
    }

    pub(crate) fn set_connected_to_rematch(&mut self, connected: bool) {
        self.connected_to_rematch = connected;
    }

    pub(crate) fn set_offered_draw(&mut self, offered: bool) {
        self.offered_draw = offered;
    }

    pub(crate) fn record_draw_offer(&mut self) {
        self.offered_draw = true;
        self.draw_offer_count += 1;
    }

    pub(crate) fn set_pending_resignation(&mut self, pending: bool) {
        self.pending_resignation = pending;
    }
}
