//! Messages collected under a lock and delivered after it is released.

use crate::connection::ConnectionHandle;
use crate::{Message, Player, UserId};
use tracing::{debug, warn};

#[derive(Debug)]
struct Delivery {
    user_id: Option<UserId>,
    connection: ConnectionHandle,
    message: Message,
}

/// Pending outbound messages.
///
/// Seats without a live connection are skipped when a message is queued.
#[derive(Debug, Default)]
pub struct Outbox {
    deliveries: Vec<Delivery>,
}

impl Outbox {
    /// Queues a message for a seat.
    pub fn to(&mut self, player: &Player, message: impl Into<Message>) {
        match player.connection() {
            Some(connection) => self.deliveries.push(Delivery {
                user_id: player.user_id().clone(),
                connection: connection.clone(),
                message: message.into(),
            }),
            None => debug!(user_id = ?player.user_id(), "Skipping seat without a live connection"),
        }
    }

    /// Queues a message for a connection that has no seat yet.
    pub fn to_connection(&mut self, user_id: &str, connection: &ConnectionHandle, message: impl Into<Message>) {
        self.deliveries.push(Delivery {
            user_id: Some(user_id.to_string()),
            connection: connection.clone(),
            message: message.into(),
        });
    }

    /// Queues the same message for both seats.
    pub fn to_both(&mut self, players: [&Player; 2], message: impl Into<Message>) {
        let message = message.into();
        self.to(players[0], message.clone());
        self.to(players[1], message);
    }

    /// Sends everything. A failed send is logged and does not stop the rest.
    pub fn flush(self) {
        for delivery in self.deliveries {
            if let Err(error) = delivery.connection.send(delivery.message) {
                warn!(user_id = ?delivery.user_id, %error, "Failed to deliver message");
            }
        }
    }
}
