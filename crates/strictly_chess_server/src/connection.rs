//! Outbound delivery capability handed to the core by the transport.
//!
//! The core never owns socket lifecycle. It only asks a [`Connection`] to
//! queue a message or to close; both are fire-and-forget.

use crate::Message;
use derive_more::{Display, Error};
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Delivery failure: the peer is gone.
#[derive(Debug, Clone, Display, Error)]
#[display("Connection closed: {}", reason)]
pub struct SendError {
    /// Why delivery failed.
    pub reason: String,
}

impl SendError {
    /// Creates a send error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A client connection as seen by the core.
pub trait Connection: Send + Sync + Debug {
    /// Queues a message for delivery.
    fn send(&self, message: Message) -> Result<(), SendError>;

    /// Whether the connection can still deliver.
    fn is_open(&self) -> bool;

    /// Asks the transport to close the connection.
    fn close(&self);
}

/// Shared handle to a connection.
pub type ConnectionHandle = Arc<dyn Connection>;

/// Whether two handles refer to the same connection.
pub fn same_connection(a: &ConnectionHandle, b: &ConnectionHandle) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Frames queued for a transport writer task.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// A payload to encode and send.
    Message(Message),
    /// Close the socket.
    Close,
}

/// Connection backed by an unbounded channel drained by the transport.
#[derive(Debug, Clone)]
pub struct ChannelConnection {
    sender: mpsc::UnboundedSender<Outbound>,
}

impl ChannelConnection {
    /// Creates a connection and the receiver its writer task drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Connection for ChannelConnection {
    fn send(&self, message: Message) -> Result<(), SendError> {
        self.sender
            .send(Outbound::Message(message))
            .map_err(|_| SendError::new("writer task has stopped"))
    }

    fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    fn close(&self) {
        // Already closed if the writer is gone.
        let _ = self.sender.send(Outbound::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InitMessage, messages::GamePhase};

    #[tokio::test]
    async fn test_channel_connection_delivers_in_order() {
        let (connection, mut receiver) = ChannelConnection::new();
        let init = Message::from(InitMessage::new(GamePhase::Init, None, "g".into()));
        connection.send(init.clone()).expect("open");
        connection.close();
        assert_eq!(receiver.recv().await, Some(Outbound::Message(init)));
        assert_eq!(receiver.recv().await, Some(Outbound::Close));
    }

    #[test]
    fn test_send_after_receiver_dropped_fails() {
        let (connection, receiver) = ChannelConnection::new();
        drop(receiver);
        assert!(!connection.is_open());
        let init = Message::from(InitMessage::new(GamePhase::Init, None, "g".into()));
        assert!(connection.send(init).is_err());
    }

    #[test]
    fn test_handle_identity() {
        let (a, _ra) = ChannelConnection::new();
        let (b, _rb) = ChannelConnection::new();
        let a: ConnectionHandle = Arc::new(a);
        let b: ConnectionHandle = Arc::new(b);
        assert!(same_connection(&a, &a.clone()));
        assert!(!same_connection(&a, &b));
    }
}
