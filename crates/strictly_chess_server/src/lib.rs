//! Strictly Chess Server - matchmaking and game sessions over WebSocket.
//!
//! The [`GamesManager`] pairs players, owns every [`Game`] and serializes
//! moves per game through the [`strictly_chess`] rules engine. Transports
//! hand it a [`Connection`] per client and route frames through a
//! [`SessionHandler`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use strictly_chess_server::{ChannelConnection, ConnectionHandle, GamesManager};
//!
//! let manager = GamesManager::default();
//! let (alice, _alice_rx) = ChannelConnection::new();
//! let (bob, _bob_rx) = ChannelConnection::new();
//! let alice: ConnectionHandle = Arc::new(alice);
//! let bob: ConnectionHandle = Arc::new(bob);
//!
//! let waiting = manager.connect_to_random_game("alice".into(), alice).unwrap();
//! let paired = manager.connect_to_random_game("bob".into(), bob).unwrap();
//! assert_eq!(waiting, paired);
//! assert_eq!(manager.active_game_count(), 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
mod config;
mod connection;
mod error;
mod game;
mod handler;
mod manager;
pub mod messages;
mod outbox;
mod player;
pub mod ws;

pub use config::{ConfigError, ServerConfig};
pub use connection::{
    ChannelConnection, Connection, ConnectionHandle, Outbound, SendError, same_connection,
};
pub use error::{GameError, GameErrorKind};
pub use game::Game;
pub use handler::{ConnectParams, SessionHandler};
pub use manager::{GamesManager, ManagerSettings};
pub use messages::{
    ChangeNameMessage, ChatEntriesMessage, ChatEntry, CommunicationErrorMessage, EndMessage,
    GameId, GameOver, InitMessage, Message, MoveMessage, UserId, Winner,
};
pub use outbox::Outbox;
pub use player::Player;
