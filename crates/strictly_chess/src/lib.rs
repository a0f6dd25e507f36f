//! Strictly Chess - authoritative chess rules engine
//!
//! Pure game logic with no I/O: board and square model, per-piece move
//! rules, check detection, checkmate and stalemate search, and the
//! per-game [`GameState`] that a server serializes moves into.
//!
//! # Architecture
//!
//! - **Types**: colors, piece kinds, stable piece ids
//! - **Board**: 8x8 grid of `Option<Piece>` plus square notation
//! - **Rules**: a table of per-kind rule functions behind [`rules::move_piece`]
//! - **GameState**: board with id index, king cache, captures and history
//! - **Invariants**: properties asserted after every accepted move
//!
//! # Example
//!
//! ```
//! use strictly_chess::{GameState, MoveRequest, Termination};
//!
//! # fn example() -> Result<(), strictly_chess::RulesError> {
//! let mut state = GameState::new();
//! let mut last = None;
//! for text in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     let report = state.process_move(&MoveRequest::parse(text)?)?;
//!     assert!(report.is_valid());
//!     last = *report.termination();
//! }
//! assert!(matches!(last, Some(Termination::Checkmate { .. })));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
mod error;
pub mod invariants;
mod position;
pub mod rules;
mod state;
mod turn;
mod types;

pub use action::{Castle, MoveOutcome, MoveRequest};
pub use board::Board;
pub use error::RulesError;
pub use position::{Position, parse_long_algebraic};
pub use rules::{Termination, move_piece};
pub use state::{GameState, MoveLog};
pub use turn::MoveReport;
pub use types::{Color, Piece, PieceId, PieceKind};
