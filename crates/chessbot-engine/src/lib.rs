//! Chess engine adapter.
//!
//! [`MoveEngine`] is the narrow capability the pipeline depends on;
//! [`UciEngine`] implements it by driving a UCI engine (e.g. Stockfish) as a
//! child process. Positions are checked with [`validate_fen`] before they
//! are sent, so a malformed or illegal position never reaches the engine.

mod engine;
mod error;
mod params;
mod process;
mod uci;
mod validate;

pub use engine::MoveEngine;
pub use error::EngineError;
pub use params::{EngineParams, SearchLimit};
pub use process::UciEngine;
pub use uci::{parse_best_move, UciCommand, UciResponse};
pub use validate::{validate_fen, PositionCheck};
