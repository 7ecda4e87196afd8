//! Board recognition: detector boxes → 8×8 grid → FEN.
//!
//! ## Quickstart
//!
//! ```
//! use chessbot_board::{BoardParams, BoardRecognizer};
//! use chessbot_core::{BoundingBox, Color, Detection};
//!
//! let detections = vec![
//!     Detection::new(BoundingBox::new(0.0, 0.0, 800.0, 800.0), "Chess_Board"),
//!     Detection::new(BoundingBox::new(410.0, 710.0, 490.0, 790.0), "White_King"),
//!     Detection::new(BoundingBox::new(410.0, 10.0, 490.0, 90.0), "Black_King"),
//! ];
//! let recognizer = BoardRecognizer::new(BoardParams::default());
//! let rec = recognizer.recognize(&detections, Color::White).unwrap();
//! assert_eq!(rec.position.to_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
//! ```
//!
//! Algorithm:
//! 1. Pick the detection carrying the board label; divide its box into 8×8
//!    equal squares with the top-left corner as origin.
//! 2. Bin every piece detection by its box centre. Image rows grow
//!    downwards while ranks grow upwards, so rank 8 is the top row.
//! 3. Walk ranks 8→1 and files a→h, run-length encoding empty squares, and
//!    append the fixed trailer (`- - 0 1`) after the side to move.

mod error;
mod fen;
mod grid;
mod localize;
mod mapper;
mod params;
mod recognizer;

pub use error::BoardError;
pub use fen::{require_kings, serialize_board, PositionRecord};
pub use grid::{BoardGrid, GridParseError};
pub use localize::{locate_board, BoardFrame};
pub use mapper::{map_pieces, DiscardReason, DiscardedDetection, MappingOutcome, PlacedPiece};
pub use params::{BoardParams, DuplicatePolicy, OutOfBoundsPolicy};
pub use recognizer::{BoardRecognizer, Recognition};
