//! Core types for the chessbot workspace.
//!
//! This crate is intentionally small and free of I/O. It defines the
//! detector output ([`Detection`]), the chess vocabulary shared by the
//! recognizer and the placement mapper ([`Piece`], [`Square`],
//! [`CoordinateMove`]) and the minimal logger used by the binaries.

mod detection;
mod logger;
mod piece;
mod square;

pub use detection::{BoundingBox, Detection};
pub use piece::{Color, Piece, PieceKind, BOARD_LABEL, PIECE_LABELS};
pub use square::{CoordinateMove, MoveParseError, Square, SquareParseError};

#[cfg(feature = "tracing")]
pub use logger::{init_tracing, DEFAULT_TRACING_FILTER};

pub use logger::{init_with_level, verbosity_level};
