use crate::error::BoardError;
use crate::grid::BoardGrid;
use chessbot_core::{Color, Square};
use std::fmt;

/// Single-frame position: a board plus the side to move.
///
/// Castling rights, en-passant target and the move clocks cannot be read
/// off a still image, so they are always `-`, `-`, `0` and `1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionRecord {
    pub board: BoardGrid,
    pub active_color: Color,
}

impl PositionRecord {
    pub const CASTLING: &'static str = "-";
    pub const EN_PASSANT: &'static str = "-";
    pub const HALFMOVE_CLOCK: u32 = 0;
    pub const FULLMOVE_NUMBER: u32 = 1;

    pub fn new(board: BoardGrid, active_color: Color) -> Self {
        Self {
            board,
            active_color,
        }
    }

    /// Full six-field FEN.
    pub fn to_fen(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PositionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            serialize_board(&self.board),
            self.active_color,
            Self::CASTLING,
            Self::EN_PASSANT,
            Self::HALFMOVE_CLOCK,
            Self::FULLMOVE_NUMBER
        )
    }
}

/// FEN board field: ranks 8→1 separated by `/`, empty runs as digits.
pub fn serialize_board(board: &BoardGrid) -> String {
    let mut out = String::with_capacity(71);
    for rank in (1..=8u8).rev() {
        let mut empty = 0u8;
        for file in 1..=8u8 {
            let piece = Square::new(file, rank).and_then(|sq| board.get(sq));
            match piece {
                None => empty += 1,
                Some(p) => {
                    if empty > 0 {
                        out.push(char::from(b'0' + empty));
                        empty = 0;
                    }
                    out.push(p.symbol());
                }
            }
        }
        if empty > 0 {
            out.push(char::from(b'0' + empty));
        }
        if rank > 1 {
            out.push('/');
        }
    }
    out
}

/// Reject a position string whose board field lacks either king.
///
/// A missing king almost always means the detector missed pieces or the
/// camera saw an empty board; such a frame must not reach the engine.
pub fn require_kings(fen: &str) -> Result<(), BoardError> {
    let board = fen.split_whitespace().next().unwrap_or_default();
    let white_missing = !board.contains('K');
    let black_missing = !board.contains('k');
    if white_missing || black_missing {
        return Err(BoardError::NoKingsDetected {
            white_missing,
            black_missing,
        });
    }
    Ok(())
}
