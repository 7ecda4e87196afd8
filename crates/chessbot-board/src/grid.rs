use chessbot_core::{Piece, Square};
use std::str::FromStr;

/// 64-cell board, at most one piece per square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardGrid {
    cells: [Option<Piece>; 64],
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridParseError {
    #[error("expected 8 ranks, got {0}")]
    RankCount(usize),
    #[error("rank {rank} does not describe exactly 8 squares")]
    RankWidth { rank: u8 },
    #[error("unexpected character '{0}' in board field")]
    BadChar(char),
}

impl Default for BoardGrid {
    fn default() -> Self {
        Self { cells: [None; 64] }
    }
}

impl BoardGrid {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    /// Put a piece on a square, returning the previous occupant.
    #[inline]
    pub fn set(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        self.cells[sq.index()].replace(piece)
    }

    #[inline]
    pub fn clear(&mut self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()].take()
    }

    /// Occupied squares, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| Some((Square::from_index(i)?, (*c)?)))
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.piece_count() == 0
    }
}

/// Parses the board field of a FEN string (`rnbqkbnr/pppppppp/8/...`).
impl FromStr for BoardGrid {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ranks: Vec<&str> = s.split('/').collect();
        if ranks.len() != 8 {
            return Err(GridParseError::RankCount(ranks.len()));
        }
        let mut grid = BoardGrid::new();
        for (row, text) in ranks.iter().enumerate() {
            let rank = 8 - row as u8;
            let mut file = 1u8;
            for c in text.chars() {
                if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += run as u8;
                } else {
                    let piece = Piece::from_symbol(c).ok_or(GridParseError::BadChar(c))?;
                    let sq = Square::new(file, rank).ok_or(GridParseError::RankWidth { rank })?;
                    grid.set(sq, piece);
                    file += 1;
                }
                if file > 9 {
                    return Err(GridParseError::RankWidth { rank });
                }
            }
            if file != 9 {
                return Err(GridParseError::RankWidth { rank });
            }
        }
        Ok(grid)
    }
}
