use serde::{Deserialize, Serialize};
use std::fmt;

/// Detector class name of the board frame.
pub const BOARD_LABEL: &str = "Chess_Board";

/// Side to move / piece colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Color {
    #[default]
    #[serde(rename = "w", alias = "white")]
    White,
    #[serde(rename = "b", alias = "black")]
    Black,
}

impl Color {
    /// FEN active-colour character.
    #[inline]
    pub fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_fen_char(c: char) -> Option<Self> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    fn lower_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

/// Coloured chess piece, identified on the wire by its FEN symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

/// Detector class names and the pieces they denote.
///
/// White pieces map to uppercase FEN symbols, black ones to lowercase.
pub const PIECE_LABELS: [(&str, Piece); 12] = [
    ("Black_Pawn", Piece::new(Color::Black, PieceKind::Pawn)),
    ("Black_Rook", Piece::new(Color::Black, PieceKind::Rook)),
    ("Black_Knight", Piece::new(Color::Black, PieceKind::Knight)),
    ("Black_Bishop", Piece::new(Color::Black, PieceKind::Bishop)),
    ("Black_Queen", Piece::new(Color::Black, PieceKind::Queen)),
    ("Black_King", Piece::new(Color::Black, PieceKind::King)),
    ("White_Pawn", Piece::new(Color::White, PieceKind::Pawn)),
    ("White_Rook", Piece::new(Color::White, PieceKind::Rook)),
    ("White_Knight", Piece::new(Color::White, PieceKind::Knight)),
    ("White_Bishop", Piece::new(Color::White, PieceKind::Bishop)),
    ("White_Queen", Piece::new(Color::White, PieceKind::Queen)),
    ("White_King", Piece::new(Color::White, PieceKind::King)),
];

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Look up a detector class name. Case-sensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        PIECE_LABELS
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, piece)| *piece)
    }

    /// FEN symbol (`P`, `n`, ...).
    pub fn symbol(self) -> char {
        let c = self.kind.lower_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match symbol.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some(Self { color, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<char> for Piece {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Piece::from_symbol(c).ok_or_else(|| format!("invalid piece symbol '{c}'"))
    }
}

impl From<Piece> for char {
    fn from(p: Piece) -> Self {
        p.symbol()
    }
}
