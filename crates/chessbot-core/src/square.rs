use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Board square with 1-based file (`a` = 1) and rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid square '{0}'")]
pub struct SquareParseError(pub String);

impl Square {
    /// Build a square from 1-based file and rank; `None` outside `1..=8`.
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if (1..=8).contains(&file) && (1..=8).contains(&rank) {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    #[inline]
    pub fn file(self) -> u8 {
        self.file
    }

    #[inline]
    pub fn rank(self) -> u8 {
        self.rank
    }

    /// File letter, `'a'..='h'`.
    #[inline]
    pub fn file_char(self) -> char {
        (b'a' + self.file - 1) as char
    }

    /// Row-major index from a1 (0) to h8 (63).
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.rank - 1) * 8 + usize::from(self.file - 1)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= 64 {
            return None;
        }
        Some(Self {
            file: (index % 8) as u8 + 1,
            rank: (index / 8) as u8 + 1,
        })
    }

    /// Parse a file letter and rank digit, e.g. `('e', '4')`.
    pub fn from_chars(file: char, rank: char) -> Option<Self> {
        if !file.is_ascii_lowercase() {
            return None;
        }
        let f = (file as u8).checked_sub(b'a')? + 1;
        let r = rank.to_digit(10)? as u8;
        Self::new(f, r)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank)
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => Square::from_chars(f, r),
            _ => None,
        }
        .ok_or_else(|| SquareParseError(s.to_string()))
    }
}

impl TryFrom<String> for Square {
    type Error = SquareParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> Self {
        sq.to_string()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("invalid move format '{0}', expected origin and destination squares like 'e2e4'")]
    TooShort(String),
    #[error("invalid square in move '{0}'")]
    BadSquare(String),
    #[error("invalid promotion piece in move '{0}'")]
    BadPromotion(String),
}

/// Move in coordinate notation: origin square, destination square and an
/// optional promotion piece (`e2e4`, `e7e8q`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CoordinateMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<char>,
}

impl CoordinateMove {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }
}

impl fmt::Display for CoordinateMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = self.promotion {
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

impl FromStr for CoordinateMove {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() < 4 {
            return Err(MoveParseError::TooShort(s.to_string()));
        }
        let from = Square::from_chars(chars[0], chars[1])
            .ok_or_else(|| MoveParseError::BadSquare(s.to_string()))?;
        let to = Square::from_chars(chars[2], chars[3])
            .ok_or_else(|| MoveParseError::BadSquare(s.to_string()))?;
        let promotion = match &chars[4..] {
            [] => None,
            [p] if matches!(*p, 'q' | 'r' | 'b' | 'n') => Some(*p),
            _ => return Err(MoveParseError::BadPromotion(s.to_string())),
        };
        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

impl TryFrom<String> for CoordinateMove {
    type Error = MoveParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CoordinateMove> for String {
    fn from(m: CoordinateMove) -> Self {
        m.to_string()
    }
}
