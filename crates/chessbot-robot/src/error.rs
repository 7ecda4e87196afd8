use chessbot_core::{MoveParseError, Square};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which side of the table a lookup used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableColumn {
    Pick,
    Place,
}

impl fmt::Display for TableColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pick => "Pick",
            Self::Place => "Place",
        })
    }
}

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("placement table not found at {}", path.display())]
    TableNotFound { path: PathBuf },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("placement table line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
    #[error(transparent)]
    InvalidMove(#[from] MoveParseError),
    #[error("square {square} has no {column} coordinate in the placement table")]
    SquareNotMapped { square: Square, column: TableColumn },
}
