use chessbot_core::Square;

/// Errors returned by board recognition.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BoardError {
    #[error("board frame ('{label}') not detected in the image")]
    BoardNotFound { label: String },
    #[error("degenerate board frame (width={width}, height={height})")]
    DegenerateBoard { width: f32, height: f32 },
    #[error("two detections claim square {square}")]
    SquareConflict { square: Square },
    #[error("position is missing kings (white missing: {white_missing}, black missing: {black_missing})")]
    NoKingsDetected {
        white_missing: bool,
        black_missing: bool,
    },
}
