use crate::error::EngineError;
use chessbot_core::CoordinateMove;

/// Anything that can suggest a move for a position.
pub trait MoveEngine {
    /// Best move for `fen`, or `None` when the side to move has no move
    /// (checkmate or stalemate).
    fn best_move(&mut self, fen: &str) -> Result<Option<CoordinateMove>, EngineError>;

    /// Human-readable engine name for logs and reports.
    fn name(&self) -> &str {
        "engine"
    }
}

impl<E: MoveEngine + ?Sized> MoveEngine for Box<E> {
    fn best_move(&mut self, fen: &str) -> Result<Option<CoordinateMove>, EngineError> {
        (**self).best_move(fen)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
