use crate::error::EngineError;
use shakmaty::{fen::Fen, CastlingMode, Chess, Position};

/// Summary of a position that passed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionCheck {
    pub legal_moves: usize,
    pub in_check: bool,
}

impl PositionCheck {
    /// Checkmate or stalemate: nothing to ask the engine.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.legal_moves == 0
    }
}

/// Parse `fen` and check that it describes a legal position.
///
/// Rejects syntax errors as well as impossible setups: missing or extra
/// kings, pawns on the back ranks, the side not to move being in check.
pub fn validate_fen(fen: &str) -> Result<PositionCheck, EngineError> {
    let invalid = |reason: String| EngineError::InvalidPosition {
        fen: fen.to_string(),
        reason,
    };
    let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
    let pos: Chess = parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| invalid(format!("{e}")))?;
    Ok(PositionCheck {
        legal_moves: pos.legal_moves().len(),
        in_check: pos.is_check(),
    })
}
