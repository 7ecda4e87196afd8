use crate::error::BoardError;
use crate::fen::PositionRecord;
use crate::localize::{locate_board, BoardFrame};
use crate::mapper::{map_pieces, MappingOutcome};
use crate::params::BoardParams;
use chessbot_core::{Color, Detection};
use log::info;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Output of one recognition pass.
#[derive(Clone, Debug)]
pub struct Recognition {
    pub frame: BoardFrame,
    /// Index of the detection used as the board frame.
    pub board_detection: usize,
    pub mapping: MappingOutcome,
    pub position: PositionRecord,
}

impl Recognition {
    pub fn fen(&self) -> String {
        self.position.to_fen()
    }
}

/// Detections of one image → position record.
#[derive(Clone, Debug, Default)]
pub struct BoardRecognizer {
    params: BoardParams,
}

impl BoardRecognizer {
    pub fn new(params: BoardParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &BoardParams {
        &self.params
    }

    /// Localize the board, bin the pieces and build the position.
    ///
    /// Deterministic: the same detections always give the same FEN.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, detections), fields(n = detections.len()))
    )]
    pub fn recognize(
        &self,
        detections: &[Detection],
        active_color: Color,
    ) -> Result<Recognition, BoardError> {
        let (frame, board_detection) = locate_board(detections, &self.params.board_label)?;
        let mapping = map_pieces(&frame, detections, &self.params)?;
        info!(
            "mapped {} pieces ({} discarded)",
            mapping.placed.len(),
            mapping.discarded.len()
        );
        let position = PositionRecord::new(mapping.grid.clone(), active_color);
        Ok(Recognition {
            frame,
            board_detection,
            mapping,
            position,
        })
    }
}
