use crate::capture::CaptureError;
use crate::config::ConfigError;
use crate::detector::DetectorError;
use chessbot_board::BoardError;
use chessbot_engine::EngineError;
use chessbot_robot::PlacementError;

/// Anything that can stop a turn.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error("detector failed: {0}")]
    Detector(#[from] DetectorError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

impl PipelineError {
    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 1,
            Self::Capture(_) => 10,
            Self::Detector(_) => 11,
            Self::Board(BoardError::NoKingsDetected { .. }) => 13,
            Self::Board(_) => 12,
            Self::Engine(EngineError::InvalidPosition { .. }) => 14,
            Self::Engine(_) => 15,
            Self::Placement(PlacementError::SquareNotMapped { .. })
            | Self::Placement(PlacementError::InvalidMove(_)) => 16,
            Self::Placement(_) => 1,
        }
    }
}
