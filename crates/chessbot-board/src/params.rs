use chessbot_core::BOARD_LABEL;
use serde::{Deserialize, Serialize};

/// What to do when two piece detections land on the same square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the detection with the higher confidence. When either score is
    /// missing, or both are equal, the later detection wins.
    #[default]
    HighestConfidence,
    /// Later detections overwrite earlier ones.
    LastWins,
    /// Fail the frame with [`crate::BoardError::SquareConflict`].
    Reject,
}

/// What to do with a piece whose centre falls outside the board frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutOfBoundsPolicy {
    /// Drop the detection (logged at `warn`).
    #[default]
    Discard,
    /// Snap rank and file into `1..=8`.
    Clamp,
}

/// Parameters for board recognition.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardParams {
    /// Detector class name of the board frame.
    pub board_label: String,
    pub duplicate_policy: DuplicatePolicy,
    pub out_of_bounds: OutOfBoundsPolicy,
}

impl Default for BoardParams {
    fn default() -> Self {
        Self {
            board_label: BOARD_LABEL.to_string(),
            duplicate_policy: DuplicatePolicy::default(),
            out_of_bounds: OutOfBoundsPolicy::default(),
        }
    }
}
