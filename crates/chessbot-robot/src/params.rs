use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Arm rest position between the pick and place halves of a move.
pub const DEFAULT_HOME: &str = "[0.45; 0; 0.49]";

/// Placement configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementParams {
    /// CSV with `Col, Row, Pick, Place` columns. No table means moves are
    /// reported without waypoints.
    pub table: Option<PathBuf>,
    pub home: String,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            table: None,
            home: DEFAULT_HOME.to_string(),
        }
    }
}
