//! JSON run report: one entry per attempted turn.

use crate::config::ConfigError;
use crate::error::PipelineError;
use crate::pipeline::{GameState, PlaySummary, TurnOutcome};
use chessbot_board::DiscardedDetection;
use chessbot_core::{Color, CoordinateMove, Detection};
use chessbot_robot::WaypointPlan;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: u32,
    pub active_color: Color,
    pub full_move_number: u32,
    #[serde(default)]
    pub image_path: Option<PathBuf>,
    #[serde(default)]
    pub image_size: Option<[u32; 2]>,
    #[serde(default)]
    pub detections: Vec<Detection>,
    #[serde(default)]
    pub fen: Option<String>,
    #[serde(default)]
    pub discarded: Vec<DiscardedDetection>,
    #[serde(default)]
    pub best_move: Option<CoordinateMove>,
    #[serde(default)]
    pub waypoints: Option<WaypointPlan>,
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl TurnReport {
    pub fn from_outcome(outcome: &TurnOutcome) -> Self {
        Self {
            turn: outcome.state.turn,
            active_color: outcome.state.active_color,
            full_move_number: outcome.state.full_move_number,
            image_path: Some(outcome.frame.path.clone()),
            image_size: Some([outcome.frame.width, outcome.frame.height]),
            detections: outcome.detections.clone(),
            fen: Some(outcome.fen.clone()),
            discarded: outcome.discarded.clone(),
            best_move: outcome.best_move,
            waypoints: outcome.waypoints.clone(),
            game_over: outcome.game_over,
            error: None,
        }
    }

    pub fn from_error(state: &GameState, err: &PipelineError) -> Self {
        Self {
            turn: state.turn,
            active_color: state.active_color,
            full_move_number: state.full_move_number,
            image_path: None,
            image_size: None,
            detections: Vec::new(),
            fen: None,
            discarded: Vec::new(),
            best_move: None,
            waypoints: None,
            game_over: false,
            error: Some(err.to_string()),
        }
    }
}

/// All turns of one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub turns: Vec<TurnReport>,
}

impl RunReport {
    /// Report for `summary`; `state` is the state the failing turn ran with.
    pub fn from_summary(summary: &PlaySummary, state: &GameState) -> Self {
        let mut turns: Vec<TurnReport> = summary.turns.iter().map(TurnReport::from_outcome).collect();
        if let Some(err) = &summary.error {
            turns.push(TurnReport::from_error(state, err));
        }
        Self { turns }
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
