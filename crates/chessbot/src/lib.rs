//! Facade crate for the chessbot workspace.
//!
//! It re-exports the building blocks and adds the parts that touch the
//! outside world: photo capture, the object detector adapter, the turn
//! pipeline that chains them with board recognition, the engine and the
//! placement table, plus JSON configuration and reports.
//!
//! ## Quickstart
//!
//! ```no_run
//! use chessbot::{GameState, PipelineConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::load_json("chessbot.json")?;
//! let mut pipeline = config.build_pipeline()?;
//! let outcome = pipeline.run_turn(&GameState::new(config.active_color))?;
//! println!("{} -> {:?}", outcome.fen, outcome.best_move);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `chessbot::core`: detections, pieces, squares, moves, logger.
//! - `chessbot::board`: board localization, square mapping, FEN.
//! - `chessbot::engine`: position validation and the UCI engine adapter.
//! - `chessbot::robot`: placement table and arm waypoints.

pub use chessbot_board as board;
pub use chessbot_core as core;
pub use chessbot_engine as engine;
pub use chessbot_robot as robot;

pub mod capture;
pub mod config;
pub mod detector;
mod error;
pub mod pipeline;
pub mod report;

pub use capture::{CaptureError, CapturedFrame, CommandCapture, FrameSource, StillImageSource};
pub use config::{CaptureParams, ConfigError, ConfiguredPipeline, DetectorParams, PipelineConfig};
pub use detector::{CommandDetector, DetectorError, JsonDetections, ObjectDetector};
pub use error::PipelineError;
pub use pipeline::{
    connect_engine, GameState, PlaySummary, RetryPolicy, TurnOutcome, TurnPipeline,
};
pub use report::{RunReport, TurnReport};
