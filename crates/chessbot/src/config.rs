//! JSON configuration for a run and builders for the pipeline parts.

use crate::capture::{CommandCapture, FrameSource, StillImageSource};
use crate::detector::{CommandDetector, JsonDetections, ObjectDetector};
use crate::error::PipelineError;
use crate::pipeline::{connect_engine, RetryPolicy, TurnPipeline};
use chessbot_board::{BoardParams, BoardRecognizer};
use chessbot_core::Color;
use chessbot_engine::{EngineParams, UciEngine};
use chessbot_robot::{PlacementError, PlacementParams, PlacementTable};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("incomplete configuration: {0}")]
    Incomplete(String),
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("computer_vision_files/moves_pictures")
}

/// Where photos come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureParams {
    /// Use this image for every turn instead of running a capture program.
    #[serde(default)]
    pub image: Option<PathBuf>,
    #[serde(default)]
    pub program: Option<String>,
    /// Program arguments; `{output}` is replaced with the photo path.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for CaptureParams {
    fn default() -> Self {
        Self {
            image: None,
            program: None,
            args: Vec::new(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_model() -> PathBuf {
    PathBuf::from("Trained model/best.pt")
}

fn default_detector_args() -> Vec<String> {
    vec!["{model}".to_string(), "{image}".to_string()]
}

/// How detections are obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorParams {
    /// Precomputed detections; skips the detector program.
    #[serde(default)]
    pub detections: Option<PathBuf>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default = "default_detector_args")]
    pub args: Vec<String>,
    #[serde(default = "default_model")]
    pub model: PathBuf,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            detections: None,
            program: None,
            args: default_detector_args(),
            model: default_model(),
        }
    }
}

/// Configuration for a `chessbot` run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub capture: CaptureParams,
    pub detector: DetectorParams,
    pub board: BoardParams,
    pub engine: EngineParams,
    pub placement: PlacementParams,
    pub retry: RetryPolicy,
    pub active_color: Color,
    /// Stop after the position string; no engine is started.
    pub fen_only: bool,
    pub report_path: Option<PathBuf>,
}

pub type ConfiguredPipeline =
    TurnPipeline<Box<dyn FrameSource>, Box<dyn ObjectDetector>, UciEngine>;

impl PipelineConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn build_frame_source(&self) -> Result<Box<dyn FrameSource>, ConfigError> {
        let c = &self.capture;
        if let Some(image) = &c.image {
            return Ok(Box::new(StillImageSource::new(image)));
        }
        match &c.program {
            Some(program) => Ok(Box::new(CommandCapture::new(
                program.clone(),
                c.args.clone(),
                &c.output_dir,
            ))),
            None => Err(ConfigError::Incomplete(
                "set capture.image or capture.program".to_string(),
            )),
        }
    }

    pub fn build_detector(&self) -> Result<Box<dyn ObjectDetector>, PipelineError> {
        let d = &self.detector;
        if let Some(path) = &d.detections {
            return Ok(Box::new(JsonDetections::new(path)));
        }
        let Some(program) = &d.program else {
            return Err(ConfigError::Incomplete(
                "set detector.detections or detector.program".to_string(),
            )
            .into());
        };
        let detector = CommandDetector::new(program.clone(), d.args.clone(), &d.model)?;
        Ok(Box::new(detector))
    }

    pub fn build_recognizer(&self) -> BoardRecognizer {
        BoardRecognizer::new(self.board.clone())
    }

    pub fn build_placement(&self) -> Result<Option<PlacementTable>, PlacementError> {
        PlacementTable::from_params(&self.placement)
    }

    /// Assemble the full pipeline. The engine is started here (with retry)
    /// unless `fen_only` is set.
    pub fn build_pipeline(&self) -> Result<ConfiguredPipeline, PipelineError> {
        let source = self.build_frame_source()?;
        let detector = self.build_detector()?;
        let placement = if self.fen_only {
            None
        } else {
            self.build_placement()?
        };
        let engine = if self.fen_only {
            None
        } else {
            Some(connect_engine(&self.engine, &self.retry)?)
        };
        Ok(
            TurnPipeline::new(source, detector, self.build_recognizer(), engine)
                .with_placement(placement)
                .with_retry(self.retry),
        )
    }
}
