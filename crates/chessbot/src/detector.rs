//! Object detector adapters producing [`Detection`]s for a photo.
//!
//! The vision model itself runs outside this process. [`CommandDetector`]
//! invokes it and reads a JSON array of detections from its stdout;
//! [`JsonDetections`] replays a stored result.

use chessbot_core::Detection;
use log::{debug, info};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

pub const MODEL_PLACEHOLDER: &str = "{model}";
pub const IMAGE_PLACEHOLDER: &str = "{image}";

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("detector model not found at {}", path.display())]
    ModelNotFound { path: PathBuf },
    #[error("detector program '{program}' could not be started: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("detector program '{program}' failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("detector output is not a detection list: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Finds the board and the pieces in a photo.
pub trait ObjectDetector {
    fn detect(&mut self, image: &Path) -> Result<Vec<Detection>, DetectorError>;
}

impl<D: ObjectDetector + ?Sized> ObjectDetector for Box<D> {
    fn detect(&mut self, image: &Path) -> Result<Vec<Detection>, DetectorError> {
        (**self).detect(image)
    }
}

/// Detections read from a JSON file, whatever the image.
#[derive(Clone, Debug)]
pub struct JsonDetections {
    path: PathBuf,
}

impl JsonDetections {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ObjectDetector for JsonDetections {
    fn detect(&mut self, _image: &Path) -> Result<Vec<Detection>, DetectorError> {
        let raw = std::fs::read_to_string(&self.path)?;
        let detections: Vec<Detection> = serde_json::from_str(&raw)?;
        debug!(
            "loaded {} detections from {}",
            detections.len(),
            self.path.display()
        );
        Ok(detections)
    }
}

/// External detector program. Arguments may contain `{model}` and
/// `{image}`; stdout must be a JSON array of detections.
#[derive(Clone, Debug)]
pub struct CommandDetector {
    program: String,
    args: Vec<String>,
    model: PathBuf,
}

impl CommandDetector {
    /// Fails with [`DetectorError::ModelNotFound`] when `model` does not
    /// exist.
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        model: impl Into<PathBuf>,
    ) -> Result<Self, DetectorError> {
        let model = model.into();
        if !model.exists() {
            return Err(DetectorError::ModelNotFound { path: model });
        }
        Ok(Self {
            program: program.into(),
            args,
            model,
        })
    }

    fn expand_args(&self, image: &Path) -> Vec<String> {
        let model = self.model.to_string_lossy();
        let image = image.to_string_lossy();
        self.args
            .iter()
            .map(|a| {
                a.replace(MODEL_PLACEHOLDER, &model)
                    .replace(IMAGE_PLACEHOLDER, &image)
            })
            .collect()
    }
}

impl ObjectDetector for CommandDetector {
    fn detect(&mut self, image: &Path) -> Result<Vec<Detection>, DetectorError> {
        let args = self.expand_args(image);
        debug!("detector: {} {}", self.program, args.join(" "));
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| DetectorError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(DetectorError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let detections: Vec<Detection> = serde_json::from_slice(&output.stdout)?;
        info!("{} detections in {}", detections.len(), image.display());
        Ok(detections)
    }
}
