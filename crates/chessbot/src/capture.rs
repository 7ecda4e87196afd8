//! Frame sources: where the board photo of a turn comes from.

use image::ImageReader;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Placeholder replaced by the output image path in capture arguments.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture program '{program}' could not be started: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("capture program '{program}' failed ({status})")]
    Failed { program: String, status: String },
    #[error("no image at {}", path.display())]
    Missing { path: PathBuf },
    #[error("cannot decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A photo on disk, verified to decode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedFrame {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl CapturedFrame {
    /// Open and decode `path` to make sure it is a usable image.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CaptureError> {
        let path = path.into();
        if !path.is_file() {
            return Err(CaptureError::Missing { path });
        }
        let img = ImageReader::open(&path)?
            .with_guessed_format()?
            .decode()
            .map_err(|source| CaptureError::Decode {
                path: path.clone(),
                source,
            })?;
        debug!("frame {} is {}x{}", path.display(), img.width(), img.height());
        Ok(Self {
            width: img.width(),
            height: img.height(),
            path,
        })
    }
}

/// Produces one board photo per turn.
pub trait FrameSource {
    fn capture(&mut self, turn: u32) -> Result<CapturedFrame, CaptureError>;
}

impl<F: FrameSource + ?Sized> FrameSource for Box<F> {
    fn capture(&mut self, turn: u32) -> Result<CapturedFrame, CaptureError> {
        (**self).capture(turn)
    }
}

/// The same image for every turn.
#[derive(Clone, Debug)]
pub struct StillImageSource {
    path: PathBuf,
}

impl StillImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FrameSource for StillImageSource {
    fn capture(&mut self, _turn: u32) -> Result<CapturedFrame, CaptureError> {
        CapturedFrame::open(self.path.clone())
    }
}

/// Runs an external capture program that writes `move_{turn}.jpg`.
///
/// Every argument has `{output}` replaced with the target image path.
#[derive(Clone, Debug)]
pub struct CommandCapture {
    program: String,
    args: Vec<String>,
    output_dir: PathBuf,
}

impl CommandCapture {
    pub fn new(program: impl Into<String>, args: Vec<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            output_dir: output_dir.into(),
        }
    }

    /// Target path of the photo for `turn`.
    pub fn output_path(&self, turn: u32) -> PathBuf {
        self.output_dir.join(format!("move_{turn}.jpg"))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl FrameSource for CommandCapture {
    fn capture(&mut self, turn: u32) -> Result<CapturedFrame, CaptureError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let output = self.output_path(turn);
        // a photo left by an earlier run must not pass for this capture
        match std::fs::remove_file(&output) {
            Ok(()) => debug!("removed stale {}", output.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        let output_text = output.to_string_lossy();
        let args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace(OUTPUT_PLACEHOLDER, &output_text))
            .collect();

        debug!("capture: {} {}", self.program, args.join(" "));
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|source| CaptureError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(CaptureError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }

        let frame = CapturedFrame::open(output)?;
        info!("captured {}", frame.path.display());
        Ok(frame)
    }
}
