//! One turn end to end: photo → detections → position → move → waypoints.

use crate::capture::{CapturedFrame, FrameSource};
use crate::detector::ObjectDetector;
use crate::error::PipelineError;
use chessbot_board::{require_kings, BoardRecognizer, DiscardedDetection};
use chessbot_core::{Color, CoordinateMove, Detection};
use chessbot_engine::{EngineError, EngineParams, MoveEngine, UciEngine};
use chessbot_robot::{PlacementTable, WaypointPlan};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::thread;
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Side to move and move counters carried between turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub active_color: Color,
    pub full_move_number: u32,
    /// 1-based turn counter; names the captured photo.
    pub turn: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Color::White)
    }
}

impl GameState {
    pub fn new(active_color: Color) -> Self {
        Self {
            active_color,
            full_move_number: 1,
            turn: 1,
        }
    }

    /// Hand the move to the other side.
    pub fn advance(&mut self) {
        if self.active_color == Color::Black {
            self.full_move_number += 1;
        }
        self.active_color = self.active_color.opposite();
        self.turn += 1;
    }
}

/// Bounded retry for transient failures (camera, engine start).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first. `0` behaves like `1`.
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 500,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff_ms: 0,
        }
    }

    /// Run `op` until it succeeds, fails with a non-retryable error or the
    /// attempts are used up.
    pub fn run<T, E: Display>(
        &self,
        what: &str,
        mut op: impl FnMut() -> Result<T, E>,
        retryable: impl Fn(&E) -> bool,
    ) -> Result<T, E> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts && retryable(&e) => {
                    warn!("{what} failed (attempt {attempt}/{attempts}): {e}");
                    thread::sleep(Duration::from_millis(self.backoff_ms));
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Start the engine, retrying only while it is unavailable.
pub fn connect_engine(params: &EngineParams, retry: &RetryPolicy) -> Result<UciEngine, EngineError> {
    retry.run(
        "engine start",
        || UciEngine::spawn(params.clone()),
        |e| matches!(e, EngineError::Unavailable { .. }),
    )
}

/// Everything one turn produced.
#[derive(Clone, Debug)]
pub struct TurnOutcome {
    pub state: GameState,
    pub frame: CapturedFrame,
    pub detections: Vec<Detection>,
    pub fen: String,
    pub discarded: Vec<DiscardedDetection>,
    /// `None` when the engine was not asked or had no move.
    pub best_move: Option<CoordinateMove>,
    pub waypoints: Option<WaypointPlan>,
    /// The engine was asked and the side to move has no legal move.
    pub game_over: bool,
}

/// Completed turns of [`TurnPipeline::play`] and the error that stopped
/// it, if any.
#[derive(Debug, Default)]
pub struct PlaySummary {
    pub turns: Vec<TurnOutcome>,
    pub error: Option<PipelineError>,
}

impl PlaySummary {
    pub fn game_over(&self) -> bool {
        self.turns.last().is_some_and(|t| t.game_over)
    }
}

/// Capture, detect, recognize, ask the engine and plan the arm motion.
///
/// Without an engine the turn stops after the position string.
/// Without a placement table the move is reported without waypoints.
pub struct TurnPipeline<F, D, E> {
    source: F,
    detector: D,
    recognizer: BoardRecognizer,
    engine: Option<E>,
    placement: Option<PlacementTable>,
    retry: RetryPolicy,
}

impl<F, D, E> TurnPipeline<F, D, E>
where
    F: FrameSource,
    D: ObjectDetector,
    E: MoveEngine,
{
    pub fn new(source: F, detector: D, recognizer: BoardRecognizer, engine: Option<E>) -> Self {
        Self {
            source,
            detector,
            recognizer,
            engine,
            placement: None,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_placement(mut self, table: Option<PlacementTable>) -> Self {
        self.placement = table;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self), fields(turn = state.turn))
    )]
    pub fn run_turn(&mut self, state: &GameState) -> Result<TurnOutcome, PipelineError> {
        let source = &mut self.source;
        let frame = self
            .retry
            .run("capture", || source.capture(state.turn), |_| true)?;

        let detections = self.detector.detect(&frame.path)?;
        let recognition = self.recognizer.recognize(&detections, state.active_color)?;
        let fen = recognition.fen();
        info!("turn {}: {fen}", state.turn);
        require_kings(&fen)?;

        let mut outcome = TurnOutcome {
            state: *state,
            frame,
            detections,
            fen,
            discarded: recognition.mapping.discarded,
            best_move: None,
            waypoints: None,
            game_over: false,
        };

        let Some(engine) = self.engine.as_mut() else {
            return Ok(outcome);
        };
        outcome.best_move = engine.best_move(&outcome.fen)?;
        let Some(mv) = outcome.best_move else {
            info!("{} has no move, game over", engine.name());
            outcome.game_over = true;
            return Ok(outcome);
        };
        info!("{} plays {mv}", engine.name());

        if let Some(table) = &self.placement {
            outcome.waypoints = Some(table.waypoints(&mv)?);
        }
        Ok(outcome)
    }

    /// Run up to `turns` turns, advancing `state` after each completed one.
    /// Stops early on the first error or when the game is over.
    pub fn play(
        &mut self,
        state: &mut GameState,
        turns: u32,
        mut on_turn: impl FnMut(&TurnOutcome),
    ) -> PlaySummary {
        let mut summary = PlaySummary::default();
        for _ in 0..turns {
            match self.run_turn(state) {
                Ok(outcome) => {
                    on_turn(&outcome);
                    let over = outcome.game_over;
                    summary.turns.push(outcome);
                    if over {
                        break;
                    }
                    state.advance();
                }
                Err(e) => {
                    summary.error = Some(e);
                    break;
                }
            }
        }
        summary
    }
}
