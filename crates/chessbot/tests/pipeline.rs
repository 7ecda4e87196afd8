//! Turn pipeline against in-process stand-ins for camera, detector and
//! engine.

use chessbot::board::{BoardError, BoardRecognizer};
use chessbot::core::{BoundingBox, Color, CoordinateMove, Detection};
use chessbot::engine::{EngineError, MoveEngine};
use chessbot::robot::{PlacementError, PlacementTable};
use chessbot::{
    CaptureError, CapturedFrame, DetectorError, FrameSource, GameState, ObjectDetector,
    PipelineError, RetryPolicy, TurnPipeline,
};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

const START_BOARD: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";
const BACK_RANK: [&str; 8] = [
    "Rook", "Knight", "Bishop", "Queen", "King", "Bishop", "Knight", "Rook",
];

/// 800×800 board at the origin, 100 px squares.
fn board() -> Detection {
    Detection::new(BoundingBox::new(0.0, 0.0, 800.0, 800.0), "Chess_Board").with_confidence(0.99)
}

fn piece_on(label: &str, file: u8, rank: u8) -> Detection {
    let cx = f32::from(file - 1) * 100.0 + 50.0;
    let cy = f32::from(8 - rank) * 100.0 + 50.0;
    Detection::new(BoundingBox::new(cx - 30.0, cy - 40.0, cx + 30.0, cy + 40.0), label)
        .with_confidence(0.9)
}

fn start_position() -> Vec<Detection> {
    let mut dets = vec![board()];
    for (i, kind) in BACK_RANK.iter().enumerate() {
        let file = i as u8 + 1;
        dets.push(piece_on(&format!("White_{kind}"), file, 1));
        dets.push(piece_on("White_Pawn", file, 2));
        dets.push(piece_on("Black_Pawn", file, 7));
        dets.push(piece_on(&format!("Black_{kind}"), file, 8));
    }
    dets
}

fn placement() -> PlacementTable {
    let csv = "Col,Row,Pick,Place\n\
               e,2,[0.40; -0.125; 0.02],[0.40; -0.125; 0.035]\n\
               e,4,[0.40; -0.025; 0.02],[0.40; -0.025; 0.035]\n";
    PlacementTable::from_reader(csv.as_bytes()).unwrap()
}

struct FakeCamera {
    fail_first: u32,
    calls: Rc<Cell<u32>>,
}

impl FrameSource for FakeCamera {
    fn capture(&mut self, turn: u32) -> Result<CapturedFrame, CaptureError> {
        self.calls.set(self.calls.get() + 1);
        if self.calls.get() <= self.fail_first {
            return Err(CaptureError::Missing {
                path: PathBuf::from("camera busy"),
            });
        }
        Ok(CapturedFrame {
            path: PathBuf::from(format!("move_{turn}.jpg")),
            width: 800,
            height: 800,
        })
    }
}

fn camera() -> FakeCamera {
    FakeCamera {
        fail_first: 0,
        calls: Rc::default(),
    }
}

struct FixedDetections(Vec<Detection>);

impl ObjectDetector for FixedDetections {
    fn detect(&mut self, _image: &Path) -> Result<Vec<Detection>, DetectorError> {
        Ok(self.0.clone())
    }
}

/// Replies with a fixed move and records every position it was asked about.
#[derive(Default)]
struct ScriptedEngine {
    reply: Option<&'static str>,
    asked: Rc<RefCell<Vec<String>>>,
}

impl MoveEngine for ScriptedEngine {
    fn best_move(&mut self, fen: &str) -> Result<Option<CoordinateMove>, EngineError> {
        self.asked.borrow_mut().push(fen.to_string());
        Ok(self.reply.map(|m| m.parse().unwrap()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn engine(reply: Option<&'static str>) -> (ScriptedEngine, Rc<RefCell<Vec<String>>>) {
    let asked = Rc::new(RefCell::new(Vec::new()));
    (
        ScriptedEngine {
            reply,
            asked: asked.clone(),
        },
        asked,
    )
}

#[test]
fn full_turn_yields_fen_move_and_waypoints() {
    let (eng, asked) = engine(Some("e2e4"));
    let mut pipeline = TurnPipeline::new(
        camera(),
        FixedDetections(start_position()),
        BoardRecognizer::default(),
        Some(eng),
    )
    .with_placement(Some(placement()));

    let outcome = pipeline.run_turn(&GameState::default()).unwrap();
    let fen = format!("{START_BOARD} w - - 0 1");
    assert_eq!(outcome.fen, fen);
    assert_eq!(*asked.borrow(), vec![fen]);
    assert_eq!(outcome.best_move.unwrap().to_string(), "e2e4");
    assert_eq!(outcome.frame.path, PathBuf::from("move_1.jpg"));
    assert!(outcome.discarded.is_empty());

    let plan = outcome.waypoints.unwrap();
    assert_eq!(plan.pick(), "[0.40; -0.125; 0.02]");
    assert_eq!(plan.place(), "[0.40; -0.025; 0.035]");
    assert_eq!(plan.home(), "[0.45; 0; 0.49]");
}

#[test]
fn kingless_frame_never_reaches_the_engine() {
    let dets: Vec<Detection> = start_position()
        .into_iter()
        .filter(|d| !d.label.ends_with("_King"))
        .collect();
    let (eng, asked) = engine(Some("e2e4"));
    let mut pipeline =
        TurnPipeline::new(camera(), FixedDetections(dets), BoardRecognizer::default(), Some(eng));

    let err = pipeline.run_turn(&GameState::default()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Board(BoardError::NoKingsDetected {
            white_missing: true,
            black_missing: true
        })
    ));
    assert_eq!(err.exit_code(), 13);
    assert!(asked.borrow().is_empty());
}

#[test]
fn missing_board_fails_the_frame() {
    let dets: Vec<Detection> = start_position().into_iter().skip(1).collect();
    let (eng, asked) = engine(Some("e2e4"));
    let mut pipeline =
        TurnPipeline::new(camera(), FixedDetections(dets), BoardRecognizer::default(), Some(eng));

    let err = pipeline.run_turn(&GameState::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Board(BoardError::BoardNotFound { .. })));
    assert_eq!(err.exit_code(), 12);
    assert!(asked.borrow().is_empty());
}

#[test]
fn without_engine_the_turn_ends_at_the_position() {
    let mut pipeline = TurnPipeline::<_, _, ScriptedEngine>::new(
        camera(),
        FixedDetections(start_position()),
        BoardRecognizer::default(),
        None,
    );
    let outcome = pipeline
        .run_turn(&GameState::new(Color::Black))
        .unwrap();
    assert!(outcome.fen.ends_with(" b - - 0 1"));
    assert!(outcome.best_move.is_none());
    assert!(!outcome.game_over);
}

#[test]
fn no_engine_move_ends_the_game() {
    let (eng, asked) = engine(None);
    let mut pipeline = TurnPipeline::new(
        camera(),
        FixedDetections(start_position()),
        BoardRecognizer::default(),
        Some(eng),
    )
    .with_placement(Some(placement()));

    let mut state = GameState::default();
    let summary = pipeline.play(&mut state, 5, |_| {});
    assert!(summary.error.is_none());
    assert!(summary.game_over());
    assert_eq!(summary.turns.len(), 1);
    assert_eq!(asked.borrow().len(), 1);
    assert!(summary.turns[0].waypoints.is_none());
    // the game-ending turn does not hand the move over
    assert_eq!(state, GameState::default());
}

#[test]
fn play_alternates_sides_between_turns() {
    let (eng, asked) = engine(Some("e2e4"));
    let mut pipeline = TurnPipeline::new(
        camera(),
        FixedDetections(start_position()),
        BoardRecognizer::default(),
        Some(eng),
    );

    let mut state = GameState::default();
    let mut seen = Vec::new();
    let summary = pipeline.play(&mut state, 3, |t| seen.push(t.frame.path.clone()));
    assert!(summary.error.is_none());
    assert_eq!(summary.turns.len(), 3);
    assert_eq!(
        seen,
        ["move_1.jpg", "move_2.jpg", "move_3.jpg"].map(PathBuf::from)
    );
    let asked = asked.borrow();
    assert!(asked[0].ends_with(" w - - 0 1"));
    assert!(asked[1].ends_with(" b - - 0 1"));
    assert!(asked[2].ends_with(" w - - 0 1"));
    assert_eq!((state.active_color, state.turn), (Color::Black, 4));
}

#[test]
fn flaky_camera_is_retried() {
    let calls = Rc::new(Cell::new(0));
    let cam = FakeCamera {
        fail_first: 1,
        calls: calls.clone(),
    };
    let (eng, _) = engine(Some("e2e4"));
    let mut pipeline = TurnPipeline::new(
        cam,
        FixedDetections(start_position()),
        BoardRecognizer::default(),
        Some(eng),
    )
    .with_retry(RetryPolicy {
        max_attempts: 2,
        backoff_ms: 0,
    });

    assert!(pipeline.run_turn(&GameState::default()).is_ok());
    assert_eq!(calls.get(), 2);
}

#[test]
fn dead_camera_gives_up_after_policy_attempts() {
    let calls = Rc::new(Cell::new(0));
    let cam = FakeCamera {
        fail_first: u32::MAX,
        calls: calls.clone(),
    };
    let (eng, asked) = engine(Some("e2e4"));
    let mut pipeline = TurnPipeline::new(
        cam,
        FixedDetections(start_position()),
        BoardRecognizer::default(),
        Some(eng),
    )
    .with_retry(RetryPolicy {
        max_attempts: 3,
        backoff_ms: 0,
    });

    let err = pipeline.run_turn(&GameState::default()).unwrap_err();
    assert_eq!(err.exit_code(), 10);
    assert_eq!(calls.get(), 3);
    assert!(asked.borrow().is_empty());
}

#[test]
fn unmapped_square_stops_the_move() {
    let (eng, _) = engine(Some("g1f3"));
    let mut pipeline = TurnPipeline::new(
        camera(),
        FixedDetections(start_position()),
        BoardRecognizer::default(),
        Some(eng),
    )
    .with_placement(Some(placement()));

    let err = pipeline.run_turn(&GameState::default()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Placement(PlacementError::SquareNotMapped { .. })
    ));
    assert_eq!(err.exit_code(), 16);
}
