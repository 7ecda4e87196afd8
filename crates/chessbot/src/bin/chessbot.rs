use chessbot::core::Color;
use chessbot::{GameState, PipelineConfig, PipelineError, RunReport, TurnOutcome};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[cfg(not(feature = "tracing"))]
use chessbot::core::{init_with_level, verbosity_level};
#[cfg(feature = "tracing")]
use tracing_log::LogTracer;

/// Photograph the board, find the best move and plan the arm motion.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Use this photo instead of running the capture program.
    #[arg(long)]
    image: Option<PathBuf>,
    /// Use precomputed detections instead of running the detector.
    #[arg(long)]
    detections: Option<PathBuf>,
    /// Side to move: `w` or `b`.
    #[arg(long, value_parser = parse_color)]
    active_color: Option<Color>,
    /// Number of turns to play.
    #[arg(long, default_value_t = 1)]
    turns: u32,
    /// Print the position string and stop; no engine is started.
    #[arg(long)]
    fen_only: bool,
    /// Write a JSON report of the run.
    #[arg(long)]
    report: Option<PathBuf>,
    /// More log output (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only errors on stderr.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn parse_color(s: &str) -> Result<Color, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Color::from_fen_char(c),
        _ => None,
    }
    .ok_or_else(|| format!("expected 'w' or 'b', got '{s}'"))
}

fn init_logging(args: &Args) {
    // RUST_LOG drives the filter when tracing is enabled.
    #[cfg(feature = "tracing")]
    {
        let _ = args;
        let _ = LogTracer::init();
        chessbot::core::init_tracing(false);
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = init_with_level(verbosity_level(args.verbose, args.quiet));
    }
}

fn load_config(args: &Args) -> Result<PipelineConfig, PipelineError> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load_json(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(image) = &args.image {
        config.capture.image = Some(image.clone());
    }
    if let Some(detections) = &args.detections {
        config.detector.detections = Some(detections.clone());
    }
    if let Some(color) = args.active_color {
        config.active_color = color;
    }
    if args.fen_only {
        config.fen_only = true;
    }
    if let Some(report) = &args.report {
        config.report_path = Some(report.clone());
    }
    Ok(config)
}

fn print_turn(outcome: &TurnOutcome, fen_only: bool) {
    if fen_only {
        println!("{}", outcome.fen);
        return;
    }
    let state = &outcome.state;
    println!(
        "--- Turn {}: {:?} to move ({}) ---",
        state.turn,
        state.active_color,
        outcome.frame.path.display()
    );
    println!("FEN: {}", outcome.fen);
    match (&outcome.best_move, &outcome.waypoints) {
        (None, _) => println!("No move: game over"),
        (Some(mv), Some(plan)) => {
            println!("Best move: {mv}");
            println!("Waypoints: {plan}");
        }
        (Some(mv), None) => println!("Best move: {mv}"),
    }
}

fn run(args: &Args) -> Result<(), PipelineError> {
    let config = load_config(args)?;
    let mut pipeline = config.build_pipeline()?;
    let mut state = GameState::new(config.active_color);

    let summary = pipeline.play(&mut state, args.turns, |outcome| {
        print_turn(outcome, config.fen_only)
    });

    if let Some(path) = &config.report_path {
        RunReport::from_summary(&summary, &state).write_json(path)?;
    }
    match summary.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}
