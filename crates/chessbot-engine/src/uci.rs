//! UCI protocol lines: commands we send and responses we understand.

use crate::error::EngineError;
use crate::params::SearchLimit;
use chessbot_core::CoordinateMove;

/// Commands sent to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    SetOption { name: String, value: String },
    Position { fen: String },
    Go(SearchLimit),
    Stop,
    Quit,
}

impl UciCommand {
    /// Protocol text, without the trailing newline.
    pub fn to_uci_string(&self) -> String {
        match self {
            UciCommand::Uci => "uci".to_string(),
            UciCommand::IsReady => "isready".to_string(),
            UciCommand::UciNewGame => "ucinewgame".to_string(),
            UciCommand::SetOption { name, value } => {
                format!("setoption name {name} value {value}")
            }
            UciCommand::Position { fen } => format!("position fen {fen}"),
            UciCommand::Go(SearchLimit::MoveTime(ms)) => format!("go movetime {ms}"),
            UciCommand::Go(SearchLimit::Depth(d)) => format!("go depth {d}"),
            UciCommand::Stop => "stop".to_string(),
            UciCommand::Quit => "quit".to_string(),
        }
    }
}

/// Engine output, one line at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciResponse {
    UciOk,
    ReadyOk,
    /// `id name ...` / `id author ...`
    Id { key: String, value: String },
    /// `bestmove <move> [ponder <move>]`
    BestMove { mv: String, ponder: Option<String> },
    Info(String),
    Other(String),
}

impl UciResponse {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line == "uciok" {
            UciResponse::UciOk
        } else if line == "readyok" {
            UciResponse::ReadyOk
        } else if let Some(rest) = line.strip_prefix("id ") {
            let (key, value) = rest.split_once(' ').unwrap_or((rest, ""));
            UciResponse::Id {
                key: key.to_string(),
                value: value.trim().to_string(),
            }
        } else if let Some(rest) = line.strip_prefix("bestmove") {
            let mut tokens = rest.split_whitespace();
            let mv = tokens.next().unwrap_or_default().to_string();
            let ponder = match (tokens.next(), tokens.next()) {
                (Some("ponder"), Some(p)) => Some(p.to_string()),
                _ => None,
            };
            UciResponse::BestMove { mv, ponder }
        } else if let Some(rest) = line.strip_prefix("info ") {
            UciResponse::Info(rest.to_string())
        } else {
            UciResponse::Other(line.to_string())
        }
    }
}

/// Interpret the move token of a `bestmove` line.
///
/// `(none)`, `0000` and an empty token mean the engine has no move.
pub fn parse_best_move(token: &str) -> Result<Option<CoordinateMove>, EngineError> {
    match token {
        "" | "(none)" | "0000" => Ok(None),
        t => t
            .parse()
            .map(Some)
            .map_err(|e| EngineError::Protocol(format!("bestmove '{t}': {e}"))),
    }
}
