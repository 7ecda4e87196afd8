use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// How long the engine may think.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchLimit {
    /// `go movetime <ms>`
    MoveTime(u64),
    /// `go depth <plies>`
    Depth(u32),
}

/// Engine process and search configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// Engine executable.
    pub path: PathBuf,
    pub args: Vec<String>,
    /// UCI `Threads`.
    pub threads: u32,
    /// UCI `Skill Level` (0..=20).
    pub skill_level: u8,
    /// UCI `Minimum Thinking Time`, in ms.
    pub minimum_thinking_time_ms: u64,
    pub limit: SearchLimit,
    /// Time allowed for `uciok` / `readyok`.
    pub handshake_timeout_ms: u64,
    /// Extra time on top of the search limit before a query times out.
    /// With [`SearchLimit::Depth`] this is the whole budget.
    pub search_grace_ms: u64,
    /// Additional `setoption` pairs sent after the defaults.
    pub extra_options: BTreeMap<String, String>,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stockfish"),
            args: Vec::new(),
            threads: 2,
            skill_level: 20,
            minimum_thinking_time_ms: 100,
            limit: SearchLimit::MoveTime(2000),
            handshake_timeout_ms: 10_000,
            search_grace_ms: 5_000,
            extra_options: BTreeMap::new(),
        }
    }
}

impl EngineParams {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// `setoption` pairs in the order they are sent.
    pub fn uci_options(&self) -> Vec<(String, String)> {
        let mut out = vec![
            ("Threads".to_string(), self.threads.to_string()),
            (
                "Minimum Thinking Time".to_string(),
                self.minimum_thinking_time_ms.to_string(),
            ),
            ("Skill Level".to_string(), self.skill_level.min(20).to_string()),
        ];
        out.extend(
            self.extra_options
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        out
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }

    pub fn search_timeout(&self) -> Duration {
        let base = match self.limit {
            SearchLimit::MoveTime(ms) => ms,
            SearchLimit::Depth(_) => 0,
        };
        Duration::from_millis(base + self.search_grace_ms)
    }
}
