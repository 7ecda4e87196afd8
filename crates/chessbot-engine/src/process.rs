//! UCI engine running as a child process.

use crate::engine::MoveEngine;
use crate::error::EngineError;
use crate::params::EngineParams;
use crate::uci::{parse_best_move, UciCommand, UciResponse};
use crate::validate::validate_fen;
use chessbot_core::CoordinateMove;
use log::{debug, info, trace, warn};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

#[cfg(feature = "tracing")]
use tracing::instrument;

const QUIT_GRACE: Duration = Duration::from_millis(250);

/// Engine process speaking UCI over stdin/stdout.
///
/// A reader thread forwards stdout lines over a channel so every wait can
/// be bounded by a timeout. Dropping the adapter sends `quit` and reaps the
/// process.
pub struct UciEngine {
    params: EngineParams,
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
    name: String,
}

impl UciEngine {
    /// Start the engine, run the `uci` handshake and apply options.
    ///
    /// Any failure up to the first `readyok` is reported as
    /// [`EngineError::Unavailable`].
    pub fn spawn(params: EngineParams) -> Result<Self, EngineError> {
        let path = params.path.clone();
        let unavailable = |reason: String| EngineError::Unavailable {
            path: path.clone(),
            reason,
        };

        let mut child = Command::new(&params.path)
            .args(&params.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| unavailable(e.to_string()))?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(unavailable("engine stdio not captured".to_string()));
        };

        let (tx, rx) = mpsc::channel();
        let reader = thread::Builder::new()
            .name("uci-reader".to_string())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else { break };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            });
        if let Err(e) = reader {
            let _ = child.kill();
            let _ = child.wait();
            return Err(unavailable(e.to_string()));
        }

        let mut engine = Self {
            params,
            child,
            stdin,
            lines: rx,
            name: String::from("engine"),
        };
        engine.handshake().map_err(|e| match e {
            EngineError::Unavailable { .. } => e,
            other => unavailable(other.to_string()),
        })?;
        info!("engine '{}' ready", engine.name);
        Ok(engine)
    }

    #[inline]
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    fn handshake(&mut self) -> Result<(), EngineError> {
        let timeout = self.params.handshake_timeout();
        self.send(&UciCommand::Uci)?;
        let mut name = None;
        self.wait_for("uciok", timeout, |resp| match resp {
            UciResponse::Id { key, value } if key == "name" => {
                name = Some(value);
                None
            }
            UciResponse::UciOk => Some(()),
            _ => None,
        })?;
        if let Some(name) = name {
            self.name = name;
        }

        for (name, value) in self.params.uci_options() {
            self.send(&UciCommand::SetOption { name, value })?;
        }
        self.sync(timeout)
    }

    fn sync(&mut self, timeout: Duration) -> Result<(), EngineError> {
        self.send(&UciCommand::IsReady)?;
        self.wait_for("readyok", timeout, |resp| {
            matches!(resp, UciResponse::ReadyOk).then_some(())
        })
    }

    fn send(&mut self, cmd: &UciCommand) -> Result<(), EngineError> {
        let text = cmd.to_uci_string();
        trace!(">> {text}");
        writeln!(self.stdin, "{text}")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Read lines until `accept` yields a value or `timeout` elapses.
    fn wait_for<T>(
        &mut self,
        waiting_for: &str,
        timeout: Duration,
        mut accept: impl FnMut(UciResponse) -> Option<T>,
    ) -> Result<T, EngineError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.lines.recv_timeout(remaining) {
                Ok(line) => {
                    trace!("<< {line}");
                    if let Some(value) = accept(UciResponse::parse(&line)) {
                        return Ok(value);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(EngineError::Timeout {
                        waiting_for: waiting_for.to_string(),
                        after_ms: timeout.as_millis() as u64,
                    })
                }
                Err(RecvTimeoutError::Disconnected) => return Err(EngineError::Exited),
            }
        }
    }
}

impl MoveEngine for UciEngine {
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip(self)))]
    fn best_move(&mut self, fen: &str) -> Result<Option<CoordinateMove>, EngineError> {
        let check = validate_fen(fen)?;
        if check.is_terminal() {
            info!("no legal moves (in check: {})", check.in_check);
            return Ok(None);
        }

        self.send(&UciCommand::UciNewGame)?;
        self.send(&UciCommand::Position {
            fen: fen.trim().to_string(),
        })?;
        self.sync(self.params.handshake_timeout())?;

        let started = Instant::now();
        self.send(&UciCommand::Go(self.params.limit))?;
        let token = self.wait_for("bestmove", self.params.search_timeout(), |resp| {
            match resp {
                UciResponse::BestMove { mv, .. } => Some(mv),
                UciResponse::Info(info) => {
                    trace!("info {info}");
                    None
                }
                _ => None,
            }
        })?;
        debug!(
            "bestmove {token} after {:.0} ms",
            started.elapsed().as_secs_f64() * 1000.0
        );
        parse_best_move(&token)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.send(&UciCommand::Quit);
        let deadline = Instant::now() + QUIT_GRACE;
        loop {
            match self.child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(10)),
                _ => break,
            }
        }
        warn!("engine did not quit, killing it");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
