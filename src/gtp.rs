//! Go Text Protocol (GTP) front-end.
//!
//! GTP is a text-based protocol for communicating with Go-playing programs.
//! This module implements the subset of GTP version 2 needed to play games
//! from graphical interfaces like Sabaki or GoGui.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>`, `clear_board`, `komi <value>`
//! - `play <color> <vertex>` - Play a move
//! - `genmove <color>` - Think, then generate and play a move
//! - `showboard` - Print the board
//! - `num_simulations` - Rollouts counted at the root (extension)
//!
//! Arguments are checked and converted here; the engine only ever sees typed
//! values.

use std::io::{BufRead, Write};

use log::debug;
use thiserror::Error;

use crate::ai::Ai;
use crate::board::{Move, MoveError};
use crate::color::Color;
use crate::config::EngineConfig;
use crate::constants::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::coord::{VertexError, format_vertex, parse_vertex};

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "num_simulations",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
];

/// Errors reported back to the GTP client as `? message`.
#[derive(Debug, Error)]
pub enum GtpError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("{command} expects {expected} argument(s)")]
    BadArity { command: String, expected: usize },
    #[error("invalid argument: {0}")]
    BadArgument(String),
    #[error(transparent)]
    Vertex(#[from] VertexError),
    #[error(transparent)]
    IllegalMove(#[from] MoveError),
}

/// GTP engine state.
pub struct GtpEngine {
    ai: Ai,
}

impl Default for GtpEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl GtpEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { ai: Ai::new(config) }
    }

    pub fn ai(&self) -> &Ai {
        &self.ai
    }

    /// Run the GTP command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();
            debug!("gtp < {command_line}");

            let (prefix, message) = match self.execute(&command, args) {
                Ok(message) => ('=', message),
                Err(e) => ('?', e.to_string()),
            };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        self.ai.stop_thinking();
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(trimmed.len(), |(i, _)| i);
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    fn expect_args(command: &str, args: &[&str], expected: usize) -> Result<(), GtpError> {
        if args.len() < expected {
            return Err(GtpError::BadArity {
                command: command.to_string(),
                expected,
            });
        }
        Ok(())
    }

    fn parse_color(s: &str) -> Result<Color, GtpError> {
        Color::parse(s).ok_or_else(|| GtpError::BadArgument(format!("color {s}")))
    }

    fn format_move(&self, mv: Move) -> String {
        match self.ai.move_xy(mv) {
            Some((x, y)) => format_vertex(x, y),
            None => "pass".to_string(),
        }
    }

    /// Execute a GTP command and return the response text.
    pub fn execute(&mut self, command: &str, args: &[&str]) -> Result<String, GtpError> {
        match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => Ok("2".to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                Self::expect_args(command, args, 1)?;
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                Ok(known.to_string())
            }

            "quit" => {
                self.ai.stop_thinking();
                Ok(String::new())
            }

            "boardsize" => {
                Self::expect_args(command, args, 1)?;
                match args[0].parse::<usize>() {
                    Ok(size) if (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) => {
                        self.ai.set_board_size(size);
                        Ok(String::new())
                    }
                    _ => Err(GtpError::BadArgument(format!("unacceptable size {}", args[0]))),
                }
            }

            "clear_board" => {
                self.ai.clear_board();
                Ok(String::new())
            }

            "komi" => {
                Self::expect_args(command, args, 1)?;
                let komi = args[0]
                    .parse::<f64>()
                    .ok()
                    .filter(|k| k.is_finite())
                    .ok_or_else(|| GtpError::BadArgument(format!("komi {}", args[0])))?;
                self.ai.set_komi(komi);
                Ok(String::new())
            }

            "play" => {
                Self::expect_args(command, args, 2)?;
                let color = Self::parse_color(args[0])?;
                if args[1].eq_ignore_ascii_case("pass") {
                    self.ai.play_pass(color);
                    return Ok(String::new());
                }
                let (x, y) = parse_vertex(args[1], self.ai.board().size())?;
                self.ai.play_move(x, y, color)?;
                Ok(String::new())
            }

            "genmove" => {
                Self::expect_args(command, args, 1)?;
                let color = Self::parse_color(args[0])?;
                let budget = self.ai.config().thinking_time;
                let mv = self.ai.generate_move(color, budget);
                Ok(self.format_move(mv))
            }

            "showboard" => Ok(format!("\n{}", self.ai.board())),

            "num_simulations" => Ok(self.ai.num_simulations().to_string()),

            _ => Err(GtpError::UnknownCommand(command.to_string())),
        }
    }
}
