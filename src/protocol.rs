//! Line-oriented text protocol.
//!
//! Commands are read one per line, optionally prefixed by a numeric id.
//! Every command is answered with `=` (success) or `?` (failure), the id if
//! one was given, the response text and a blank line, in the manner of the
//! Go Text Protocol.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit` - Exit the loop
//! - `isready` - Answer `readyok`
//! - `newgame` - Start from the empty board
//! - `position <snapshot>` - Start from a snapshot (`w:0,1;b:5;b;3;3`)
//! - `play <move>` - Commit a move in raw index form (`P5`, `M3-4x9`)
//! - `setparameter <NAME> <value>` - Set `PIECE`, `FREEDOM`, `END_GAME` or `DEPTH`
//! - `parameters` - Show the current parameters
//! - `showboard` - Draw the board and print the snapshot
//! - `go [movetime <ms>]` - Search, commit and answer the chosen move with
//!   diagnostics; a move time bounds the search by wall time
//! - `outcome` - `white`, `black`, `draw` or `none`
//!
//! ## Example
//!
//! ```ignore
//! use muhle_engine::protocol::ProtocolSession;
//! let mut session = ProtocolSession::new()?;
//! session.run(std::io::stdin().lock(), std::io::stdout())?;
//! ```

use std::io::{self, BufRead, Write};
use std::time::Duration;

use log::{info, warn};

use crate::engine::Engine;
use crate::error::EngineError;
use crate::evaluation::Outcome;
use crate::game::Game;
use crate::parameters::{Parameter, SearchParameters};
use crate::position::{Move, Position};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "go",
    "isready",
    "known_command",
    "list_commands",
    "name",
    "newgame",
    "outcome",
    "parameters",
    "play",
    "position",
    "protocol_version",
    "quit",
    "setparameter",
    "showboard",
    "version",
];

/// Protocol state: the game being played and the engine searching it.
pub struct ProtocolSession {
    game: Game,
    engine: Engine,
    movetime: Option<Duration>,
}

impl ProtocolSession {
    pub fn new() -> Result<Self, EngineError> {
        Self::with_parameters(SearchParameters::default())
    }

    pub fn with_parameters(params: SearchParameters) -> Result<Self, EngineError> {
        Ok(Self {
            game: Game::new(),
            engine: Engine::with_parameters(params)?,
            movetime: None,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Move time used by a bare `go`.
    pub fn set_movetime(&mut self, movetime: Option<Duration>) {
        self.movetime = movetime;
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        info!("protocol session started");

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

            let (success, message) = self.execute(&command, args);
            if !success {
                warn!("command `{command_line}` failed: {message}");
            }

            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }

        info!("protocol session ended");
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());

        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => match args.first() {
                Some(name) => {
                    let known = KNOWN_COMMANDS.contains(&name.to_lowercase().as_str());
                    (true, known.to_string())
                }
                None => (false, "missing argument".to_string()),
            },

            "quit" => (true, String::new()),

            "isready" => (true, "readyok".to_string()),

            "newgame" => {
                self.game = Game::new();
                (true, String::new())
            }

            "position" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                match args.concat().parse::<Position>() {
                    Ok(pos) => {
                        self.game = Game::from_position(pos);
                        (true, String::new())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "play" => {
                let Some(text) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Some(mv) = self.find_move(text) else {
                    return (false, format!("illegal move {text}"));
                };
                match self.game.play(mv) {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "setparameter" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let parameter = match args[0].parse::<Parameter>() {
                    Ok(p) => p,
                    Err(e) => return (false, e.to_string()),
                };
                let Ok(value) = args[1].parse::<i64>() else {
                    return (false, format!("invalid value `{}`", args[1]));
                };
                match self.engine.set_parameter(parameter, value) {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "parameters" => (true, self.engine.parameters().to_string()),

            "showboard" => {
                let position = self.game.position();
                (true, format!("\n{}{}", position.board, position))
            }

            "go" => match Self::parse_movetime(args) {
                Ok(movetime) => self.go(movetime.or(self.movetime)),
                Err(message) => (false, message),
            },

            "outcome" => {
                let text = match self.game.outcome() {
                    Some(Outcome::WhiteWins) => "white",
                    Some(Outcome::BlackWins) => "black",
                    Some(Outcome::Draw) => "draw",
                    None => "none",
                };
                (true, text.to_string())
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }

    /// Match raw move text against the legal moves of the current position.
    fn find_move(&self, text: &str) -> Option<Move> {
        self.game
            .legal_moves()
            .into_iter()
            .find(|mv| mv.to_string().eq_ignore_ascii_case(text))
    }

    /// Parse the arguments of `go`: nothing, or `movetime <ms>`.
    fn parse_movetime(args: &[&str]) -> Result<Option<Duration>, String> {
        match args {
            [] => Ok(None),
            [key, ms] if key.eq_ignore_ascii_case("movetime") => ms
                .parse::<u64>()
                .map(|ms| Some(Duration::from_millis(ms)))
                .map_err(|_| format!("invalid movetime `{ms}`")),
            _ => Err(format!("unexpected arguments: {}", args.join(" "))),
        }
    }

    fn go(&mut self, movetime: Option<Duration>) -> (bool, String) {
        if self.game.outcome().is_some() {
            return (false, "game is over".to_string());
        }

        let request = self.game.search_request().with_movetime(movetime);
        let result = match self.engine.search(request) {
            Ok(result) => result,
            Err(e) => return (false, e.to_string()),
        };
        let Some(mv) = result.best_move else {
            return (false, "no legal move".to_string());
        };
        if let Err(e) = self.game.play(mv) {
            return (false, e.to_string());
        }

        (
            true,
            format!(
                "{mv} eval {} depth {} nodes {} time {}",
                result.evaluation,
                result.depth,
                result.nodes,
                result.elapsed.as_millis()
            ),
        )
    }
}
