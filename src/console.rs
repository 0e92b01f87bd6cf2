use crate::error::{CommandError, GridError};
use crate::pathfinding::format_path;
use crate::session::Session;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

pub const BUSY_MESSAGE: &str = "Console is disabled when running!";
pub const NOT_READY_MESSAGE: &str =
    "Map is not ready to run! You need to assign both start point and dest point to run!";
pub const OUT_OF_RANGE_MESSAGE: &str = "Given position is out of range!";

const HELP: &str = "Commands:\n  \
    clear            remove every barricade\n  \
    reset            forget the last search\n  \
    setstart [x] [y] place the start point\n  \
    setdest [x] [y]  place the destination point\n  \
    run              search from start to destination\n  \
    path             print the last path\n  \
    show             print the grid\n  \
    log              print the action log\n  \
    help             show this message";

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Clear,
    Reset,
    SetStart { x: i32, y: i32 },
    SetDest { x: i32, y: i32 },
    Run,
    Path,
    Show,
    Log,
    Help,
}

fn expect_arity(tokens: &[&str], count: usize, usage: &'static str) -> Result<(), CommandError> {
    if tokens.len() != count {
        return Err(CommandError::Usage(usage));
    }
    Ok(())
}

fn parse_position(tokens: &[&str], usage: &'static str) -> Result<(i32, i32), CommandError> {
    expect_arity(tokens, 3, usage)?;
    let x = tokens[1].parse().map_err(|_| CommandError::Usage(usage))?;
    let y = tokens[2].parse().map_err(|_| CommandError::Usage(usage))?;
    Ok((x, y))
}

/// Parse one line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&verb) = tokens.first() else {
        return Ok(None);
    };

    let command = match verb {
        "clear" => {
            expect_arity(&tokens, 1, "clear")?;
            Command::Clear
        }
        "reset" => {
            expect_arity(&tokens, 1, "reset")?;
            Command::Reset
        }
        "setstart" => {
            let (x, y) = parse_position(&tokens, "setstart [x] [y]")?;
            Command::SetStart { x, y }
        }
        "setdest" => {
            let (x, y) = parse_position(&tokens, "setdest [x] [y]")?;
            Command::SetDest { x, y }
        }
        "run" => {
            expect_arity(&tokens, 1, "run")?;
            Command::Run
        }
        "path" => {
            expect_arity(&tokens, 1, "path")?;
            Command::Path
        }
        "show" => {
            expect_arity(&tokens, 1, "show")?;
            Command::Show
        }
        "log" => {
            expect_arity(&tokens, 1, "log")?;
            Command::Log
        }
        "help" => Command::Help,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Message for a failed start/destination placement
fn marker_error(err: GridError, marker: &str) -> String {
    match err {
        GridError::OutOfRange { .. } => OUT_OF_RANGE_MESSAGE.to_string(),
        GridError::Blocked { .. } => format!("You can't create a {} point in a wall!", marker),
        GridError::Busy => BUSY_MESSAGE.to_string(),
        other => other.to_string(),
    }
}

fn grid_error(err: GridError) -> String {
    match err {
        GridError::Busy => BUSY_MESSAGE.to_string(),
        GridError::NotReady => NOT_READY_MESSAGE.to_string(),
        GridError::OutOfRange { .. } => OUT_OF_RANGE_MESSAGE.to_string(),
        other => other.to_string(),
    }
}

/// Line-oriented command interpreter driving a `Session`
pub struct Console {
    session: Arc<Session>,
}

impl Console {
    pub fn new(session: Arc<Session>) -> Self {
        Console { session }
    }

    /// Execute one line and return the reply to print, if any
    pub fn execute(&self, line: &str) -> Option<String> {
        if self.session.is_running() {
            return Some(BUSY_MESSAGE.to_string());
        }

        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return None,
            Err(e) => return Some(e.to_string()),
        };
        log::debug!("Console command: {:?}", command);

        match command {
            Command::Clear => self.session.clear().err().map(grid_error),
            Command::Reset => self.session.reset().err().map(grid_error),
            Command::SetStart { x, y } => self
                .session
                .set_start(x, y)
                .err()
                .map(|e| marker_error(e, "starting")),
            Command::SetDest { x, y } => self
                .session
                .set_destination(x, y)
                .err()
                .map(|e| marker_error(e, "dest")),
            Command::Run => match self.session.run() {
                Ok((start, dest)) => Some(format!(
                    "Searching from ({},{}) to ({},{})...",
                    start.x, start.y, dest.x, dest.y
                )),
                Err(e) => Some(grid_error(e)),
            },
            Command::Path => Some(match self.session.path() {
                Ok(path) => format!("{} ({} steps)", format_path(&path), path.len() - 1),
                Err(_) => format_path(&[]),
            }),
            Command::Show => Some(self.session.snapshot().to_ascii()),
            Command::Log => Some(format!(
                "{}\n{}",
                self.session.action_log_text(),
                self.session.action_summary()
            )),
            Command::Help => Some(HELP.to_string()),
        }
    }

    /// Read commands until end of input, writing replies to `output`
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            if let Some(reply) = self.execute(&line) {
                writeln!(output, "{}", reply)?;
                output.flush()?;
            }
        }
        log::info!("Console input closed");
        Ok(())
    }
}
