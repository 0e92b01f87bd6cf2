pub mod action_log;
pub mod config;
pub mod console;
pub mod error;
pub mod grid;
pub mod input;
pub mod pathfinding;
pub mod session;

pub use config::Config;
pub use error::{CommandError, ConfigError, GridError};
pub use grid::{CellKind, Direction, Grid, GridSnapshot, Position};
pub use pathfinding::{SearchEngine, SearchOutcome};
pub use session::Session;
