use thiserror::Error;

/// Errors reported by grid accessors, the search engine and the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// Coordinate outside the grid dimensions
    #[error("position ({x}, {y}) is out of range")]
    OutOfRange { x: i32, y: i32 },
    /// Cell is a barricade (or would cover the start/destination)
    #[error("position ({x}, {y}) is blocked")]
    Blocked { x: i32, y: i32 },
    /// Start or destination not assigned
    #[error("start and destination must both be set")]
    NotReady,
    /// A search is running
    #[error("a search is currently running")]
    Busy,
    /// Destination was never reached
    #[error("no path to destination")]
    NotFound,
    #[error("grid dimensions must be non-zero (got {cols}x{rows})")]
    EmptyDimensions { cols: i32, rows: i32 },
    /// Cell count does not fit the coordinate type
    #[error("grid of {cols}x{rows} cells is too large")]
    TooLarge { cols: i32, rows: i32 },
    /// The search thread could not be started
    #[error("failed to start search thread")]
    SpawnFailed,
}

/// Errors produced while interpreting a console line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Wrong argument count or unparseable number; carries the usage line
    #[error("Wrong parameters! [help]: {0}")]
    Usage(&'static str),
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
