// Error types: schedule/setup validation and command-line parsing

use thiserror::Error;

/// Setup Errors
#[derive(Error, Debug, PartialEq, Clone)]
pub enum SetupError {
    #[error("Wave schedule is empty")]
    EmptySchedule,
    #[error("Wave {0} has no entries")]
    EmptyWave(usize),
    #[error("Wave {wave} entry {entry} spawns zero balloons")]
    ZeroCount { wave: usize, entry: usize },
    #[error("Path needs at least two waypoints, got {0}")]
    PathTooShort(usize),
    #[error("Invalid playfield dimensions {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("Spawn delay must be positive, got {0}")]
    InvalidSpawnDelay(f64),
}

/// Parse Errors
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error("Invalid tower placement '{0}', expected X,Y")]
    Placement(String),
    #[error("Unknown balloon kind '{0}'")]
    UnknownKind(String),
    #[error("Invalid wave entry '{0}', expected KIND:COUNT")]
    WaveEntry(String),
}
