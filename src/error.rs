use std::path::PathBuf;

/// Errors raised when a move cannot be placed on the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {col} is full")]
    ColumnFull { col: usize },

    #[error("column {col} is out of range (board has {cols} columns)")]
    InvalidColumn { col: usize, cols: usize },

    #[error("game is already over")]
    GameOver,
}

/// Errors that can occur when loading or editing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("missing evaluation weight '{0}'")]
    MissingWeight(String),

    #[error("unknown evaluation weight '{0}'")]
    UnknownWeight(String),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors returned by the move search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid evaluation config: {0}")]
    Config(#[from] ConfigError),

    #[error("no legal moves available")]
    NoLegalMoves,
}
