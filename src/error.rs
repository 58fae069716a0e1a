use std::path::PathBuf;

/// Errors raised by the fallible edges of the game: config and high-score
/// files.  Nothing inside the per-frame simulation produces one.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// A file the game wanted to read is missing or unreadable.
    #[error("failed to load file: {}", path.display())]
    ResourceLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Data that cannot be interpreted, e.g. a malformed high-score line.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl GameError {
    pub fn resource_load(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GameError::ResourceLoad {
            path: path.into(),
            source,
        }
    }

    /// Short category name, mirrored into log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::ResourceLoad { .. } => "FileLoad",
            GameError::InvalidState(_) => "InvalidState",
            GameError::Io(_) => "Io",
            GameError::ConfigParse(_) => "Config",
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
