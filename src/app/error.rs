use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ContextError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ContextError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("JSON Parsing Error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("TOML Parsing Error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid glob pattern \"{pattern}\": {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid ignore rule \"{pattern}\": {source}")]
    Ignore {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
