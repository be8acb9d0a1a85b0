use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid date format. Use {expected} (e.g., {example})")]
    InvalidDate {
        expected: &'static str,
        example: &'static str,
    },

    #[error("Missing required arguments: {}", .0.join(", "))]
    MissingArguments(Vec<&'static str>),

    #[error("Error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error writing {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Could not build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[source] std::io::Error),
}
