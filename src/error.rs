use std::path::PathBuf;

/// Failures while loading `config.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// A rebuilt maze that failed validation. The session keeps its previous maze.
#[derive(Debug, thiserror::Error)]
pub enum RegenerationError {
    #[error("spanning tree is incomplete: {edges} passages for {cells} cells")]
    IncompleteTree { edges: usize, cells: usize },
    #[error("rebuilt maze is not a perfect maze")]
    InvariantViolation,
}
