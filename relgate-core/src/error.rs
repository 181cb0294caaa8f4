/// Top-level relgate error type.
///
/// The analysis functions themselves are total — malformed components,
/// missing dates, and empty stories are silent local recoveries (sentinel
/// values, not errors). The error channel exists for the boundaries:
/// payload ingest, report output, and configuration.
#[derive(thiserror::Error, Debug)]
pub enum RelgateError {
    /// Error reading or parsing an analysis payload or production snapshot.
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// Error producing rendered output (reports, JSON dumps).
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Error in configuration parsing or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors at the payload ingest boundary.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    /// Payload text is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload parsed but has no recognizable story list.
    #[error("Payload has no story list: {0}")]
    MissingStories(String),

    /// Production snapshot parsed but has no recognizable component list.
    #[error("Snapshot has no component list: {0}")]
    MissingComponents(String),

    /// Filesystem I/O error reading a payload file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors producing rendered output.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem I/O error writing rendered output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors in relgate configuration parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenience alias for `Result<T, RelgateError>`.
pub type Result<T> = std::result::Result<T, RelgateError>;
