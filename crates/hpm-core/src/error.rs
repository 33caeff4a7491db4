use std::path::PathBuf;

/// Failure reading or writing the durable state record.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Failure loading or validating a reference catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// A mutation rejected at the API boundary. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    #[error("Intensity must be between 1 and 5, got {0}")]
    IntensityOutOfRange(u8),

    #[error("Game face name must not be empty")]
    EmptyGameFaceName,

    #[error("Game face needs at least one power word")]
    NoPowerWords,

    #[error("Game face takes at most {max} power words, got {got}")]
    TooManyPowerWords { max: usize, got: usize },

    #[error("Streak reward for {0} days already claimed")]
    RewardAlreadyClaimed(u32),

    #[error("No streak reward exists for {0} days")]
    UnknownReward(u32),

    #[error("Metric score must be 0 or 1, got {0}")]
    InvalidScore(u8),

    #[error("Text must not be empty")]
    EmptyText,
}
