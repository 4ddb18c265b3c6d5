use std::io;
use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Queue construction errors
// =============================================================================

/// Failures that can happen while opening an order queue.
///
/// Once a queue is open nothing else fails: a full queue and an empty queue
/// are flow-control states handled by blocking.
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("queue capacity must be positive")]
    ZeroCapacity,

    #[error("could not allocate room for {capacity} orders: {reason}")]
    Resource { capacity: usize, reason: String },
}

// =============================================================================
// Configuration errors
// =============================================================================

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Kitchen (thread harness) errors
// =============================================================================

#[derive(Error, Debug)]
pub enum KitchenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("failed to spawn thread '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("thread '{name}' panicked")]
    ThreadPanicked { name: String },

    #[error("order queue is still shared by {holders} handles at closing time")]
    QueueStillShared { holders: usize },
}
