use std::io;

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can end a run early.
///
/// Configuration and resource errors happen before any work is done, so no
/// partial output exists. Anything else is raised mid-run and leaves the
/// shared buffers in an unusable state: the run is torn down and the first
/// error recorded is handed back to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid engine configuration, e.g. a thread count of zero.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Resource(#[from] io::Error),

    /// A lock, barrier or wait primitive failed at run time.
    #[error("synchronization failure: {0}")]
    Synchronization(String),

    /// A map or reduce callback returned an error.
    #[error("client callback failed: {0:#}")]
    Client(anyhow::Error),

    /// A worker thread panicked, most likely inside a client callback.
    #[error("worker panicked: {0}")]
    WorkerPanicked(String),

    /// The run was torn down because another worker failed.
    #[error("run aborted")]
    Aborted,
}

impl Error {
    pub(crate) fn poisoned(what: &str) -> Self {
        Error::Synchronization(format!("{what} mutex poisoned"))
    }
}
