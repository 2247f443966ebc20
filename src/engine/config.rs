use std::num::NonZeroUsize;
use std::thread;

use super::error::{Error, Result};

/// Engine settings. The thread count is the only knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    thread_count: NonZeroUsize,
}

impl EngineConfig {
    /// Returns [`Error::Configuration`] if `thread_count` is zero.
    pub fn new(thread_count: usize) -> Result<Self> {
        NonZeroUsize::new(thread_count)
            .map(|thread_count| Self { thread_count })
            .ok_or_else(|| {
                Error::Configuration("thread count has to be a positive number".to_string())
            })
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count.get()
    }
}

impl Default for EngineConfig {
    /// One worker per available core, or a single worker if that is unknown.
    fn default() -> Self {
        Self {
            thread_count: thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl TryFrom<i64> for EngineConfig {
    type Error = Error;

    fn try_from(thread_count: i64) -> Result<Self> {
        let thread_count = usize::try_from(thread_count).map_err(|_| {
            Error::Configuration(format!(
                "thread count has to be a positive number, got {thread_count}"
            ))
        })?;
        Self::new(thread_count)
    }
}
