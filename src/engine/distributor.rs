use std::sync::atomic::{AtomicUsize, Ordering};

/// Hands out input indices to workers through one shared counter.
///
/// Every index in `0..len` is returned to exactly one caller. Never blocks.
#[derive(Debug)]
pub struct WorkDistributor {
    next: AtomicUsize,
    len: usize,
}

impl WorkDistributor {
    pub fn new(len: usize) -> Self {
        Self {
            next: AtomicUsize::new(0),
            len,
        }
    }

    /// Claim the next unprocessed index, or `None` once the input is exhausted.
    #[inline]
    pub fn claim_next(&self) -> Option<usize> {
        // Relaxed is enough: the counter orders nothing but itself, and the
        // input slice is immutable for the whole run.
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        (index < self.len).then_some(index)
    }
}
