use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use super::error::{Error, Result};

#[derive(Debug)]
struct ChannelState<T> {
    queue: VecDeque<T>,
    done: bool,
    aborted: bool,
}

/// Handoff between the shuffle coordinator and the reducer pool.
///
/// The queue, the completion flag and the abort flag share one lock so that
/// "publisher is done" and "queue is empty" are always observed together.
/// Groups come out in the order they were published.
#[derive(Debug)]
pub struct GroupChannel<T> {
    state: Mutex<ChannelState<T>>,
    cvar: Condvar,
}

impl<T> Default for GroupChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GroupChannel<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ChannelState {
                queue: VecDeque::new(),
                done: false,
                aborted: false,
            }),
            cvar: Condvar::new(),
        }
    }

    /// Push one group and wake a single waiting consumer.
    pub fn publish(&self, group: T) -> Result<()> {
        let mut state = self.state.lock().map_err(|_| Error::poisoned("channel"))?;
        if state.aborted {
            return Err(Error::Aborted);
        }
        state.queue.push_back(group);
        self.cvar.notify_one();
        Ok(())
    }

    /// Mark the channel complete and wake every waiting consumer.
    pub fn close(&self) -> Result<()> {
        let mut state = self.state.lock().map_err(|_| Error::poisoned("channel"))?;
        state.done = true;
        self.cvar.notify_all();
        Ok(())
    }

    /// Block until a group is available or the channel is closed and drained.
    ///
    /// `Ok(None)` means there is no more work.
    pub fn recv(&self) -> Result<Option<T>> {
        let state = self.state.lock().map_err(|_| Error::poisoned("channel"))?;
        let mut state = self
            .cvar
            .wait_while(state, |s| s.queue.is_empty() && !s.done && !s.aborted)
            .map_err(|_| Error::poisoned("channel"))?;
        if state.aborted {
            return Err(Error::Aborted);
        }
        Ok(state.queue.pop_front())
    }

    /// Tear the channel down; pending and future `recv` calls fail.
    pub fn abort(&self) {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.aborted = true;
        state.queue.clear();
        self.cvar.notify_all();
    }
}
