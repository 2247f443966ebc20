use std::sync::{Condvar, Mutex};

use super::error::{Error, Result};

#[derive(Debug)]
struct BarrierState {
    arrived: usize,
    generation: u64,
    broken: bool,
}

/// Rendezvous point for a fixed number of participants.
///
/// The last arrival resets the count, bumps the generation and wakes
/// everybody. Waiters block on the generation rather than the count, so a
/// spurious wakeup or a fast thread re-entering the next round cannot
/// release anyone early. The barrier can be reused indefinitely.
#[derive(Debug)]
pub struct Barrier {
    parties: usize,
    state: Mutex<BarrierState>,
    cvar: Condvar,
}

impl Barrier {
    pub fn new(parties: usize) -> Self {
        Self {
            parties,
            state: Mutex::new(BarrierState {
                arrived: 0,
                generation: 0,
                broken: false,
            }),
            cvar: Condvar::new(),
        }
    }

    /// Block until all `parties` have called `wait`.
    ///
    /// Returns `Err(Error::Aborted)` if the barrier was broken by
    /// [`Barrier::abort`] before or while waiting.
    pub fn wait(&self) -> Result<()> {
        let mut state = self.state.lock().map_err(|_| Error::poisoned("barrier"))?;
        if state.broken {
            return Err(Error::Aborted);
        }

        state.arrived += 1;
        if state.arrived == self.parties {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.cvar.notify_all();
            return Ok(());
        }

        let generation = state.generation;
        let state = self
            .cvar
            .wait_while(state, |s| s.generation == generation && !s.broken)
            .map_err(|_| Error::poisoned("barrier"))?;
        if state.generation == generation {
            // Woken by abort, not by the last arrival.
            return Err(Error::Aborted);
        }
        Ok(())
    }

    /// Break the barrier, releasing all current and future waiters with an error.
    pub fn abort(&self) {
        // A poisoned barrier is as good as broken; still mark it and wake everyone.
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.broken = true;
        self.cvar.notify_all();
    }
}
