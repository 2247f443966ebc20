use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::error;

use super::barrier::Barrier;
use super::channel::GroupChannel;
use super::client::{IntermediateGroup, MapReduceClient};
use super::distributor::WorkDistributor;
use super::error::{Error, Result};
use super::sink::OutputSink;

type Buffer<C> = Vec<(<C as MapReduceClient>::K2, <C as MapReduceClient>::V2)>;

/// Everything one run shares between its workers.
///
/// Created by `run`, borrowed by every worker thread, and consumed once all
/// of them have been joined. Nothing here outlives the run.
pub(crate) struct RunContext<'a, C: MapReduceClient> {
    pub client: &'a C,
    pub input: &'a [(C::K1, C::V1)],
    pub distributor: WorkDistributor,
    /// Held shut by the orchestrator until every worker has been spawned,
    /// so a spawn failure leaves the client untouched.
    pub start: Barrier,
    pub barrier: Barrier,
    pub channel: GroupChannel<IntermediateGroup<C::K2, C::V2>>,
    pub sink: OutputSink<C::K3, C::V3>,
    /// One slot per worker. Filled by its owner right before the barrier,
    /// emptied by the shuffle coordinator right after it.
    buffers: Vec<Mutex<Option<Buffer<C>>>>,
    shuffle_started: AtomicBool,
    failed: AtomicBool,
    failure: Mutex<Option<Error>>,
}

impl<'a, C: MapReduceClient> RunContext<'a, C> {
    pub fn new(client: &'a C, input: &'a [(C::K1, C::V1)], workers: usize) -> Self {
        Self {
            client,
            input,
            distributor: WorkDistributor::new(input.len()),
            start: Barrier::new(workers + 1),
            barrier: Barrier::new(workers),
            channel: GroupChannel::default(),
            sink: OutputSink::default(),
            buffers: (0..workers).map(|_| Mutex::new(None)).collect(),
            shuffle_started: AtomicBool::new(false),
            failed: AtomicBool::new(false),
            failure: Mutex::new(None),
        }
    }

    /// Hand a worker's sorted buffer over for shuffling.
    pub fn deposit(&self, worker: usize, buffer: Buffer<C>) -> Result<()> {
        *self.buffers[worker]
            .lock()
            .map_err(|_| Error::poisoned("buffer slot"))? = Some(buffer);
        Ok(())
    }

    /// Take every deposited buffer. Only the shuffle coordinator calls this.
    pub fn take_buffers(&self) -> Result<Vec<Buffer<C>>> {
        self.buffers
            .iter()
            .map(|slot| -> Result<Buffer<C>> {
                let mut slot = slot.lock().map_err(|_| Error::poisoned("buffer slot"))?;
                Ok(slot.take().unwrap_or_default())
            })
            .collect()
    }

    /// True for exactly one caller per run.
    pub fn elect_coordinator(&self) -> bool {
        self.shuffle_started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    /// Record a fatal error and wake every blocked worker so the run can wind down.
    ///
    /// The first real error is kept; `Aborted` only fills an empty slot.
    pub fn fail(&self, err: Error) {
        let mut failure = match self.failure.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let replace = match (&*failure, &err) {
            (None, _) => true,
            (Some(Error::Aborted), e) => !matches!(e, Error::Aborted),
            _ => false,
        };
        if replace {
            if !matches!(err, Error::Aborted) {
                error!(error = %err, "map reduce run failed");
            }
            *failure = Some(err);
        }
        drop(failure);

        self.failed.store(true, Ordering::Release);
        self.start.abort();
        self.barrier.abort();
        self.channel.abort();
    }

    /// The run's output, or the error that ended it.
    pub fn finish(self) -> Result<Vec<(C::K3, C::V3)>> {
        let failure = match self.failure.into_inner() {
            Ok(failure) => failure,
            Err(poisoned) => poisoned.into_inner(),
        };
        match failure {
            Some(err) => Err(err),
            None => self.sink.into_inner(),
        }
    }
}
