//! A shared-memory MapReduce engine running on a fixed pool of threads.
//!
//! Workers are held at a start gate until all of them have been spawned.
//! From there every worker runs the same sequence of phases:
//!
//! 1. claim input items from a shared counter and `map` them into a
//!    private buffer,
//! 2. sort that buffer by intermediate key,
//! 3. wait at a barrier for all other workers,
//! 4. the first worker through the barrier becomes the shuffle coordinator
//!    and publishes one group per distinct key, largest key first,
//! 5. everybody (coordinator included, once it is done) `reduce`s published
//!    groups until there are none left.
//!
//! A callback that never returns stalls the whole run; there is no timeout.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use tracing::{debug, trace};

mod barrier;
mod channel;
mod client;
mod config;
mod context;
mod distributor;
mod error;
mod mapper;
mod reducer;
mod shuffle;
mod sink;

pub use barrier::Barrier;
pub use channel::GroupChannel;
pub use client::{IntermediateGroup, MapReduceClient};
pub use config::EngineConfig;
pub use distributor::WorkDistributor;
pub use error::{Error, Result};
pub use mapper::MapEmitter;
pub use shuffle::{next_group, shuffle};
pub use sink::{OutputSink, ReduceEmitter};

use context::RunContext;

/// Run `client` over `input` with `thread_count` worker threads.
///
/// Returns every pair emitted by `reduce`, in no particular order. A thread
/// count of zero is rejected before any thread is started.
pub fn run<C: MapReduceClient>(
    client: &C,
    input: &[(C::K1, C::V1)],
    thread_count: usize,
) -> Result<Vec<(C::K3, C::V3)>> {
    let config = EngineConfig::new(thread_count)?;
    run_with_config(client, input, &config)
}

/// Same as [`run`], with an already validated configuration.
pub fn run_with_config<C: MapReduceClient>(
    client: &C,
    input: &[(C::K1, C::V1)],
    config: &EngineConfig,
) -> Result<Vec<(C::K3, C::V3)>> {
    let workers = config.thread_count();
    debug!(workers, items = input.len(), "starting map reduce run");

    let ctx = RunContext::new(client, input, workers);
    thread::scope(|scope| {
        let handles = spawn_workers(scope, &ctx, workers);
        // Nobody maps until every worker exists. After a spawn failure the
        // gate is already aborted and the parked workers simply exit.
        if !ctx.is_failed() {
            if let Err(err) = ctx.start.wait() {
                ctx.fail(err);
            }
        }
        for handle in handles {
            if let Err(payload) = handle.join() {
                ctx.fail(Error::WorkerPanicked(panic_message(payload.as_ref())));
            }
        }
    });

    let output = ctx.finish()?;
    debug!(outputs = output.len(), "map reduce run complete");
    Ok(output)
}

/// Spawn `workers` named threads, all parked at the start gate.
///
/// Stops at the first spawn failure and records it, which aborts the gate.
fn spawn_workers<'scope, 'env, C>(
    scope: &'scope thread::Scope<'scope, 'env>,
    ctx: &'scope RunContext<'scope, C>,
    workers: usize,
) -> Vec<thread::ScopedJoinHandle<'scope, ()>>
where
    C: MapReduceClient + 'scope,
{
    let mut handles = Vec::with_capacity(workers);
    for worker in 0..workers {
        let spawned = thread::Builder::new()
            .name(format!("mr-worker-{worker}"))
            .spawn_scoped(scope, move || worker_main(worker, ctx));
        match spawned {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                ctx.fail(Error::Resource(err));
                break;
            }
        }
    }
    handles
}

/// Thread entry point. Any error or panic is recorded in the run context,
/// which also releases every other worker.
fn worker_main<C: MapReduceClient>(worker: usize, ctx: &RunContext<'_, C>) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| run_phases(worker, ctx)));
    match outcome {
        Ok(Ok(_)) => {}
        Ok(Err(err)) => ctx.fail(err),
        Err(payload) => ctx.fail(Error::WorkerPanicked(panic_message(payload.as_ref()))),
    }
}

/// Returns whether this worker was the shuffle coordinator.
fn run_phases<C: MapReduceClient>(worker: usize, ctx: &RunContext<'_, C>) -> Result<bool> {
    ctx.start.wait()?;

    let buffer = mapper::map_and_sort(worker, ctx.client, ctx.input, &ctx.distributor)?;
    ctx.deposit(worker, buffer)?;

    ctx.barrier.wait()?;
    trace!(worker, "passed barrier");

    let coordinator = ctx.elect_coordinator();
    if coordinator {
        debug!(worker, "elected shuffle coordinator");
        let buffers = ctx.take_buffers()?;
        let published = shuffle(buffers, &ctx.channel, || ctx.is_failed())?;
        debug!(worker, groups = published, "shuffle done");
    }

    reducer::reduce_until_done(worker, ctx.client, &ctx.channel, &ctx.sink)?;
    Ok(coordinator)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
