use tracing::trace;

use super::channel::GroupChannel;
use super::client::{IntermediateGroup, MapReduceClient};
use super::error::{Error, Result};
use super::sink::{OutputSink, ReduceEmitter};

/// Consume published groups until the channel reports there is no more work.
///
/// Returns the number of groups this worker reduced.
pub(crate) fn reduce_until_done<C: MapReduceClient>(
    worker: usize,
    client: &C,
    channel: &GroupChannel<IntermediateGroup<C::K2, C::V2>>,
    sink: &OutputSink<C::K3, C::V3>,
) -> Result<usize> {
    let emitter = ReduceEmitter::new(sink);
    let mut reduced = 0usize;

    while let Some(group) = channel.recv()? {
        client.reduce(group, &emitter).map_err(client_error)?;
        reduced += 1;
    }

    trace!(worker, reduced, "reduce phase done");
    Ok(reduced)
}

/// Errors raised by `emit3` travel back through the client's `anyhow::Error`;
/// unwrap them so the caller sees the engine failure rather than a client one.
fn client_error(err: anyhow::Error) -> Error {
    match err.downcast::<Error>() {
        Ok(engine) => engine,
        Err(other) => Error::Client(other),
    }
}
