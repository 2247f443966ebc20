use tracing::trace;

use super::client::MapReduceClient;
use super::distributor::WorkDistributor;
use super::error::{Error, Result};

/// The `emit2` handle passed to [`MapReduceClient::map`].
///
/// Writes straight into the calling worker's private buffer; no other
/// thread can see the buffer until the worker has finished mapping.
#[derive(Debug)]
pub struct MapEmitter<'a, K, V> {
    buffer: &'a mut Vec<(K, V)>,
}

impl<'a, K, V> MapEmitter<'a, K, V> {
    pub(crate) fn new(buffer: &'a mut Vec<(K, V)>) -> Self {
        Self { buffer }
    }

    /// Record one intermediate pair.
    #[inline]
    pub fn emit(&mut self, key: K, value: V) {
        self.buffer.push((key, value));
    }
}

/// Claim input items until the distributor runs dry, map each one, and sort
/// the resulting buffer ascending by intermediate key.
pub(crate) fn map_and_sort<C: MapReduceClient>(
    worker: usize,
    client: &C,
    input: &[(C::K1, C::V1)],
    distributor: &WorkDistributor,
) -> Result<Vec<(C::K2, C::V2)>> {
    let mut buffer = Vec::new();
    let mut mapped = 0usize;

    while let Some(index) = distributor.claim_next() {
        let (key, value) = &input[index];
        let mut emitter = MapEmitter::new(&mut buffer);
        client.map(key, value, &mut emitter).map_err(Error::Client)?;
        mapped += 1;
    }

    buffer.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    trace!(worker, mapped, emitted = buffer.len(), "map phase done");
    Ok(buffer)
}
