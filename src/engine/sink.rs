use std::sync::Mutex;

use super::error::{Error, Result};

/// Append-only destination for reduce output, shared by all reducers.
///
/// Each append is atomic with respect to other appends. The final order of
/// pairs depends on thread scheduling and carries no meaning.
#[derive(Debug)]
pub struct OutputSink<K, V> {
    pairs: Mutex<Vec<(K, V)>>,
}

impl<K, V> Default for OutputSink<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OutputSink<K, V> {
    pub fn new() -> Self {
        Self {
            pairs: Mutex::new(Vec::new()),
        }
    }

    pub fn append(&self, key: K, value: V) -> Result<()> {
        self.pairs
            .lock()
            .map_err(|_| Error::poisoned("output sink"))?
            .push((key, value));
        Ok(())
    }

    pub fn into_inner(self) -> Result<Vec<(K, V)>> {
        self.pairs
            .into_inner()
            .map_err(|_| Error::poisoned("output sink"))
    }
}

/// The `emit3` handle passed to [`MapReduceClient::reduce`].
///
/// Safe to use from any number of reducers at once.
///
/// [`MapReduceClient::reduce`]: super::MapReduceClient::reduce
#[derive(Debug)]
pub struct ReduceEmitter<'a, K, V> {
    sink: &'a OutputSink<K, V>,
}

impl<'a, K, V> ReduceEmitter<'a, K, V> {
    pub(crate) fn new(sink: &'a OutputSink<K, V>) -> Self {
        Self { sink }
    }

    /// Append one output pair to the run's result.
    #[inline]
    pub fn emit(&self, key: K, value: V) -> Result<()> {
        self.sink.append(key, value)
    }
}
