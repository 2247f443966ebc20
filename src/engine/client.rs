use super::mapper::MapEmitter;
use super::sink::ReduceEmitter;

/// All intermediate pairs that share one key, handed to a single `reduce` call.
///
/// Every pair in a group compares `Equal` to every other; no key appears in
/// more than one group of a run.
pub type IntermediateGroup<K, V> = Vec<(K, V)>;

/// A map reduce application.
///
/// `map` is called once per input pair, `reduce` once per distinct
/// intermediate key. Both run on arbitrary worker threads, in no particular
/// order relative to each other, so the client must be `Sync`.
///
/// Returning an error from either callback terminates the whole run; the
/// engine does not retry. The same goes for panics.
pub trait MapReduceClient: Sync {
    type K1: Sync;
    type V1: Sync;
    /// Intermediate key. Its [`Ord`] implementation is used both to sort a
    /// worker's output and to decide which pairs belong to the same group.
    type K2: Ord + Send;
    type V2: Send;
    type K3: Send;
    type V3: Send;

    fn map(
        &self,
        key: &Self::K1,
        value: &Self::V1,
        emit: &mut MapEmitter<'_, Self::K2, Self::V2>,
    ) -> anyhow::Result<()>;

    fn reduce(
        &self,
        group: IntermediateGroup<Self::K2, Self::V2>,
        emit: &ReduceEmitter<'_, Self::K3, Self::V3>,
    ) -> anyhow::Result<()>;
}
