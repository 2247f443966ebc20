//! A single-process MapReduce (lite) engine.
//!
//! Users supply a map and a reduce function; the [`engine`] runs them on a
//! fixed pool of threads that share one address space. Intermediate data
//! never leaves memory: each thread sorts its own map output, one elected
//! thread merges everything by key, and all threads reduce the merged groups
//! concurrently.
//!
//! Besides the generic engine, the crate ships a few byte-oriented
//! applications ([`workload`]) and a standalone runner for them.

use bytes::Bytes;

pub mod engine;
pub mod standalone;
pub mod utils;
pub mod workload;

/////////////////////////////////////////////////////////////////////////////
// MapReduce application types
/////////////////////////////////////////////////////////////////////////////

/// The output of an application map function.
///
/// There are 2 layers of [`anyhow::Result`]s here. The outer layer
/// accounts for errors that arise while creating the iterator.
/// The inner layer accounts for errors that occur during iteration.
pub type MapOutput = anyhow::Result<Box<dyn Iterator<Item = anyhow::Result<KeyValue>>>>;

/// A map function takes a key-value pair and auxiliary arguments.
///
/// It returns an iterator that yields new key-value pairs.
pub type MapFn = fn(kv: KeyValue, aux: Bytes) -> MapOutput;

/// A reduce function takes in a key, an iterator over values for that key,
/// and an auxiliary argument. It returns an [`anyhow::Result`]
/// containing a single output value.
pub type ReduceFn = fn(
    key: Bytes,
    values: Box<dyn Iterator<Item = Bytes> + '_>,
    aux: Bytes,
) -> anyhow::Result<Bytes>;

/// A byte-oriented map reduce application.
///
/// Wrap it in a [`workload::WorkloadClient`] to run it on the [`engine`].
#[derive(Copy, Clone)]
pub struct Workload {
    pub map_fn: MapFn,
    pub reduce_fn: ReduceFn,
}

/////////////////////////////////////////////////////////////////////////////
// Key-value pairs
/////////////////////////////////////////////////////////////////////////////

/// A single key-value pair.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct KeyValue {
    /// The key.
    pub key: Bytes,
    /// The value.
    pub value: Bytes,
}

impl KeyValue {
    /// Construct a new key-value pair from the given key and value.
    pub fn new(key: Bytes, value: Bytes) -> Self {
        Self { key, value }
    }

    /// Get the key of this key-value pair.
    ///
    /// This method is cheap, since [`Bytes`] are cheaply cloneable.
    #[inline]
    pub fn key(&self) -> Bytes {
        self.key.clone()
    }

    /// Get the value of this key-value pair.
    #[inline]
    pub fn value(&self) -> Bytes {
        self.value.clone()
    }

    /// Splits the pair into its key and value.
    #[inline]
    pub fn into_parts(self) -> (Bytes, Bytes) {
        (self.key, self.value)
    }
}
