//! Converts MapReduce application names to actual application code, and
//! adapts those applications to the [`engine`](crate::engine).
//!
//! # Example
//!
//! ```
//! # use anyhow::Result;
//! use bytes::Bytes;
//! use mrthreads::{engine, workload};
//!
//! # fn main() -> Result<()> {
//! let wc = workload::WorkloadClient::new(workload::named("wc")?, Bytes::new());
//! let input = vec![(Bytes::from("doc"), Bytes::from("to be or not to be"))];
//! let output = engine::run(&wc, &input, 2)?;
//! assert_eq!(output.len(), 4);
//! # Ok(())
//! # }
//! ```

use anyhow::{bail, Result};
use bytes::Bytes;

use crate::engine::{IntermediateGroup, MapEmitter, MapReduceClient, ReduceEmitter};
use crate::{KeyValue, Workload};

pub mod grep;
pub mod inverted_index;
pub mod wc;

/// Gets the [`Workload`] named `name`.
///
/// Returns [`None`] if no application with the given name was found.
pub fn try_named(name: &str) -> Option<Workload> {
    match name {
        "wc" => Some(Workload {
            map_fn: wc::map,
            reduce_fn: wc::reduce,
        }),
        "grep" => Some(Workload {
            map_fn: grep::map,
            reduce_fn: grep::reduce,
        }),
        "inverted-index" => Some(Workload {
            map_fn: inverted_index::map,
            reduce_fn: inverted_index::reduce,
        }),
        _ => None,
    }
}

/// Gets the [`Workload`] named `name`.
///
/// Returns an [`anyhow::Error`] if no application with the given name was found.
pub fn named(name: &str) -> Result<Workload> {
    match try_named(name) {
        Some(app) => Ok(app),
        None => bail!("No app named `{}` found.", name),
    }
}

/// Runs a byte-oriented [`Workload`] on the engine.
///
/// Every key and value is [`Bytes`]. The reduce output for a key is emitted
/// as `(key, output)`.
#[derive(Clone)]
pub struct WorkloadClient {
    workload: Workload,
    aux: Bytes,
}

impl WorkloadClient {
    /// `aux` is passed untouched to every map and reduce call.
    pub fn new(workload: Workload, aux: Bytes) -> Self {
        Self { workload, aux }
    }
}

impl MapReduceClient for WorkloadClient {
    type K1 = Bytes;
    type V1 = Bytes;
    type K2 = Bytes;
    type V2 = Bytes;
    type K3 = Bytes;
    type V3 = Bytes;

    fn map(
        &self,
        key: &Bytes,
        value: &Bytes,
        emit: &mut MapEmitter<'_, Bytes, Bytes>,
    ) -> Result<()> {
        let input = KeyValue::new(key.clone(), value.clone());
        for item in (self.workload.map_fn)(input, self.aux.clone())? {
            let (key, value) = item?.into_parts();
            emit.emit(key, value);
        }
        Ok(())
    }

    fn reduce(
        &self,
        group: IntermediateGroup<Bytes, Bytes>,
        emit: &ReduceEmitter<'_, Bytes, Bytes>,
    ) -> Result<()> {
        let Some(key) = group.first().map(|(key, _)| key.clone()) else {
            return Ok(());
        };
        let values = group.into_iter().map(|(_, value)| value);
        let output = (self.workload.reduce_fn)(key.clone(), Box::new(values), self.aux.clone())?;
        emit.emit(key, output)?;
        Ok(())
    }
}
