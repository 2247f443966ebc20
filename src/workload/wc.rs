//! A MapReduce-compatible implementation of word count.
//!

use crate::utils::{string_from_bytes, words};
use crate::*;
use anyhow::Result;
use bytes::{Buf, BufMut, Bytes, BytesMut};

pub fn map(kv: KeyValue, _aux: Bytes) -> MapOutput {
    let text = string_from_bytes(&kv.value)?;
    let words = words(&text).collect::<Vec<_>>();

    let iter = words.into_iter().map(|word| {
        let mut count = BytesMut::with_capacity(8);
        count.put_u64(1);
        Ok(KeyValue::new(Bytes::from(word), count.freeze()))
    });
    Ok(Box::new(iter))
}

pub fn reduce(
    key: Bytes,
    values: Box<dyn Iterator<Item = Bytes> + '_>,
    _aux: Bytes,
) -> Result<Bytes> {
    let count: u64 = values.map(|mut value| value.get_u64()).sum();
    let word = string_from_bytes(&key)?;
    Ok(Bytes::from(format!("{} {}\n", word, count)))
}
