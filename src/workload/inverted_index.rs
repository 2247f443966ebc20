//! Inverted index: for every word, the sorted list of documents containing it.

use std::collections::BTreeSet;

use crate::utils::{string_from_bytes, words};
use crate::*;
use anyhow::Result;
use bytes::Bytes;
use itertools::Itertools;

pub fn map(kv: KeyValue, _aux: Bytes) -> MapOutput {
    let text = string_from_bytes(&kv.value)?;
    let document = kv.key();
    let pairs = words(&text)
        .unique()
        .map(|word| KeyValue::new(Bytes::from(word), document.clone()))
        .collect::<Vec<_>>();
    Ok(Box::new(pairs.into_iter().map(Ok)))
}

pub fn reduce(
    key: Bytes,
    values: Box<dyn Iterator<Item = Bytes> + '_>,
    _aux: Bytes,
) -> Result<Bytes> {
    let word = string_from_bytes(&key)?;
    let documents = values
        .map(|doc| string_from_bytes(&doc))
        .collect::<Result<BTreeSet<String>>>()?;
    Ok(Bytes::from(format!("{} {}\n", word, documents.iter().join(","))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_emits_each_word_once_per_document() {
        let kv = KeyValue::new(Bytes::from("d1"), Bytes::from("rose is a rose"));
        let pairs: Vec<KeyValue> = map(kv, Bytes::new())
            .unwrap()
            .map(|item| item.unwrap())
            .collect();

        let words: Vec<&[u8]> = pairs.iter().map(|kv| kv.key.as_ref()).collect();
        assert_eq!(words, vec![&b"rose"[..], b"is", b"a"]);
        assert!(pairs.iter().all(|kv| kv.value == "d1"));
    }

    #[test]
    fn reduce_lists_sorted_unique_documents() {
        let docs = ["b.txt", "a.txt", "b.txt"].map(Bytes::from);
        let out = reduce(Bytes::from("rose"), Box::new(docs.into_iter()), Bytes::new()).unwrap();
        assert_eq!(out, Bytes::from("rose a.txt,b.txt\n"));
    }
}
