//! A MapReduce-compatible implementation of `grep`.
//!
//! Intermediate pairs are keyed by file name; each value is the matching
//! line number (big-endian `u64`) followed by the line itself.

use crate::utils::{aux_args, string_from_bytes};
use crate::*;
use anyhow::Result;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug, Serialize, Deserialize)]
#[clap(no_binary_name = true)]
struct Args {
    #[clap(short, long, value_parser)]
    term: String,
}

pub fn map(kv: KeyValue, aux: Bytes) -> MapOutput {
    let Args { term } = Args::try_parse_from(aux_args(&aux)?)?;
    let text = string_from_bytes(&kv.value)?;

    let mut matches = Vec::new();
    for (i, line) in text.lines().enumerate().filter(|(_, line)| line.contains(&term)) {
        let mut value = BytesMut::with_capacity(8 + line.len());
        value.put_u64(i as u64 + 1);
        value.put(line.as_bytes());
        matches.push(KeyValue::new(kv.key(), value.freeze()));
    }
    Ok(Box::new(matches.into_iter().map(Ok)))
}

pub fn reduce(
    key: Bytes,
    values: Box<dyn Iterator<Item = Bytes> + '_>,
    _aux: Bytes,
) -> Result<Bytes> {
    let filename = string_from_bytes(&key)?;
    let mut hits = values
        .map(|mut value| -> Result<(u64, String)> {
            let line_no = value.get_u64();
            Ok((line_no, string_from_bytes(&value)?))
        })
        .collect::<Result<Vec<(u64, String)>>>()?;
    hits.sort_unstable_by_key(|(line_no, _)| *line_no);

    let mut writer = BytesMut::new();
    for (line_no, line) in hits {
        writer.put(format!("{}:{}:: {}\n", filename, line_no, line).as_bytes());
    }
    Ok(writer.freeze())
}
