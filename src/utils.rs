//! Small helpers shared by the built-in workloads.

use anyhow::Result;
use bytes::Bytes;

/// Read an entire [`Bytes`] slice into a [`String`].
///
/// Returns an error if the slice contains invalid UTF-8.
pub fn string_from_bytes(buf: &Bytes) -> Result<String> {
    Ok(String::from_utf8(buf.to_vec())?)
}

/// Split text into lowercase words, treating anything non-alphabetic as a separator.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// Parse the JSON-encoded auxiliary argument list handed to every workload.
///
/// An empty buffer means no arguments.
pub fn aux_args(aux: &Bytes) -> Result<Vec<String>> {
    if aux.is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(aux)?)
}
