//! Emoji corpus loading.
//!
//! The corpus is an ordered JSON array of `EmojiRecord`s. Any load or parse
//! failure degrades to an empty corpus.

use std::path::Path;

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::interface::Emoji;
use crate::models::EmojiRecord;

/// Dataset compiled into the library
const BUNDLED_CORPUS_JSON: &str = include_str!("../data/emoji.json");

// Parsed once per process
static BUNDLED_CORPUS: Lazy<Vec<Emoji>> = Lazy::new(|| {
    parse_corpus(BUNDLED_CORPUS_JSON.as_bytes()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "bundled emoji corpus failed to parse");
        Vec::new()
    })
});

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CorpusResult<T> = Result<T, CorpusError>;

/// Decode a corpus, failing on the first malformed record
pub fn parse_corpus(bytes: &[u8]) -> CorpusResult<Vec<Emoji>> {
    let records: Vec<EmojiRecord> = serde_json::from_slice(bytes)?;
    Ok(records.into_iter().map(EmojiRecord::into_emoji).collect())
}

/// The bundled corpus in dataset order
pub fn bundled() -> Vec<Emoji> {
    BUNDLED_CORPUS.clone()
}

/// Corpus from raw JSON bytes, empty if they do not decode
pub fn from_json_bytes(bytes: &[u8]) -> Vec<Emoji> {
    parse_corpus(bytes).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "emoji corpus failed to parse");
        Vec::new()
    })
}

/// Corpus from a JSON file, empty if it cannot be read or decoded
pub fn from_path<P: AsRef<Path>>(path: P) -> Vec<Emoji> {
    let path = path.as_ref();
    let result = std::fs::read(path)
        .map_err(CorpusError::from)
        .and_then(|bytes| parse_corpus(&bytes));
    result.unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "emoji corpus failed to load");
        Vec::new()
    })
}
