//! Model snapshots and their binary blob format.
//!
//! A model blob is laid out as
//!
//! ```text
//! magic     4 bytes   "SVBM"
//! version   u8        FORMAT_VERSION
//! checksum  u32 LE    crc32 of payload
//! payload             zlib(bincode(ModelSnapshot))
//! ```
//!
//! Blobs are stored under `<name>.model`; the extension is the model's
//! declared format tag and is checked before any bytes are read.

use std::io::{Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SieveError};

/// File extension every model blob carries.
pub const MODEL_EXTENSION: &str = "model";

/// Leading bytes of every model blob.
pub const MODEL_MAGIC: &[u8; 4] = b"SVBM";

/// Current blob format version.
pub const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = MODEL_MAGIC.len() + 1 + 4;

/// Upper bound on the decompressed payload and on the decoded snapshot.
const DECODE_LIMIT: usize = 1 << 30;

/// The four frequency tables bundled as one serializable record.
///
/// This is a pure projection of a classifier's state: it carries no scoring
/// configuration and no history, only final counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// label -> total tokens trained under the label
    pub labels: IndexMap<String, u64>,
    /// label -> number of training documents
    pub docs: IndexMap<String, u64>,
    /// token -> occurrences across all labels
    pub tokens: IndexMap<String, u64>,
    /// label -> token -> occurrences under the label
    pub data: IndexMap<String, IndexMap<String, u64>>,
}

impl ModelSnapshot {
    /// Check that the tables describe one consistent training history.
    ///
    /// `labels`, `docs` and `data` must be keyed by the same labels, a
    /// label's total must equal the sum of its per-token counts, every
    /// token's global count must equal the sum of its per-label counts, and
    /// no sum may overflow.
    pub fn validate(&self) -> Result<()> {
        let same_keys = |other_len: usize, contains: &dyn Fn(&str) -> bool| {
            other_len == self.docs.len() && self.docs.keys().all(|label| contains(label))
        };

        if !same_keys(self.labels.len(), &|label| self.labels.contains_key(label)) {
            return Err(SieveError::invalid_model(
                "label totals and document counts name different labels",
            ));
        }
        if !same_keys(self.data.len(), &|label| self.data.contains_key(label)) {
            return Err(SieveError::invalid_model(
                "per-label token counts and document counts name different labels",
            ));
        }

        checked_sum(self.docs.values().copied())
            .ok_or_else(|| SieveError::invalid_model("document counts overflow"))?;

        let mut token_sums: IndexMap<&str, u64> = IndexMap::with_capacity(self.tokens.len());
        for (label, tokens) in &self.data {
            for (token, count) in tokens {
                let global = self.tokens.get(token).copied().unwrap_or(0);
                if *count > global {
                    return Err(SieveError::invalid_model(format!(
                        "token {token:?} occurs {count} times under {label:?} but {global} times overall"
                    )));
                }
                let sum = token_sums.entry(token.as_str()).or_insert(0);
                *sum = sum.checked_add(*count).ok_or_else(|| {
                    SieveError::invalid_model(format!("counts of token {token:?} overflow"))
                })?;
            }

            let label_sum = checked_sum(tokens.values().copied()).ok_or_else(|| {
                SieveError::invalid_model(format!("token counts of {label:?} overflow"))
            })?;
            if self.labels.get(label).copied() != Some(label_sum) {
                return Err(SieveError::invalid_model(format!(
                    "token total of {label:?} does not match its token counts"
                )));
            }
        }

        for (token, global) in &self.tokens {
            let sum = token_sums.get(token.as_str()).copied().unwrap_or(0);
            if sum != *global {
                return Err(SieveError::invalid_model(format!(
                    "global count of token {token:?} is {global} but its label counts sum to {sum}"
                )));
            }
        }

        Ok(())
    }

    /// Serialize, compress and frame the snapshot.
    pub fn encode(&self, compression_level: u32) -> Result<Vec<u8>> {
        let payload = bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| SieveError::serialization(format!("Failed to serialize model: {e}")))?;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(compression_level));
        encoder.write_all(&payload)?;
        let compressed = encoder.finish()?;

        let mut blob = Vec::with_capacity(HEADER_LEN + compressed.len());
        blob.extend_from_slice(MODEL_MAGIC);
        blob.push(FORMAT_VERSION);
        blob.extend_from_slice(&crc32fast::hash(&compressed).to_le_bytes());
        blob.extend_from_slice(&compressed);
        Ok(blob)
    }

    /// Parse a blob produced by [`encode`](Self::encode).
    ///
    /// Every failure is reported as [`SieveError::InvalidModel`].
    pub fn decode(blob: &[u8]) -> Result<Self> {
        if blob.len() < HEADER_LEN {
            return Err(SieveError::invalid_model(format!(
                "model is truncated ({} bytes)",
                blob.len()
            )));
        }

        let (header, compressed) = blob.split_at(HEADER_LEN);
        if &header[..4] != MODEL_MAGIC {
            return Err(SieveError::invalid_model("missing model magic bytes"));
        }
        if header[4] != FORMAT_VERSION {
            return Err(SieveError::invalid_model(format!(
                "unsupported model format version {}",
                header[4]
            )));
        }

        let expected = u32::from_le_bytes([header[5], header[6], header[7], header[8]]);
        let actual = crc32fast::hash(compressed);
        if expected != actual {
            return Err(SieveError::invalid_model(format!(
                "checksum mismatch (expected {expected:08x}, found {actual:08x})"
            )));
        }

        let payload = inflate(compressed, DECODE_LIMIT)?;

        let config = bincode::config::standard().with_limit::<DECODE_LIMIT>();
        let (snapshot, read): (ModelSnapshot, usize) =
            bincode::serde::decode_from_slice(&payload, config).map_err(|e| {
                SieveError::invalid_model(format!("failed to deserialize model: {e}"))
            })?;

        if read != payload.len() {
            return Err(SieveError::invalid_model(format!(
                "{} trailing bytes after model tables",
                payload.len() - read
            )));
        }

        snapshot.validate()?;
        Ok(snapshot)
    }
}

/// Decompress at most `limit` bytes, failing instead of inflating further.
fn inflate(compressed: &[u8], limit: usize) -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    ZlibDecoder::new(compressed)
        .take(limit as u64 + 1)
        .read_to_end(&mut payload)
        .map_err(|e| SieveError::invalid_model(format!("failed to decompress model: {e}")))?;

    if payload.len() > limit {
        return Err(SieveError::invalid_model(format!(
            "decompressed model exceeds {limit} bytes"
        )));
    }
    Ok(payload)
}

fn checked_sum(values: impl IntoIterator<Item = u64>) -> Option<u64> {
    values
        .into_iter()
        .try_fold(0u64, |total, value| total.checked_add(value))
}

/// Build the blob file name for a model name.
///
/// Names must be non-empty plain file names: no path separators and not `.`
/// or `..`.
pub fn model_file_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\'])
    {
        return Err(SieveError::invalid_argument(format!(
            "invalid model name: {name:?}"
        )));
    }
    Ok(format!("{trimmed}.{MODEL_EXTENSION}"))
}

/// Reject file names that do not carry the model extension.
pub fn check_model_extension(file_name: &str) -> Result<()> {
    match Path::new(file_name).extension().and_then(|ext| ext.to_str()) {
        Some(MODEL_EXTENSION) => Ok(()),
        _ => Err(SieveError::invalid_model(format!(
            "{file_name} does not have the .{MODEL_EXTENSION} extension"
        ))),
    }
}
