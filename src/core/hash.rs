//! Content-addressed message identifiers.
//!
//! An ID is the hex SHA-256 of the message text (salted with its translation
//! context, if any), truncated to the configured length. Because the ID is a
//! pure function of content, shipped catalogs keep working across rebuilds
//! as long as the text and its context are unchanged.
//!
//! Truncation can collide. The first pair to claim an ID keeps it; a later,
//! different pair re-hashes `text + ":" + candidate` with two more hex digits
//! until a free ID turns up. The reverse table guarantees that a pair seen
//! before in the same pass gets its earlier ID back.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::error::TransformError;

pub const MIN_HASH_LENGTH: usize = 4;
pub const DEFAULT_HASH_LENGTH: usize = 10;
pub const MAX_HASH_LENGTH: usize = 40;

/// Retries allowed once the collision chain has reached [`MAX_HASH_LENGTH`].
const MAX_ATTEMPTS_AT_CAP: usize = 16;

/// A `(text, context)` pair. An empty context is normalized to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageKey {
    pub text: Arc<str>,
    pub context: Option<String>,
}

impl MessageKey {
    pub fn new(text: Arc<str>, context: Option<&str>) -> Self {
        Self {
            text,
            context: context.filter(|c| !c.is_empty()).map(str::to_string),
        }
    }

    /// Input fed to the hash for the first candidate.
    fn hash_input(&self) -> String {
        match &self.context {
            Some(context) => format!("{}::{}", self.text, context),
            None => self.text.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct IdTables {
    by_id: HashMap<String, MessageKey>,
    by_key: HashMap<MessageKey, String>,
}

/// Build-scoped ID allocator. Cleared together with the store at the start
/// of every pass.
#[derive(Debug, Default)]
pub struct HashIdentifier {
    tables: Mutex<IdTables>,
}

impl HashIdentifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the ID for `key`, allocating one if this pass has not seen it.
    ///
    /// The tables stay locked for the whole lookup and retry chain, so
    /// concurrent callers never hand out one ID to two pairs.
    pub fn assign(&self, key: &MessageKey, length: usize) -> Result<String, TransformError> {
        let length = length.clamp(MIN_HASH_LENGTH, MAX_HASH_LENGTH);
        let mut tables = self.tables.lock();

        if let Some(id) = tables.by_key.get(key) {
            return Ok(id.clone());
        }

        let mut current_length = length;
        let mut candidate = truncated_hash(&key.hash_input(), current_length);
        let mut attempts_at_cap = 0;

        while tables
            .by_id
            .get(&candidate)
            .is_some_and(|owner| owner != key)
        {
            if current_length == MAX_HASH_LENGTH {
                attempts_at_cap += 1;
                if attempts_at_cap > MAX_ATTEMPTS_AT_CAP {
                    return Err(TransformError::IdSpaceExhausted {
                        text: key.text.to_string(),
                    });
                }
            }
            current_length = (current_length + 2).min(MAX_HASH_LENGTH);
            let next = rehash(key, &candidate, current_length);
            tracing::debug!(
                text = %key.text,
                taken = %candidate,
                next = %next,
                "message id collision, re-hashing"
            );
            candidate = next;
        }

        tables.by_id.insert(candidate.clone(), key.clone());
        tables.by_key.insert(key.clone(), candidate.clone());
        Ok(candidate)
    }

    /// Number of IDs handed out in the current pass.
    pub fn len(&self) -> usize {
        self.tables.lock().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut tables = self.tables.lock();
        tables.by_id.clear();
        tables.by_key.clear();
    }

    /// Hand the first `count` ids of `key`'s collision chain to other texts.
    #[cfg(test)]
    pub(crate) fn occupy_chain(&self, key: &MessageKey, length: usize, count: usize) {
        let mut tables = self.tables.lock();
        let mut current_length = length.clamp(MIN_HASH_LENGTH, MAX_HASH_LENGTH);
        let mut candidate = truncated_hash(&key.hash_input(), current_length);
        for i in 0..count {
            let owner = MessageKey::new(Arc::from(format!("{} (occupant {})", key.text, i)), None);
            tables.by_id.insert(candidate.clone(), owner);
            current_length = (current_length + 2).min(MAX_HASH_LENGTH);
            candidate = rehash(key, &candidate, current_length);
        }
    }
}

/// Next id in the collision chain after `taken`.
fn rehash(key: &MessageKey, taken: &str, length: usize) -> String {
    truncated_hash(&format!("{}:{}", key.text, taken), length)
}

/// First `length` lowercase hex digits of SHA-256(`input`).
pub fn truncated_hash(input: &str, length: usize) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = hex_encode(&digest);
    hex.truncate(length.min(hex.len()));
    hex
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
