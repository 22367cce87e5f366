//! Build-scoped extraction registry.
//!
//! The store is the single sink every emitter reads. Its lifecycle is driven
//! from outside:
//!
//! 1. the orchestrator calls [`ExtractionStore::clear`] at the start of a pass;
//! 2. `transform` calls [`ExtractionStore::add`] for every matched message,
//!    possibly from several worker threads;
//! 3. once all writers are done, emitters take [`ExtractionStore::all`].
//!
//! The core never clears the store on its own.

use std::{collections::BTreeMap, sync::Arc};

use parking_lot::Mutex;

use crate::core::{
    data::SourceMessage,
    hash::{HashIdentifier, MessageKey},
    intern::{PoolStats, StringPool},
};
use crate::error::TransformError;

#[derive(Debug, Default)]
pub struct ExtractionStore {
    messages: Mutex<BTreeMap<String, SourceMessage>>,
    identifier: HashIdentifier,
    pool: StringPool,
}

impl ExtractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message. An existing record with the same id absorbs the new
    /// record's locations and comments.
    pub fn add(&self, entry: SourceMessage) {
        let mut messages = self.messages.lock();
        match messages.get_mut(&entry.id) {
            Some(existing) => existing.merge(entry),
            None => {
                messages.insert(entry.id.clone(), entry);
            }
        }
    }

    /// Snapshot of every message, ordered by id.
    pub fn all(&self) -> Vec<SourceMessage> {
        self.messages.lock().values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<SourceMessage> {
        self.messages.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every message and forget every allocated id.
    ///
    /// Interned strings survive; the pool lives as long as the store.
    pub fn clear(&self) {
        self.messages.lock().clear();
        self.identifier.clear();
    }

    pub fn intern(&self, text: &str) -> Arc<str> {
        self.pool.intern(text)
    }

    /// Allocate (or look up) the id of a `(text, context)` pair for this pass.
    pub fn assign_id(
        &self,
        text: Arc<str>,
        context: Option<&str>,
        hash_length: usize,
    ) -> Result<String, TransformError> {
        self.identifier
            .assign(&MessageKey::new(text, context), hash_length)
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Make every id `text` could get within `count` collision steps taken.
    #[cfg(test)]
    pub(crate) fn occupy_id_chain(&self, text: &str, hash_length: usize, count: usize) {
        let key = MessageKey::new(self.intern(text), None);
        self.identifier.occupy_chain(&key, hash_length, count);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;
    use rayon::prelude::*;

    use super::*;
    use crate::core::data::SourceLocation;

    fn entry(store: &ExtractionStore, text: &str, file: &str, line: usize) -> SourceMessage {
        let source_text = store.intern(text);
        let id = store.assign_id(Arc::clone(&source_text), None, 10).unwrap();
        SourceMessage {
            id,
            source_text,
            translation_context: None,
            parameter_names: Vec::new(),
            referencing_locations: BTreeSet::from([SourceLocation::new(file, line, 1)]),
            extracted_comments: BTreeSet::new(),
        }
    }

    #[test]
    fn test_add_merges_same_id() {
        let store = ExtractionStore::new();
        store.add(entry(&store, "Save", "a.ts", 1));
        store.add(entry(&store, "Save", "b.ts", 4));

        let all = store.all();
        assert_eq!(all.len(), 1);
        assert_eq!(
            all[0].referencing_locations,
            BTreeSet::from([
                SourceLocation::new("a.ts", 1, 1),
                SourceLocation::new("b.ts", 4, 1),
            ])
        );
    }

    #[test]
    fn test_all_is_sorted_by_id() {
        let store = ExtractionStore::new();
        for text in ["Save", "Cancel", "Open", "Close"] {
            store.add(entry(&store, text, "a.ts", 1));
        }

        let ids: Vec<String> = store.all().into_iter().map(|m| m.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_clear_resets_messages_and_ids() {
        let store = ExtractionStore::new();
        store.add(entry(&store, "Save", "a.ts", 1));
        store.clear();

        assert!(store.is_empty());
        assert!(store.get("1509f561f2").is_none());
        // The pool keeps its strings across passes.
        assert_eq!(store.pool_stats().unique_strings, 1);
    }

    #[test]
    fn test_concurrent_adds_keep_one_id_per_text() {
        let store = ExtractionStore::new();
        (0..64).into_par_iter().for_each(|i| {
            let text = if i % 2 == 0 { "Save" } else { "Cancel" };
            store.add(entry(&store, text, &format!("file{i}.ts"), 1));
        });

        let all = store.all();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|m| m.referencing_locations.len() == 32));
    }
}
