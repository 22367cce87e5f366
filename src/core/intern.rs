//! Content-addressed string interning for extracted message text.
//!
//! Large codebases repeat the same short strings ("Cancel", "Save", ...)
//! across hundreds of message functions. Interning keeps one allocation per
//! distinct text for the lifetime of the pool.

use std::{collections::HashSet, sync::Arc};

use parking_lot::Mutex;

/// Snapshot of pool occupancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of distinct strings held.
    pub unique_strings: usize,
    /// Sum of the character counts of all distinct strings.
    pub total_chars: usize,
}

/// Thread-safe string interner. Entries are never evicted.
#[derive(Debug, Default)]
pub struct StringPool {
    strings: Mutex<HashSet<Arc<str>>>,
}

impl StringPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a shared handle equal to `text`.
    ///
    /// Interning equal content twice yields the same backing allocation.
    pub fn intern(&self, text: &str) -> Arc<str> {
        let mut strings = self.strings.lock();
        if let Some(existing) = strings.get(text) {
            return Arc::clone(existing);
        }
        let interned: Arc<str> = Arc::from(text);
        strings.insert(Arc::clone(&interned));
        interned
    }

    pub fn stats(&self) -> PoolStats {
        let strings = self.strings.lock();
        PoolStats {
            unique_strings: strings.len(),
            total_chars: strings.iter().map(|s| s.chars().count()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_returns_equal_value() {
        let pool = StringPool::new();
        assert_eq!(&*pool.intern("Cancel"), "Cancel");
    }

    #[test]
    fn test_intern_shares_allocation() {
        let pool = StringPool::new();
        let a = pool.intern("Save");
        let b = pool.intern(&String::from("Save"));
        assert!(Arc::ptr_eq(&a, &b));

        let c = pool.intern("Save as");
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_stats_count_unique_strings_and_chars() {
        let pool = StringPool::new();
        pool.intern("Save");
        pool.intern("Save");
        pool.intern("Öffnen");

        assert_eq!(
            pool.stats(),
            PoolStats {
                unique_strings: 2,
                total_chars: 10,
            }
        );
    }

    #[test]
    fn test_empty_pool_stats() {
        assert_eq!(StringPool::new().stats(), PoolStats::default());
    }
}
