//! Transient cache of revealed plaintexts.
//!
//! Entries exist only while the session is unlocked and are wiped from
//! memory when removed or when the cache is cleared.

use std::collections::HashMap;

use zeroize::Zeroizing;

/// Credential id -> decrypted plaintext.
#[derive(Default)]
pub struct RevealCache {
    entries: HashMap<String, Zeroizing<String>>,
}

impl RevealCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(|s| s.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn insert(&mut self, id: &str, plaintext: Zeroizing<String>) {
        self.entries.insert(id.to_string(), plaintext);
    }

    /// Remove one entry. Returns `true` if it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Drop every entry whose id is not in `keep`.
    pub fn retain_ids<'a>(&mut self, keep: impl IntoIterator<Item = &'a str>) {
        let keep: std::collections::HashSet<&str> = keep.into_iter().collect();
        self.entries.retain(|id, _| keep.contains(id.as_str()));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for RevealCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_remove_clear() {
        let mut cache = RevealCache::new();
        cache.insert("1", Zeroizing::new("one".into()));
        cache.insert("2", Zeroizing::new("two".into()));
        assert_eq!(cache.get("1"), Some("one"));

        assert!(cache.remove("1"));
        assert!(!cache.remove("1"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn retain_ids_drops_vanished_records() {
        let mut cache = RevealCache::new();
        cache.insert("1", Zeroizing::new("one".into()));
        cache.insert("2", Zeroizing::new("two".into()));
        cache.retain_ids(["2", "3"]);
        assert!(!cache.contains("1"));
        assert!(cache.contains("2"));
    }

    #[test]
    fn debug_hides_plaintext() {
        let mut cache = RevealCache::new();
        cache.insert("1", Zeroizing::new("hunter2".into()));
        assert!(!format!("{cache:?}").contains("hunter2"));
    }
}
