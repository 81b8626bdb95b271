//! Like ledger: the set of meme ids the local user has liked.
//!
//! Presence in the set is the only signal; there is no count and no
//! timestamp. Likes are client-side only and never reconciled with a server.

use crate::domain::KeyValueStore;
use crate::store::{self, LIKES_KEY};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct LikeLedger {
    store: Arc<dyn KeyValueStore>,
    // Serializes the toggle's read-modify-write within this process. Two
    // processes sharing a file store can still lose an update, the same way
    // two browser tabs sharing one local store can.
    toggle_lock: Arc<Mutex<()>>,
}

impl LikeLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            toggle_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Flips membership of `meme_id` in the liked set and persists the whole
    /// set. Returns the new state: `true` when the meme is now liked.
    /// A store that is absent or fails the write degrades to the persisted
    /// state, so the result never reports a like that was not stored.
    pub fn toggle(&self, meme_id: &str) -> bool {
        if !self.store.available() {
            return false;
        }
        let _guard = self.toggle_lock.lock();
        let mut likes: Vec<String> = store::read_json(self.store.as_ref(), LIKES_KEY, Vec::new());
        let previously_liked = match likes.iter().position(|id| id == meme_id) {
            Some(index) => {
                likes.remove(index);
                true
            }
            None => {
                likes.push(meme_id.to_string());
                false
            }
        };
        if !store::write_json(self.store.as_ref(), LIKES_KEY, &likes) {
            return previously_liked;
        }
        let now_liked = !previously_liked;
        debug!(meme_id, now_liked, "Toggled like");
        now_liked
    }

    /// Pure membership query, no side effect. Store failure reads as `false`.
    pub fn is_liked(&self, meme_id: &str) -> bool {
        let likes: Vec<String> = store::read_json(self.store.as_ref(), LIKES_KEY, Vec::new());
        likes.iter().any(|id| id == meme_id)
    }

    /// All liked ids, in the order the likes were given.
    pub fn liked_ids(&self) -> Vec<String> {
        store::read_json(self.store.as_ref(), LIKES_KEY, Vec::new())
    }

    /// Local like count for one meme: 1 when liked, 0 otherwise. Used by the
    /// leaderboard, which counts the local user's likes only.
    pub fn count_for(&self, meme_id: &str) -> u32 {
        self.is_liked(meme_id) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::store::{MemoryStore, NullStore, write_json};

    /// Reads pass through; every write fails, like a file store on a full
    /// or read-only disk.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
    }

    fn ledger() -> LikeLedger {
        LikeLedger::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn toggle_reports_new_state() {
        let likes = ledger();
        assert!(likes.toggle("181913649_0"));
        assert!(likes.is_liked("181913649_0"));
        assert!(!likes.toggle("181913649_0"));
        assert!(!likes.is_liked("181913649_0"));
    }

    #[test]
    fn toggle_pair_restores_prior_state() {
        let likes = ledger();
        for seed_liked in [false, true] {
            if seed_liked {
                likes.toggle("m");
            }
            let before = likes.is_liked("m");
            likes.toggle("m");
            likes.toggle("m");
            assert_eq!(likes.is_liked("m"), before);
            if seed_liked {
                likes.toggle("m"); // reset for next round
            }
        }
    }

    #[test]
    fn likes_are_independent_per_id() {
        let likes = ledger();
        likes.toggle("a");
        likes.toggle("b");
        likes.toggle("a");
        assert!(!likes.is_liked("a"));
        assert!(likes.is_liked("b"));
        assert_eq!(likes.liked_ids(), vec!["b".to_string()]);
    }

    #[test]
    fn failed_write_reports_the_persisted_state() {
        let likes = LikeLedger::new(Arc::new(ReadOnlyStore(MemoryStore::new())));
        assert!(!likes.toggle("m"));
        assert!(!likes.is_liked("m"));

        // Same symmetry when the like was already persisted: a failed unlike
        // still reads as liked.
        let seeded = MemoryStore::new();
        write_json(&seeded, LIKES_KEY, &vec!["m".to_string()]);
        let likes = LikeLedger::new(Arc::new(ReadOnlyStore(seeded)));
        assert!(likes.toggle("m"));
        assert!(likes.is_liked("m"));
    }

    #[test]
    fn unavailable_store_degrades_to_unliked() {
        let likes = LikeLedger::new(Arc::new(NullStore));
        assert!(!likes.toggle("m"));
        assert!(!likes.is_liked("m"));
        assert_eq!(likes.count_for("m"), 0);
    }
}
