//! Comment ledger: one append-only thread per meme, keyed by meme id.

use crate::domain::KeyValueStore;
use crate::models::{ANONYMOUS, Comment, Profile};
use crate::store::{self, PROFILE_KEY, comments_key};
use crate::uploads::unique_time_id;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct CommentLedger {
    store: Arc<dyn KeyValueStore>,
}

impl CommentLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Appends a comment to `meme_id`'s thread and returns the created
    /// record. Returns `None` without touching the store when the trimmed
    /// text is empty. The text itself is stored verbatim, untrimmed.
    pub fn add(&self, meme_id: &str, text: &str, author: Option<&str>) -> Option<Comment> {
        if text.trim().is_empty() {
            debug!(meme_id, "Rejected empty comment");
            return None;
        }

        let key = comments_key(meme_id);
        let mut thread: Vec<Comment> = store::read_json(self.store.as_ref(), &key, Vec::new());

        let comment = Comment {
            id: unique_time_id(|id| thread.iter().any(|c| c.id == id)),
            text: text.to_string(),
            author: author
                .map(str::to_string)
                .unwrap_or_else(|| self.profile_name()),
            created_at: Utc::now(),
        };
        thread.push(comment.clone());
        store::write_json(self.store.as_ref(), &key, &thread);
        debug!(meme_id, comment_id = %comment.id, "Comment added");
        Some(comment)
    }

    /// The thread for `meme_id`, oldest first. Empty when no one has
    /// commented yet.
    pub fn list_for(&self, meme_id: &str) -> Vec<Comment> {
        store::read_json(self.store.as_ref(), &comments_key(meme_id), Vec::new())
    }

    fn profile_name(&self) -> String {
        let profile: Profile =
            store::read_json(self.store.as_ref(), PROFILE_KEY, Profile::default());
        if profile.name.trim().is_empty() {
            ANONYMOUS.to_string()
        } else {
            profile.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn ledger() -> CommentLedger {
        CommentLedger::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn add_grows_thread_by_one_with_verbatim_text() {
        let comments = ledger();
        let before = comments.list_for("m1").len();
        let added = comments.add("m1", "  spaced   out  ", Some("alice")).unwrap();
        assert_eq!(added.text, "  spaced   out  ");
        assert_eq!(added.author, "alice");

        let thread = comments.list_for("m1");
        assert_eq!(thread.len(), before + 1);
        assert_eq!(thread.last().unwrap(), &added);
    }

    #[test]
    fn whitespace_only_text_is_rejected() {
        let comments = ledger();
        assert!(comments.add("m1", "   ", Some("alice")).is_none());
        assert!(comments.add("m1", "", None).is_none());
        assert!(comments.list_for("m1").is_empty());
    }

    #[test]
    fn threads_are_scoped_per_meme() {
        let comments = ledger();
        comments.add("m1", "on one", Some("a"));
        comments.add("m2", "on two", Some("b"));
        assert_eq!(comments.list_for("m1").len(), 1);
        assert_eq!(comments.list_for("m2").len(), 1);
        assert_eq!(comments.list_for("m3").len(), 0);
    }

    #[test]
    fn comment_ids_stay_unique_within_a_thread() {
        let comments = ledger();
        let ids: Vec<String> = (0..5)
            .map(|i| comments.add("m1", &format!("c{i}"), Some("a")).unwrap().id)
            .collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn missing_author_falls_back_to_profile_then_anonymous() {
        let store = Arc::new(MemoryStore::new());
        let comments = CommentLedger::new(store.clone());
        let anon = comments.add("m1", "hi", None).unwrap();
        assert_eq!(anon.author, "Anonymous User");

        let profile = Profile {
            name: "carol".into(),
            ..Profile::default()
        };
        store::write_json(store.as_ref(), PROFILE_KEY, &profile);
        let named = comments.add("m1", "hello again", None).unwrap();
        assert_eq!(named.author, "carol");
    }
}
