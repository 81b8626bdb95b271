//! Upload ledger: the ordered list of memes the local user has created.
//!
//! Uploaded images are stored inline as base64 data URLs, never sent to any
//! backend. Records are appended, never removed.

use crate::domain::KeyValueStore;
use crate::models::{ANONYMOUS, Meme, Profile, UNTITLED};
use crate::store::{self, PROFILE_KEY, UPLOADS_KEY};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Input for [`UploadLedger::append`]. The image must already be an inline
/// data URL; callers holding raw bytes can build one with [`encode_data_url`].
#[derive(Debug, Clone)]
pub struct NewUpload {
    /// Caller-supplied id; a time-derived one is assigned when `None`.
    pub id: Option<String>,
    /// Inline-encoded image, e.g. `data:image/png;base64,...`.
    pub url: String,
    pub title: String,
    /// Defaults to the profile record's name when `None`.
    pub author: Option<String>,
}

#[derive(Clone)]
pub struct UploadLedger {
    store: Arc<dyn KeyValueStore>,
}

impl UploadLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Appends an upload and returns the stored record, including the final
    /// id. Empty titles become "Untitled Meme"; a missing author falls back
    /// to the profile record's name, then "Anonymous User".
    pub fn append(&self, upload: NewUpload) -> Meme {
        let mut memes: Vec<Meme> = store::read_json(self.store.as_ref(), UPLOADS_KEY, Vec::new());

        let id = upload
            .id
            .unwrap_or_else(|| unique_time_id(|id| memes.iter().any(|m| m.id == id)));
        let author = upload.author.unwrap_or_else(|| self.profile_name());
        let title = if upload.title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            upload.title
        };

        let meme = Meme {
            id,
            url: upload.url,
            title,
            likes: 0,
            created_at: Some(Utc::now()),
            author: Some(author),
            category: None,
        };
        memes.push(meme.clone());
        store::write_json(self.store.as_ref(), UPLOADS_KEY, &memes);
        info!(meme_id = %meme.id, "Upload appended");
        meme
    }

    /// Uploads in insertion order, oldest first. Read-only.
    pub fn list_all(&self) -> Vec<Meme> {
        store::read_json(self.store.as_ref(), UPLOADS_KEY, Vec::new())
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

/// Millisecond-clock id, bumped past any id the predicate reports as taken so
/// two appends within the same millisecond stay distinct.
pub(crate) fn unique_time_id(taken: impl Fn(&str) -> bool) -> String {
    let mut millis = Utc::now().timestamp_millis();
    loop {
        let id = millis.to_string();
        if !taken(&id) {
            return id;
        }
        millis += 1;
    }
}

/// Builds a `data:` URL from raw image bytes, sniffing the media type from
/// the filename extension.
pub fn encode_data_url(bytes: &[u8], filename: &str) -> String {
    let mime = mime_guess::from_path(filename).first_or_octet_stream();
    format!("data:{};base64,{}", mime.essence_str(), BASE64.encode(bytes))
}
