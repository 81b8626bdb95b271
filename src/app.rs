//! The consumer-facing surface of the data layer.
//!
//! `MemeVerse` wires the store, the ledgers, the catalog pipeline, and the
//! resolution service together; the presentation layer depends on this type
//! and nothing deeper.

use crate::catalog::{self, CatalogPipeline, Page};
use crate::comments::CommentLedger;
use crate::config::Config;
use crate::domain::{KeyValueStore, Randomness, TemplateSource, ThreadRandomness};
use crate::errors::FetchError;
use crate::likes::LikeLedger;
use crate::models::{Category, Comment, Meme, Profile, SortKey};
use crate::profile::ProfileStore;
use crate::resolve::Resolver;
use crate::store::{self, FileStore, NullStore};
use crate::templates::ImgflipSource;
use crate::uploads::{NewUpload, UploadLedger};
use std::sync::Arc;
use tracing::{info, warn};

/// Leaderboard length, as shown on the leaderboard view.
const LEADERBOARD_LIMIT: usize = 10;

/// Fixed caption pool for the simulated caption generator.
const CAPTIONS: [&str; 5] = [
    "When you try your best but don't succeed...",
    "Nobody: \nMe at 3 AM:",
    "That moment when...",
    "Why are you like this?",
    "Plot twist:",
];

/// A browse request: category plus the consumer-side stages.
#[derive(Debug, Clone)]
pub struct BrowseQuery {
    pub category: Category,
    /// Case-insensitive substring match on titles; empty means no filter.
    pub search: String,
    pub sort: SortKey,
    /// 1-based page.
    pub page: usize,
}

impl Default for BrowseQuery {
    fn default() -> Self {
        Self {
            category: Category::All,
            search: String::new(),
            sort: SortKey::Likes,
            page: 1,
        }
    }
}

/// Upload and like counts shown on the profile view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileStats {
    pub uploads: usize,
    pub likes_given: usize,
}

pub struct MemeVerse {
    likes: LikeLedger,
    uploads: UploadLedger,
    comments: CommentLedger,
    profile: ProfileStore,
    catalog: CatalogPipeline,
    resolver: Resolver,
    rng: Arc<dyn Randomness>,
    page_size: usize,
}

impl MemeVerse {
    /// Wires the layer from injected capabilities. Seeds the store defaults,
    /// so a fresh store behaves like a first run immediately.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        source: Arc<dyn TemplateSource>,
        rng: Arc<dyn Randomness>,
        page_size: usize,
    ) -> Self {
        store::initialize_defaults(store.as_ref());
        let uploads = UploadLedger::new(store.clone());
        let catalog = CatalogPipeline::new(source, rng.clone());
        Self {
            likes: LikeLedger::new(store.clone()),
            comments: CommentLedger::new(store.clone()),
            profile: ProfileStore::new(store),
            resolver: Resolver::new(uploads.clone(), catalog.clone()),
            uploads,
            catalog,
            rng,
            page_size,
        }
    }

    /// Production wiring: file store under the configured data dir (falling
    /// back to the no-op store when it cannot be opened), the imgflip-style
    /// source, and thread-local randomness.
    pub fn from_config(config: &Config) -> Self {
        let store: Arc<dyn KeyValueStore> = match FileStore::open(&config.data_dir) {
            Ok(file_store) => Arc::new(file_store),
            Err(e) => {
                warn!(error = %e, "Persistent store unavailable, running without persistence");
                Arc::new(NullStore)
            }
        };
        let rng: Arc<dyn Randomness> = Arc::new(ThreadRandomness);
        let source = Arc::new(ImgflipSource::new(
            reqwest::Client::new(),
            config.api_base_url.clone(),
            rng.clone(),
        ));
        info!(api = %config.api_base_url, "Initializing MemeVerse");
        Self::new(store, source, rng, config.page_size)
    }

    // --- Catalog ---

    /// Fresh fetch, sliced to the category. Empty on fetch failure.
    pub async fn list_by_category(&self, category: Category) -> Vec<Meme> {
        self.catalog.list_by_category(category).await
    }

    /// The whole explore pipeline: category, search, sort, one page.
    pub async fn browse(&self, query: &BrowseQuery) -> Page {
        let memes = self.catalog.list_by_category(query.category).await;
        let mut memes = catalog::search(memes, &query.search);
        catalog::sort_memes(&mut memes, query.sort);
        catalog::paginate(memes, query.page, self.page_size)
    }

    /// Id lookup across uploads and the catalog. `Ok(None)` is a miss,
    /// `Err` a transient fetch failure.
    pub async fn resolve(&self, id: &str) -> Result<Option<Meme>, FetchError> {
        self.resolver.resolve(id).await
    }

    // --- Likes ---

    pub fn toggle_like(&self, meme_id: &str) -> bool {
        self.likes.toggle(meme_id)
    }

    pub fn is_liked(&self, meme_id: &str) -> bool {
        self.likes.is_liked(meme_id)
    }

    // --- Comments ---

    pub fn add_comment(&self, meme_id: &str, text: &str, author: Option<&str>) -> Option<Comment> {
        self.comments.add(meme_id, text, author)
    }

    pub fn list_comments(&self, meme_id: &str) -> Vec<Comment> {
        self.comments.list_for(meme_id)
    }

    // --- Uploads ---

    pub fn append_upload(&self, upload: NewUpload) -> Meme {
        self.uploads.append(upload)
    }

    pub fn list_uploads(&self) -> Vec<Meme> {
        self.uploads.list_all()
    }

    // --- Profile ---

    pub fn load_profile(&self) -> Profile {
        self.profile.load()
    }

    pub fn save_profile(&self, profile: &Profile) {
        self.profile.save(profile)
    }

    /// Counts shown on the profile view: own uploads and likes given.
    pub fn profile_stats(&self) -> ProfileStats {
        ProfileStats {
            uploads: self.uploads.list_all().len(),
            likes_given: self.likes.liked_ids().len(),
        }
    }

    // --- Leaderboard ---

    /// Local uploads ranked by the local like count (0 or 1 per meme, since
    /// the like set tracks membership only), highest first, capped at ten.
    /// Blank titles are normalized for display.
    pub fn top_uploads(&self) -> Vec<Meme> {
        let mut ranked: Vec<Meme> = self
            .uploads
            .list_all()
            .into_iter()
            .map(|mut m| {
                m.likes = self.likes.count_for(&m.id);
                m.title = m.display_title().to_string();
                m
            })
            .collect();
        ranked.sort_by(|a, b| b.likes.cmp(&a.likes));
        ranked.truncate(LEADERBOARD_LIMIT);
        ranked
    }

    // --- Captions ---

    /// Uniform pick from the fixed caption pool (the original's simulated
    /// "AI" generator).
    pub fn suggest_caption(&self) -> &'static str {
        CAPTIONS[self.rng.next_below(CAPTIONS.len() as u32) as usize]
    }
}
