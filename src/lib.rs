//! Client-side data layer for the Meme Verse application.
//!
//! The layer composes a remote meme-template catalog (one unauthenticated
//! GET) with browser-style local persistence for likes, uploads, comments,
//! and the user profile, and exposes the browse/resolve pipeline the views
//! consume. Everything is wired through injected capabilities (a
//! [`domain::KeyValueStore`], a [`domain::TemplateSource`], and a
//! [`domain::Randomness`]) so tests substitute in-memory fakes.

pub mod app;
pub mod catalog;
pub mod comments;
pub mod config;
pub mod domain;
pub mod errors;
pub mod likes;
pub mod models;
pub mod profile;
pub mod resolve;
pub mod store;
pub mod templates;
pub mod uploads;

pub use app::{BrowseQuery, MemeVerse, ProfileStats};
pub use catalog::{CatalogPipeline, Page, paginate, search, sort_memes};
pub use comments::CommentLedger;
pub use config::Config;
pub use domain::{KeyValueStore, Randomness, TemplateSource, ThreadRandomness};
pub use errors::{FetchError, StoreError};
pub use likes::LikeLedger;
pub use models::{Category, Comment, Meme, Profile, SortKey};
pub use profile::ProfileStore;
pub use resolve::Resolver;
pub use store::{FileStore, MemoryStore, NullStore, initialize_defaults};
pub use templates::ImgflipSource;
pub use uploads::{NewUpload, UploadLedger, encode_data_url};
