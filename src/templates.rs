//! Remote template source: the one network call in this layer.
//!
//! The upstream catalog carries only an id, an image URL, and a display name.
//! Popularity and creation time do not exist upstream, so both are
//! synthesized per fetch: popularity is a fresh uniform draw in `[0, 1000)`
//! and the timestamp is the fetch time. Neither is stable across calls.

use crate::domain::{Randomness, TemplateSource};
use crate::errors::FetchError;
use crate::models::Meme;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Raw template record as the remote API returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiTemplate {
    pub id: String,
    pub url: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ApiData {
    memes: Vec<ApiTemplate>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    success: bool,
    data: Option<ApiData>,
}

/// Template source backed by the imgflip-style public API:
/// `GET {base}/get_memes`, no parameters, no authentication.
pub struct ImgflipSource {
    client: reqwest::Client,
    base_url: String,
    rng: Arc<dyn Randomness>,
}

impl ImgflipSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, rng: Arc<dyn Randomness>) -> Self {
        let base_url = base_url.into();
        info!(%base_url, "Initializing ImgflipSource");
        Self {
            client,
            base_url,
            rng,
        }
    }
}

#[async_trait]
impl TemplateSource for ImgflipSource {
    async fn fetch_templates(&self) -> Result<Vec<Meme>, FetchError> {
        let url = format!("{}/get_memes", self.base_url);
        debug!(%url, "Fetching template catalog");
        let response: ApiResponse = self.client.get(&url).send().await?.json().await?;
        let templates = parse_response(response)?;
        let fetched_at = Utc::now();
        debug!(count = templates.len(), "Template catalog fetched");
        Ok(synthesize(templates, self.rng.as_ref(), fetched_at))
    }
}

/// Validates the response envelope: `success: false` or a missing payload is
/// a fetch failure, not a crash.
fn parse_response(response: ApiResponse) -> Result<Vec<ApiTemplate>, FetchError> {
    if !response.success {
        return Err(FetchError::ApiFailure);
    }
    response
        .data
        .map(|d| d.memes)
        .ok_or_else(|| FetchError::MalformedResponse("missing data.memes".into()))
}

/// Turns raw templates into `Meme` records.
///
/// Ids are suffixed with the position in this fetch, which keeps them unique
/// even when raw template ids repeat. The suffix is also why ids from one
/// fetch may not match the next; the resolution service compensates with a
/// base-id fallback.
fn synthesize(
    templates: Vec<ApiTemplate>,
    rng: &dyn Randomness,
    fetched_at: DateTime<Utc>,
) -> Vec<Meme> {
    templates
        .into_iter()
        .enumerate()
        .map(|(index, template)| Meme {
            id: format!("{}_{}", template.id, index),
            url: template.url,
            title: template.name,
            likes: rng.next_below(1000),
            created_at: Some(fetched_at),
            author: None,
            category: None,
        })
        .collect()
}
