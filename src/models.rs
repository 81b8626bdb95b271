use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when an upload arrives with an empty or whitespace-only title.
pub const UNTITLED: &str = "Untitled Meme";

/// Default display name for the local user before they edit their profile.
pub const ANONYMOUS: &str = "Anonymous User";

/// A meme as the rest of the application sees it, whether it came from the
/// remote template catalog or from the local upload ledger.
///
/// `url` is either a remote image URL (catalog memes) or an inline-encoded
/// data URL (uploads). `likes` is a synthetic popularity count for catalog
/// memes and a real local counter (0 at creation) for uploads.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Meme {
    pub id: String,
    pub url: String,
    pub title: String,
    pub likes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Meme {
    /// Title with the empty-string fallback applied.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    /// The portion of the id before the positional suffix, used by the
    /// resolution fallback. Ids without a `_` are their own base.
    pub fn base_id(id: &str) -> &str {
        id.split('_').next().unwrap_or(id)
    }
}

/// A single comment in one meme's thread. Append-only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// The local user's profile. One record per installation, overwritten
/// wholesale on every save.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default, rename = "profilePic")]
    pub profile_pic: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: ANONYMOUS.to_string(),
            bio: String::new(),
            profile_pic: String::new(),
        }
    }
}

/// Catalog categories. All but `All` and `Random` are positional windows over
/// the fetched sequence; the upstream source has no real category tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    All,
    Trending,
    New,
    Classic,
    Random,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Trending => "trending",
            Category::New => "new",
            Category::Classic => "classic",
            Category::Random => "random",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Category::All),
            "trending" => Ok(Category::Trending),
            "new" => Ok(Category::New),
            "classic" => Ok(Category::Classic),
            "random" => Ok(Category::Random),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// Sort orders offered by the explore view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Popularity descending.
    Likes,
    /// Creation timestamp descending; memes without one sort last.
    Date,
    /// Title lexicographic ascending.
    Name,
}
