//! Meme catalog pipeline: fetch, partition into categories, then the pure
//! consumer stages (search, sort, paginate) the explore view composes.
//!
//! Categories are positional windows over the fetched sequence because the
//! upstream catalog has no real category tags. Every call re-fetches and
//! re-randomizes; nothing here is cached.

use crate::domain::{Randomness, TemplateSource};
use crate::errors::FetchError;
use crate::models::{Category, Meme, SortKey};
use std::sync::Arc;
use tracing::warn;

/// Width of each positional category window, and the size of the random sample.
const WINDOW: usize = 20;

#[derive(Clone)]
pub struct CatalogPipeline {
    source: Arc<dyn TemplateSource>,
    rng: Arc<dyn Randomness>,
}

impl CatalogPipeline {
    pub fn new(source: Arc<dyn TemplateSource>, rng: Arc<dyn Randomness>) -> Self {
        Self { source, rng }
    }

    /// The requested category slice of a fresh fetch. A failed fetch yields
    /// an empty list, never an error; consumers present a retry affordance.
    pub async fn list_by_category(&self, category: Category) -> Vec<Meme> {
        match self.fetch_all().await {
            Ok(memes) => partition(memes, category, self.rng.as_ref()),
            Err(e) => {
                warn!(category = category.as_str(), error = %e, "Catalog fetch failed");
                Vec::new()
            }
        }
    }

    /// Full catalog with errors intact, for the resolution service, which
    /// must distinguish a transient failure from a genuine miss.
    pub(crate) async fn fetch_all(&self) -> Result<Vec<Meme>, FetchError> {
        self.source.fetch_templates().await
    }
}

/// Applies the positional category windows. A catalog shorter than a window's
/// upper bound yields a short or empty slice, not an error.
fn partition(memes: Vec<Meme>, category: Category, rng: &dyn Randomness) -> Vec<Meme> {
    if memes.is_empty() {
        return memes;
    }
    match category {
        Category::All => memes,
        Category::Trending => window(memes, 0),
        Category::New => window(memes, WINDOW),
        Category::Classic => window(memes, 2 * WINDOW),
        Category::Random => sample(memes, rng),
    }
}

fn window(memes: Vec<Meme>, start: usize) -> Vec<Meme> {
    memes.into_iter().skip(start).take(WINDOW).collect()
}

/// Uniformly shuffled copy truncated to the window size. No duplicates: the
/// shuffle permutes positions, it never repeats one.
fn sample(memes: Vec<Meme>, rng: &dyn Randomness) -> Vec<Meme> {
    let mut indices: Vec<usize> = (0..memes.len()).collect();
    rng.shuffle(&mut indices);
    indices.truncate(WINDOW);
    let mut chosen: Vec<Option<Meme>> = memes.into_iter().map(Some).collect();
    indices
        .into_iter()
        .filter_map(|i| chosen[i].take())
        .collect()
}

// --- Consumer-side stages ---

/// Case-insensitive substring search on titles.
pub fn search(memes: Vec<Meme>, query: &str) -> Vec<Meme> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return memes;
    }
    memes
        .into_iter()
        .filter(|m| m.title.to_lowercase().contains(&query))
        .collect()
}

/// Sorts in place by the requested key. `Date` puts memes without a
/// timestamp last; ties keep their fetch order (stable sort).
pub fn sort_memes(memes: &mut [Meme], key: SortKey) {
    match key {
        SortKey::Likes => memes.sort_by(|a, b| b.likes.cmp(&a.likes)),
        SortKey::Date => memes.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Name => memes.sort_by(|a, b| a.title.cmp(&b.title)),
    }
}

/// One page of an in-memory slice. All pagination in this layer is slicing
/// over an already-fetched sequence; there is no server-side paging.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Meme>,
    /// 1-based page number as requested.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slices `memes` into 1-based pages of `per_page`. An out-of-range page,
/// including page 0, is an empty page, not an error. `per_page` of 0 yields
/// a single empty page.
pub fn paginate(memes: Vec<Meme>, page: usize, per_page: usize) -> Page {
    let total_items = memes.len();
    if per_page == 0 {
        return Page {
            items: Vec::new(),
            page,
            total_pages: 1,
            total_items,
        };
    }
    let total_pages = total_items.div_ceil(per_page).max(1);
    // Pages are 1-based; page 0 maps past the end so it slices to nothing.
    let start = match page.checked_sub(1) {
        Some(zero_based) => zero_based.saturating_mul(per_page),
        None => total_items,
    };
    let items = memes
        .into_iter()
        .skip(start)
        .take(per_page)
        .collect();
    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ThreadRandomness;
    use chrono::{Duration, Utc};

    fn meme(id: &str, title: &str, likes: u32) -> Meme {
        Meme {
            id: id.into(),
            url: format!("https://i.example/{id}.jpg"),
            title: title.into(),
            likes,
            created_at: None,
            author: None,
            category: None,
        }
    }

    fn catalog(n: usize) -> Vec<Meme> {
        (0..n)
            .map(|i| meme(&format!("{i}_{i}"), &format!("meme {i}"), i as u32))
            .collect()
    }

    #[test]
    fn windows_cover_fixed_positions() {
        let memes = catalog(70);
        let trending = partition(memes.clone(), Category::Trending, &ThreadRandomness);
        let newer = partition(memes.clone(), Category::New, &ThreadRandomness);
        let classic = partition(memes.clone(), Category::Classic, &ThreadRandomness);
        assert_eq!(trending.len(), 20);
        assert_eq!(trending[0].id, "0_0");
        assert_eq!(newer[0].id, "20_20");
        assert_eq!(classic[0].id, "40_40");
        assert_eq!(
            partition(memes, Category::All, &ThreadRandomness).len(),
            70
        );
    }

    #[test]
    fn short_catalog_yields_short_or_empty_windows() {
        let memes = catalog(25);
        assert_eq!(
            partition(memes.clone(), Category::Trending, &ThreadRandomness).len(),
            20
        );
        assert_eq!(
            partition(memes.clone(), Category::New, &ThreadRandomness).len(),
            5
        );
        assert!(partition(memes, Category::Classic, &ThreadRandomness).is_empty());
    }

    #[test]
    fn random_is_a_bounded_sample_without_duplicates() {
        let memes = catalog(70);
        let sampled = partition(memes.clone(), Category::Random, &ThreadRandomness);
        assert_eq!(sampled.len(), 20);
        let mut ids: Vec<_> = sampled.iter().map(|m| m.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
        // Every sampled meme came from the catalog.
        assert!(sampled.iter().all(|s| memes.iter().any(|m| m.id == s.id)));
    }

    #[test]
    fn random_over_a_small_catalog_is_a_permutation() {
        let memes = catalog(7);
        let sampled = partition(memes, Category::Random, &ThreadRandomness);
        let mut ids: Vec<_> = sampled.iter().map(|m| m.id.clone()).collect();
        ids.sort();
        assert_eq!(ids.len(), 7);
        ids.dedup();
        assert_eq!(ids.len(), 7);
    }

    #[test]
    fn empty_catalog_short_circuits_every_category() {
        for category in [
            Category::All,
            Category::Trending,
            Category::New,
            Category::Classic,
            Category::Random,
        ] {
            assert!(partition(Vec::new(), category, &ThreadRandomness).is_empty());
        }
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let memes = vec![
            meme("1_0", "Drake Hotline Bling", 0),
            meme("2_1", "Two Buttons", 0),
            meme("3_2", "drakeposting", 0),
        ];
        let hits = search(memes.clone(), "DRAKE");
        assert_eq!(hits.len(), 2);
        assert_eq!(search(memes.clone(), "  "), memes);
        assert!(search(memes, "zucchini").is_empty());
    }

    #[test]
    fn sort_orders_match_the_explore_view() {
        let now = Utc::now();
        let mut memes = vec![
            meme("a", "bravo", 10),
            meme("b", "alpha", 30),
            meme("c", "charlie", 20),
        ];
        memes[0].created_at = Some(now - Duration::hours(2));
        memes[1].created_at = Some(now);
        memes[2].created_at = None;

        let mut by_likes = memes.clone();
        sort_memes(&mut by_likes, SortKey::Likes);
        assert_eq!(by_likes[0].likes, 30);
        assert_eq!(by_likes[2].likes, 10);

        let mut by_date = memes.clone();
        sort_memes(&mut by_date, SortKey::Date);
        assert_eq!(by_date[0].id, "b");
        assert_eq!(by_date[2].id, "c"); // no timestamp sorts last

        let mut by_name = memes;
        sort_memes(&mut by_name, SortKey::Name);
        assert_eq!(by_name[0].title, "alpha");
    }

    #[test]
    fn pagination_slices_one_based_pages() {
        let memes = catalog(30);
        let first = paginate(memes.clone(), 1, 12);
        assert_eq!(first.items.len(), 12);
        assert_eq!(first.items[0].id, "0_0");
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 30);

        let last = paginate(memes.clone(), 3, 12);
        assert_eq!(last.items.len(), 6);

        let beyond = paginate(memes, 4, 12);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_pages, 3);
    }

    #[test]
    fn page_zero_is_out_of_range() {
        let zeroth = paginate(catalog(30), 0, 12);
        assert!(zeroth.items.is_empty());
        assert_eq!(zeroth.page, 0);
        assert_eq!(zeroth.total_pages, 3);
        assert_eq!(zeroth.total_items, 30);
    }

    #[test]
    fn empty_input_still_reports_one_page() {
        let page = paginate(Vec::new(), 1, 12);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_items, 0);
    }
}
