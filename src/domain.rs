use crate::errors::{FetchError, StoreError};
use crate::models::Meme;
use async_trait::async_trait;

/// Trait defining the browser-local string store the ledgers are built on.
///
/// Values are JSON-serialized strings; keys are flat and namespaced by the
/// callers (see the key constants in `store`). Implementations must treat an
/// absent key as `Ok(None)`, never as an error.
pub trait KeyValueStore: Send + Sync + 'static { // Send+Sync+'static required for Arc<dyn>
    /// Reads the raw string stored under `key`. `Ok(None)` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes the raw string under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Whether this store actually persists anything. `false` for the
    /// unavailable-store stand-in, which lets mutating operations short-cut
    /// to their documented degraded result instead of pretending to write.
    fn available(&self) -> bool {
        true
    }
}

/// Trait defining the remote meme template catalog.
///
/// The single implementation performs one unauthenticated GET; test doubles
/// return canned sequences. Errors here are transient fetch failures; the
/// catalog pipeline is the layer that converts them into empty results.
#[async_trait]
pub trait TemplateSource: Send + Sync + 'static {
    /// Fetches the full template catalog, already transformed into `Meme`
    /// records with unique positional ids, synthetic popularity, and a
    /// fetch-time timestamp.
    async fn fetch_templates(&self) -> Result<Vec<Meme>, FetchError>;
}

/// Injected randomness so the synthetic popularity scores and the `random`
/// category shuffle can be fixed in tests.
pub trait Randomness: Send + Sync + 'static {
    /// Uniform integer in `[0, bound)`. `bound` is never 0 in this crate.
    fn next_below(&self, bound: u32) -> u32;

    /// Uniform shuffle of `indices` (Fisher-Yates over `next_below`).
    fn shuffle(&self, indices: &mut [usize]) {
        for i in (1..indices.len()).rev() {
            let j = self.next_below((i + 1) as u32) as usize;
            indices.swap(i, j);
        }
    }
}

/// Thread-local RNG backed implementation used outside of tests.
#[derive(Debug, Default, Clone)]
pub struct ThreadRandomness;

impl Randomness for ThreadRandomness {
    fn next_below(&self, bound: u32) -> u32 {
        use rand::Rng;
        rand::thread_rng().gen_range(0..bound)
    }
}
