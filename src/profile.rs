//! Profile record: one local user, one record, overwritten wholesale.

use crate::domain::KeyValueStore;
use crate::models::Profile;
use crate::store::{self, PROFILE_KEY};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The profile record, or the seeded default when absent or unreadable.
    pub fn load(&self) -> Profile {
        store::read_json(self.store.as_ref(), PROFILE_KEY, Profile::default())
    }

    /// Replaces the record wholesale. No merge, no history. Avatar updates
    /// arrive already inline-encoded; this layer does no encoding.
    pub fn save(&self, profile: &Profile) {
        store::write_json(self.store.as_ref(), PROFILE_KEY, profile);
        debug!(name = %profile.name, "Profile saved");
    }
}
