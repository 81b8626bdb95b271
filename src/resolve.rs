//! Resolution service: id → meme, across both the upload ledger and the
//! remote catalog.

use crate::catalog::CatalogPipeline;
use crate::errors::FetchError;
use crate::models::Meme;
use crate::uploads::UploadLedger;
use tracing::debug;

#[derive(Clone)]
pub struct Resolver {
    uploads: UploadLedger,
    catalog: CatalogPipeline,
}

impl Resolver {
    pub fn new(uploads: UploadLedger, catalog: CatalogPipeline) -> Self {
        Self { uploads, catalog }
    }

    /// Resolves `id`, checking the upload ledger first (no network), then an
    /// exact match in the full catalog, then any catalog entry sharing the
    /// id's base prefix.
    ///
    /// `Ok(None)` is a genuine miss; `Err` is a transient fetch failure. The
    /// base-id fallback can land on a different positional entry than the
    /// one originally viewed, because catalog ids regenerate per fetch; see
    /// the resolver tests.
    pub async fn resolve(&self, id: &str) -> Result<Option<Meme>, FetchError> {
        if let Some(local) = self.uploads.list_all().into_iter().find(|m| m.id == id) {
            debug!(id, "Resolved from upload ledger");
            return Ok(Some(local));
        }

        let catalog = self.catalog.fetch_all().await?;
        if let Some(exact) = catalog.iter().find(|m| m.id == id) {
            debug!(id, "Resolved from catalog by exact id");
            return Ok(Some(exact.clone()));
        }

        let prefix = format!("{}_", Meme::base_id(id));
        match catalog.into_iter().find(|m| m.id.starts_with(&prefix)) {
            Some(by_base) => {
                debug!(id, resolved_id = %by_base.id, "Resolved from catalog by base id");
                Ok(Some(by_base))
            }
            None => {
                debug!(id, "Meme not found");
                Ok(None)
            }
        }
    }
}
