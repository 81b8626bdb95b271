use thiserror::Error; // Use thiserror for cleaner error definitions

// --- Store Adapter Errors ---

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store backend error: {0}")]
    BackendError(#[from] anyhow::Error), // Wrap Anyhow errors from the store backend
}

// --- Remote Template Source Errors ---

/// Transient failures of the remote template source. A genuine miss is never
/// one of these; resolution reports misses as `Ok(None)`.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Template request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Template API reported failure (success=false)")]
    ApiFailure,

    #[error("Malformed template response: {0}")]
    MalformedResponse(String),
}
