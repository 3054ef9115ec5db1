use thiserror::Error;

/// Errors related to site sessions.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("invalid session id: '{0}'")]
    InvalidSessionId(String),

    #[error("session '{0}' not found")]
    SessionNotFound(String),
}

/// Errors from repository operations (used by trait definitions in sitewright-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors from the HTML research collaborator.
#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("could not fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("invalid url: '{0}'")]
    InvalidUrl(String),
}

/// Errors from the raster image collaborator.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image provider error: {0}")]
    Provider(String),

    #[error("image payload could not be decoded: {0}")]
    Decode(String),

    #[error("empty image prompt")]
    EmptyPrompt,
}
