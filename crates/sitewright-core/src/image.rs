//! Raster image port and its cached front.
//!
//! Generated pages request imagery through `/api/image?prompt=...`. The
//! upstream image call is slow and idempotent, so results are memoized in a
//! [`ResponseCache`] keyed by the normalized prompt.

use std::future::Future;

use sitewright_types::error::ImageError;

use crate::storage::cache::ResponseCache;

/// Generates PNG bytes from a text prompt.
pub trait ImageGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<Vec<u8>, ImageError>> + Send;
}

/// Normalize an image prompt into its cache key (trim + lowercase).
pub fn cache_key(prompt: &str) -> String {
    prompt.trim().to_lowercase()
}

/// Image generation with a read-through cache.
///
/// Two concurrent first requests for the same unseen key both reach the
/// generator and both write the cache (stampede). The last write wins, and
/// since the image call is idempotent either result is acceptable.
pub struct CachedImageService<G: ImageGenerator, C: ResponseCache> {
    generator: G,
    cache: C,
}

impl<G: ImageGenerator, C: ResponseCache> CachedImageService<G, C> {
    pub fn new(generator: G, cache: C) -> Self {
        Self { generator, cache }
    }

    /// Return cached bytes for the prompt, generating them on a miss.
    ///
    /// Cache failures are logged and bypassed; they never fail the request.
    pub async fn image(&self, prompt: &str) -> Result<Vec<u8>, ImageError> {
        let key = cache_key(prompt);
        if key.is_empty() {
            return Err(ImageError::EmptyPrompt);
        }

        match self.cache.get(&key).await {
            Ok(Some(bytes)) => {
                tracing::debug!(key = %key, "image cache hit");
                return Ok(bytes);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "image cache read failed"),
        }

        let bytes = self.generator.generate(prompt.trim()).await?;
        tracing::info!(key = %key, bytes = bytes.len(), "generated image");

        if let Err(e) = self.cache.put(&key, bytes.clone()).await {
            tracing::warn!(error = %e, "image cache write failed");
        }
        Ok(bytes)
    }
}
