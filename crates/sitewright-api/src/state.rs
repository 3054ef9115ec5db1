//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST
//! API. `StudioService` and `CachedImageService` are generic over their
//! collaborators; AppState pins them to the infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use secrecy::ExposeSecret;

use sitewright_core::architect::extractor::RequirementsExtractor;
use sitewright_core::image::CachedImageService;
use sitewright_core::llm::box_provider::BoxLlmProvider;
use sitewright_core::service::studio::{BuilderSettings, StudioService};
use sitewright_infra::cache::MemoryResponseCache;
use sitewright_infra::config::{api_key_from_env, load_studio_config};
use sitewright_infra::filesystem::resolve_data_dir;
use sitewright_infra::image::ImagenGenerator;
use sitewright_infra::llm::create_provider;
use sitewright_infra::research::HtmlResearcher;
use sitewright_infra::storage::FsSiteStore;
use sitewright_types::config::StudioConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteStudioService = StudioService<FsSiteStore, HtmlResearcher>;

pub type ConcreteImageService = CachedImageService<ImagenGenerator, MemoryResponseCache>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub studio: Arc<ConcreteStudioService>,
    /// `None` when no image API key is configured; the image route then
    /// serves a transparent placeholder.
    pub images: Option<Arc<ConcreteImageService>>,
    pub builder: Arc<BoxLlmProvider>,
    pub config: Arc<StudioConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, build providers, wire services.
    pub async fn init() -> Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("cannot create data directory {}", data_dir.display()))?;

        let config = load_studio_config(&data_dir).await;

        let api_key = api_key_from_env(&config.api_key_env).with_context(|| {
            format!(
                "no API key for provider '{}': set {}",
                config.provider_name, config.api_key_env
            )
        })?;

        let architect = create_provider(
            &config.provider_config(&config.architect_model),
            Some(api_key.expose_secret()),
        )
        .context("failed to create architect provider")?;
        let builder = Arc::new(
            create_provider(
                &config.provider_config(&config.builder_model),
                Some(api_key.expose_secret()),
            )
            .context("failed to create builder provider")?,
        );

        let extractor = RequirementsExtractor::new(
            Arc::new(architect),
            config.architect_model.clone(),
            config.temperature,
        );
        let studio = StudioService::new(
            extractor,
            Arc::clone(&builder),
            BuilderSettings::from(&config),
            FsSiteStore::new(&data_dir),
            HtmlResearcher::new(Duration::from_secs(config.research_timeout_secs)),
        );

        let images = match api_key_from_env(config.image_key_env()) {
            Some(key) => Some(Arc::new(CachedImageService::new(
                ImagenGenerator::new(key, config.image_model.clone()),
                MemoryResponseCache::new(),
            ))),
            None => {
                tracing::warn!(
                    env = config.image_key_env(),
                    "no image API key; image route will serve placeholders"
                );
                None
            }
        };

        tracing::info!(
            provider = %config.provider_name,
            architect_model = %config.architect_model,
            builder_model = %config.builder_model,
            data_dir = %data_dir.display(),
            "studio initialized"
        );

        Ok(Self {
            studio: Arc::new(studio),
            images,
            builder,
            config: Arc::new(config),
            data_dir,
        })
    }
}
