//! Wiring of the document, tools, provider and stores for webtailor.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use webtailor_config::Config;
use webtailor_core::{AppliedStyleSet, ToolRegistry};
use webtailor_provider_gemini::{GeminiProvider, GenerationConfig as Sampling};
use webtailor_runtime::{Customizer, CustomizerConfig, CustomizerDeps, PageContextCache};
use webtailor_store::{FileKeyValueStore, RuleStore};
use webtailor_tools_page::{InMemoryDocument, PageSession, PageToolsExtension};

/// Everything needed to operate on one page.
pub(crate) struct Engine {
    pub document: Arc<InMemoryDocument>,
    pub customizer: Customizer,
}

/// Open the key-value store configured in `[storage]`.
pub(crate) async fn open_storage(config: &Config) -> anyhow::Result<Arc<FileKeyValueStore>> {
    let store = FileKeyValueStore::new(config.storage.path.clone())
        .await
        .with_context(|| format!("opening storage {}", config.storage.path.display()))?;
    Ok(Arc::new(store))
}

/// The rule store over `storage`, loaded from disk.
pub(crate) async fn open_rules(config: &Config, storage: Arc<FileKeyValueStore>) -> anyhow::Result<RuleStore> {
    let rules = RuleStore::with_max_rules(storage, config.cache.max_rules_per_origin);
    rules.hydrate().await.context("loading stored rules")?;
    Ok(rules)
}

fn create_provider(config: &Config) -> anyhow::Result<Arc<GeminiProvider>> {
    let generation = &config.generation;
    let api_key = generation.resolve_api_key();
    if api_key.is_none() {
        warn!("No API key configured; falling back to the stored key");
    }

    let provider = GeminiProvider::with_endpoint(
        generation.endpoint.clone(),
        generation.model.clone(),
        Duration::from_secs(generation.timeout_seconds),
    )?
    .with_api_key(api_key)
    .with_sampling(Sampling {
        temperature: Some(generation.temperature),
        max_output_tokens: Some(generation.max_output_tokens),
        top_p: Some(generation.top_p),
        top_k: Some(generation.top_k),
    });
    info!(model = %provider.model(), "Generation provider ready");
    Ok(Arc::new(provider))
}

/// Load a page fixture and assemble a customizer for it.
pub(crate) async fn assemble(config: &Config, page: &Path) -> anyhow::Result<Engine> {
    let fixture = tokio::fs::read_to_string(page)
        .await
        .with_context(|| format!("reading page fixture {}", page.display()))?;
    let document = Arc::new(InMemoryDocument::from_json(&fixture)?);

    let runtime_config = CustomizerConfig::from_config(config);
    let generation = create_provider(config)?;
    let storage = open_storage(config).await?;
    let rules = Arc::new(RuleStore::with_max_rules(
        storage.clone(),
        config.cache.max_rules_per_origin,
    ));

    let styles = Arc::new(AppliedStyleSet::new());
    let context = Arc::new(PageContextCache::new(
        document.clone(),
        styles.clone(),
        runtime_config.context_ttl,
    ));
    let session = Arc::new(PageSession::new(
        document.clone(),
        context.clone(),
        generation.clone(),
        styles.clone(),
    ));

    let registry = Arc::new(ToolRegistry::new());
    PageToolsExtension::new(session).register(&registry)?;

    let customizer = Customizer::new(
        CustomizerDeps {
            document: document.clone(),
            context,
            styles,
            registry,
            generation,
            rules,
            storage,
        },
        runtime_config,
    );

    Ok(Engine {
        document,
        customizer,
    })
}
