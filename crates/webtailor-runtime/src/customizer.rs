//! Host-facing command surface for one document.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use webtailor_config::{Config, WatchConfig};
use webtailor_core::{AppliedStyleSet, PlanExecutor, ToolRegistry, derive_storage_plan, origin_key};
use webtailor_protocols::document::{
    Document, MODIFIED_ATTR, MutationRecord, ORIGINAL_TEXT_ATTR, TRANSFORM_TYPE_ATTR,
};
use webtailor_protocols::error::{CommandError, DispatchError, PersistenceError};
use webtailor_protocols::persistence::{API_KEY_KEY, GLOBAL_PROMPT_KEY, KeyValueStore};
use webtailor_protocols::plan::CommandResult;
use webtailor_protocols::provider::GenerationClient;
use webtailor_protocols::rule::Rule;
use webtailor_protocols::snapshot::SnapshotProvider;
use webtailor_protocols::tool::ToolOutput;
use webtailor_store::RuleStore;

use crate::context_cache::PageContextCache;
use crate::planner::Planner;
use crate::replay::{DEFAULT_STALENESS_DAYS, ReplayController, ReplaySummary};
use crate::watch::MutationWatch;

/// Phrases that mark a command as a standing preference for the site.
pub const PERSISTENCE_KEYWORDS: &[&str] = &[
    "always",
    "permanently",
    "every time",
    "on this site",
    "remember",
    "save",
    "keep",
    "default",
    "for this website",
];

const NO_ACTIONS_MESSAGE: &str = "AI could not determine any actions for this command.";

/// Whether `command` asks for its effect to be kept across loads.
pub fn should_persist(command: &str) -> bool {
    let command = command.to_lowercase();
    PERSISTENCE_KEYWORDS.iter().any(|keyword| command.contains(keyword))
}

/// Combine the stored global prompt with a local command.
///
/// Returns `None` when neither carries any text.
pub fn effective_command(global: &str, local: &str) -> Option<String> {
    let global = global.trim();
    let local = local.trim();

    if !local.is_empty() && local != global {
        if global.is_empty() {
            Some(local.to_string())
        } else {
            Some(format!("{}\n\n{}", global, local))
        }
    } else if !global.is_empty() {
        Some(global.to_string())
    } else {
        None
    }
}

/// Initialization progress of a [`Customizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    LoadingRules,
    ApplyingExistingRules,
    /// Terminal. Mutations are watched from here on.
    Observing,
}

/// Tunables taken from the `[cache]` and `[watch]` configuration sections.
#[derive(Debug, Clone)]
pub struct CustomizerConfig {
    pub context_ttl: Duration,
    pub staleness_days: u32,
    pub watch: WatchConfig,
}

impl CustomizerConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            context_ttl: Duration::from_millis(config.cache.context_ttl_ms),
            staleness_days: config.cache.staleness_days,
            watch: config.watch.clone(),
        }
    }
}

impl Default for CustomizerConfig {
    fn default() -> Self {
        Self {
            context_ttl: Duration::from_millis(15_000),
            staleness_days: DEFAULT_STALENESS_DAYS,
            watch: WatchConfig::default(),
        }
    }
}

/// Collaborators a [`Customizer`] is assembled from.
///
/// `context` must be the same cache the page tools read snapshots from,
/// and `styles` the set they record applied stylesheets in.
pub struct CustomizerDeps {
    pub document: Arc<dyn Document>,
    pub context: Arc<PageContextCache>,
    pub styles: Arc<AppliedStyleSet>,
    pub registry: Arc<ToolRegistry>,
    pub generation: Arc<dyn GenerationClient>,
    pub rules: Arc<RuleStore>,
    pub storage: Arc<dyn KeyValueStore>,
}

/// The customization engine bound to one document.
pub struct Customizer {
    document: Arc<dyn Document>,
    context: Arc<PageContextCache>,
    styles: Arc<AppliedStyleSet>,
    registry: Arc<ToolRegistry>,
    executor: PlanExecutor,
    planner: Planner,
    generation: Arc<dyn GenerationClient>,
    rules: Arc<RuleStore>,
    replay: Arc<ReplayController>,
    watch: MutationWatch,
    storage: Arc<dyn KeyValueStore>,
    origin: String,
    state: RwLock<InitState>,
}

impl Customizer {
    pub fn new(deps: CustomizerDeps, config: CustomizerConfig) -> Self {
        let origin = origin_key(&deps.document.location().hostname);
        let executor = PlanExecutor::new(deps.registry.clone());
        let planner = Planner::new(deps.registry.clone(), deps.generation.clone());
        let replay = Arc::new(
            ReplayController::new(deps.rules.clone(), executor.clone())
                .with_staleness_days(config.staleness_days),
        );
        let watch = MutationWatch::new(replay.clone(), deps.context.clone(), origin.clone(), config.watch);

        Self {
            document: deps.document,
            context: deps.context,
            styles: deps.styles,
            registry: deps.registry,
            executor,
            planner,
            generation: deps.generation,
            rules: deps.rules,
            replay,
            watch,
            storage: deps.storage,
            origin,
            state: RwLock::new(InitState::Uninitialized),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn state(&self) -> InitState {
        *self.state.read()
    }

    pub fn context(&self) -> &Arc<PageContextCache> {
        &self.context
    }

    fn set_state(&self, state: InitState) {
        debug!(origin = %self.origin, ?state, "Customizer state");
        *self.state.write() = state;
    }

    /// Load stored rules, replay the origin's rules if any, then start observing.
    ///
    /// Runs once; later calls return the current state.
    pub async fn initialize(&self) -> InitState {
        {
            let mut state = self.state.write();
            if *state != InitState::Uninitialized {
                return *state;
            }
            *state = InitState::LoadingRules;
        }

        if let Err(e) = self.rules.hydrate().await {
            error!(error = %e, "Failed to load stored rules");
        }
        if let Err(e) = self.load_credentials().await {
            warn!(error = %e, "Failed to read stored API key");
        }

        if self.replay.has_rules(&self.origin).await {
            self.set_state(InitState::ApplyingExistingRules);
            self.replay.apply_effective_rules(&self.origin).await;
        }

        self.set_state(InitState::Observing);
        info!(origin = %self.origin, "Customizer initialized");
        InitState::Observing
    }

    /// Install the stored API key if the client has none yet.
    async fn load_credentials(&self) -> Result<(), PersistenceError> {
        if self.generation.has_credentials() {
            return Ok(());
        }
        let stored = self.storage.get(&[API_KEY_KEY]).await?;
        if let Some(key) = stored
            .get(API_KEY_KEY)
            .and_then(serde_json::Value::as_str)
            .filter(|key| !key.trim().is_empty())
        {
            self.generation.set_credentials(key.to_string());
        }
        Ok(())
    }

    async fn ensure_credentials(&self) -> Result<(), CommandError> {
        if let Err(e) = self.load_credentials().await {
            warn!(error = %e, "Failed to read stored API key");
        }
        if self.generation.has_credentials() {
            Ok(())
        } else {
            Err(CommandError::MissingApiKey)
        }
    }

    /// Persist the API key and hand it to the generation client.
    pub async fn set_api_key(&self, api_key: &str) -> Result<(), PersistenceError> {
        let entries = HashMap::from([(API_KEY_KEY.to_string(), serde_json::json!(api_key))]);
        self.storage.set(entries).await?;
        self.generation.set_credentials(api_key.to_string());
        info!("API key updated");
        Ok(())
    }

    /// The stored global prompt, or an empty string.
    pub async fn global_prompt(&self) -> String {
        match self.storage.get(&[GLOBAL_PROMPT_KEY]).await {
            Ok(stored) => stored
                .get(GLOBAL_PROMPT_KEY)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_string(),
            Err(e) => {
                warn!(error = %e, "Failed to read global prompt");
                String::new()
            }
        }
    }

    pub async fn set_global_prompt(&self, text: &str) -> Result<(), PersistenceError> {
        let entries = HashMap::from([(GLOBAL_PROMPT_KEY.to_string(), serde_json::json!(text.trim()))]);
        self.storage.set(entries).await
    }

    /// Invoke one tool directly.
    pub async fn execute_tool(
        &self,
        name: &str,
        params: serde_json::Value,
    ) -> Result<ToolOutput, DispatchError> {
        self.registry.invoke(name, params).await
    }

    /// Plan, execute and, when asked to, store a natural-language command.
    pub async fn execute_natural_language_command(
        &self,
        command: &str,
    ) -> Result<CommandResult, CommandError> {
        let span = info_span!("command", id = %Uuid::new_v4(), origin = %self.origin);
        self.run_command(command).instrument(span).await
    }

    async fn run_command(&self, command: &str) -> Result<CommandResult, CommandError> {
        let command = command.trim();
        if command.is_empty() {
            return Err(CommandError::EmptyCommand);
        }
        self.ensure_credentials().await?;
        info!(%command, "Executing command");

        let snapshot = self.context.snapshot().await?;
        let plan = self.planner.plan(command, &snapshot).await;
        if plan.is_empty() {
            warn!(reasoning = %plan.reasoning, "Plan has no actions");
            return Ok(CommandResult {
                execution_plan: plan,
                results: Vec::new(),
                message: Some(NO_ACTIONS_MESSAGE.to_string()),
                persisted: false,
            });
        }

        let results = self.executor.execute(&plan.actions).await;
        let succeeded = results.iter().filter(|r| r.success).count();
        info!(actions = results.len(), succeeded, "Executed plan");

        let mut persisted = false;
        if succeeded > 0 && should_persist(command) {
            let storage_plan = derive_storage_plan(&plan, &results);
            let rule = Rule::new(command, storage_plan, results.clone());
            match self.rules.save(&self.origin, rule).await {
                Ok(()) => persisted = true,
                Err(e) => error!(error = %e, "Failed to save rule"),
            }
        }

        Ok(CommandResult {
            execution_plan: plan,
            results,
            message: None,
            persisted,
        })
    }

    /// Run `local` combined with the stored global prompt.
    pub async fn process_customization(&self, local: &str) -> Result<CommandResult, CommandError> {
        let global = self.global_prompt().await;
        let command = effective_command(&global, local).ok_or(CommandError::EmptyCommand)?;
        self.execute_natural_language_command(&command).await
    }

    /// Run the stored global prompt on its own.
    pub async fn apply_global_prompt(&self) -> Result<CommandResult, CommandError> {
        self.process_customization("").await
    }

    /// Replay the origin's effective rules now.
    pub async fn apply_existing_rules(&self) -> ReplaySummary {
        self.replay.apply_effective_rules(&self.origin).await
    }

    /// Rules stored for this document's origin.
    pub async fn rules(&self) -> Vec<Rule> {
        self.rules.load(&self.origin).await
    }

    /// Feed observed mutations to the watch. Ignored until initialized.
    pub fn on_mutation(&self, record: &MutationRecord) -> bool {
        if self.state() != InitState::Observing {
            return false;
        }
        self.watch.observe(record)
    }

    /// Undo every customization on the page and forget the origin's rules.
    pub async fn reset_customizations(&self) {
        info!(origin = %self.origin, "Resetting customizations");
        self.document.clear_styles();
        self.styles.clear();
        self.restore_modified_text();

        if let Err(e) = self.rules.clear(&self.origin).await {
            error!(error = %e, "Failed to clear stored rules");
        }
        self.context.invalidate();
    }

    fn restore_modified_text(&self) {
        let selector = format!("[{}=\"true\"]", MODIFIED_ATTR);
        let modified = match self.document.query_selector_all(&selector) {
            Ok(modified) => modified,
            Err(e) => {
                warn!(error = %e, "Cannot find modified elements");
                return;
            }
        };

        for element in modified {
            let restored = (|| {
                if let Some(original) = element.attribute(ORIGINAL_TEXT_ATTR).filter(|t| !t.is_empty()) {
                    self.document.set_text(element.node, original)?;
                }
                self.document.remove_attribute(element.node, MODIFIED_ATTR)?;
                self.document.remove_attribute(element.node, ORIGINAL_TEXT_ATTR)?;
                self.document.remove_attribute(element.node, TRANSFORM_TYPE_ATTR)
            })();
            if let Err(e) = restored {
                warn!(node = element.node, error = %e, "Failed to restore element text");
            }
        }
    }
}

#[cfg(test)]
#[path = "customizer_tests.rs"]
mod tests;
