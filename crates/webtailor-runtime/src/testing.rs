//! Fakes shared by the runtime tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::Mutex;
use serde_json::json;

use webtailor_core::ToolRegistry;
use webtailor_protocols::error::{GenerationError, ToolError};
use webtailor_protocols::provider::GenerationClient;
use webtailor_protocols::tool::{ParameterKind, ToolDefinition, ToolOutput};

/// Generation client answering from a queue of canned responses.
pub struct ScriptedGeneration {
    responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
    api_key: Mutex<Option<String>>,
}

impl ScriptedGeneration {
    pub fn new(responses: Vec<&str>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.to_string())).collect()),
            prompts: Mutex::new(Vec::new()),
            api_key: Mutex::new(Some("test-key".to_string())),
        })
    }

    pub fn failing(error: GenerationError) -> Arc<Self> {
        let scripted = Self::new(vec![]);
        scripted.responses.lock().push_back(Err(error));
        scripted
    }

    pub fn without_key(self: Arc<Self>) -> Arc<Self> {
        *self.api_key.lock() = None;
        self
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl GenerationClient for ScriptedGeneration {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().push(prompt.to_string());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Network("no scripted response".to_string())))
    }

    fn has_credentials(&self) -> bool {
        self.api_key.lock().is_some()
    }

    fn set_credentials(&self, api_key: String) {
        *self.api_key.lock() = Some(api_key);
    }
}

/// Registers a `count` tool that records its invocations, and a `fail` tool.
pub fn counting_registry() -> (Arc<ToolRegistry>, Arc<AtomicUsize>) {
    let registry = Arc::new(ToolRegistry::new());
    let count = Arc::new(AtomicUsize::new(0));

    let counter = count.clone();
    registry
        .register_fn(
            ToolDefinition::new("count", "Count invocations")
                .with_parameter("label", ParameterKind::String, false),
            move |_params| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(ToolOutput::new(json!({"counted": true})))
                }
                .boxed()
            },
        )
        .unwrap();
    registry
        .register_fn(ToolDefinition::new("fail", "Always fails"), |_params| {
            async { Err(ToolError::ExecutionFailed("boom".to_string())) }.boxed()
        })
        .unwrap();

    (registry, count)
}
