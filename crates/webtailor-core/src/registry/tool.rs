//! Tool registry: a pure name -> tool dispatch table.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::debug;

use webtailor_protocols::error::{DispatchError, ToolError};
use webtailor_protocols::tool::{Tool, ToolDefinition, ToolOutput};

use super::base::{BaseRegistry, Registerable};
use super::RegistryError;

impl Registerable for dyn Tool {
    fn registry_id(&self) -> &str {
        &self.definition().id
    }
}

/// Boxed future returned by closure-backed tools.
pub type ToolFuture = BoxFuture<'static, Result<ToolOutput, ToolError>>;

/// A tool backed by a closure.
struct FnTool<F> {
    definition: ToolDefinition,
    executor: F,
}

#[async_trait]
impl<F> Tool for FnTool<F>
where
    F: Fn(serde_json::Value) -> ToolFuture + Send + Sync,
{
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        (self.executor)(params).await
    }
}

/// Registry for managing tools.
///
/// Performs no retries and no parameter validation: each tool validates
/// its own parameters.
pub struct ToolRegistry {
    inner: BaseRegistry<dyn Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            inner: BaseRegistry::new(),
        }
    }

    /// Register a tool under its definition's ID.
    pub fn register(&self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        debug!("Registering tool {}", tool.definition().id);
        self.inner.register(tool)
    }

    /// Register a closure as the executor for `definition`.
    pub fn register_fn<F>(&self, definition: ToolDefinition, executor: F) -> Result<(), RegistryError>
    where
        F: Fn(serde_json::Value) -> ToolFuture + Send + Sync + 'static,
    {
        self.register(Arc::new(FnTool {
            definition,
            executor,
        }))
    }

    pub fn unregister(&self, id: &str) -> Result<(), RegistryError> {
        self.inner.unregister(id)
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Tool>> {
        self.inner.get(id)
    }

    /// All tool definitions, sorted by ID.
    pub fn list(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> =
            self.inner.iter().map(|t| t.definition().clone()).collect();
        definitions.sort_by(|a, b| a.id.cmp(&b.id));
        definitions
    }

    /// Dispatch `params` to the tool registered as `name`.
    pub async fn invoke(
        &self,
        name: &str,
        params: serde_json::Value,
    ) -> Result<ToolOutput, DispatchError> {
        let tool = self
            .get(name)
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;

        tool.execute(params)
            .await
            .map_err(|source| DispatchError::Execution {
                tool: name.to_string(),
                source,
            })
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
