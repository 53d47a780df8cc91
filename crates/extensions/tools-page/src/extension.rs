//! Page tools extension.

use std::sync::Arc;

use tracing::info;

use webtailor_core::{RegistryError, ToolRegistry};
use webtailor_protocols::tool::Tool;

use crate::session::PageSession;
use crate::tools::*;

/// The seven page tools bound to one [`PageSession`].
pub struct PageToolsExtension {
    session: Arc<PageSession>,
}

impl PageToolsExtension {
    pub const ID: &'static str = "tools-page";

    pub fn new(session: Arc<PageSession>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<PageSession> {
        &self.session
    }

    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        let session = &self.session;
        vec![
            Arc::new(ApplyCssTool::new(session.clone())),
            Arc::new(ModifyTextTool::new(session.clone())),
            Arc::new(SelectElementsTool::new(session.clone())),
            Arc::new(GenerateCssTool::new(session.clone())),
            Arc::new(HideElementsTool::new(session.clone())),
            Arc::new(TransformLayoutTool::new(session.clone())),
            Arc::new(SummarizeContentTool::new(session.clone())),
        ]
    }

    /// Register every tool. Fails on the first name already taken.
    pub fn register(&self, registry: &ToolRegistry) -> Result<(), RegistryError> {
        let tools = self.tools();
        let count = tools.len();
        for tool in tools {
            registry.register(tool)?;
        }
        info!("Extension {} registered {} tools", Self::ID, count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use webtailor_core::AppliedStyleSet;
    use webtailor_protocols::error::GenerationError;
    use webtailor_protocols::provider::GenerationClient;
    use webtailor_protocols::tool::ToolKind;

    use crate::dom::InMemoryDocument;

    struct Offline;

    #[async_trait]
    impl GenerationClient for Offline {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Err(GenerationError::MissingApiKey)
        }

        fn has_credentials(&self) -> bool {
            false
        }

        fn set_credentials(&self, _api_key: String) {}
    }

    fn extension() -> PageToolsExtension {
        let doc = Arc::new(InMemoryDocument::new("https://example.com/", "Example").unwrap());
        let session = PageSession::new(doc.clone(), doc, Arc::new(Offline), Arc::new(AppliedStyleSet::new()));
        PageToolsExtension::new(Arc::new(session))
    }

    #[test]
    fn test_registers_all_tools() {
        let registry = ToolRegistry::new();
        extension().register(&registry).unwrap();

        let mut names: Vec<_> = registry.list().into_iter().map(|d| d.id).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "applyCSS",
                "generateCSS",
                "hideElements",
                "modifyText",
                "selectElements",
                "summarizeContent",
                "transformLayout",
            ]
        );
    }

    #[test]
    fn test_only_apply_css_is_static() {
        let statics: Vec<_> = extension()
            .tools()
            .iter()
            .filter(|t| t.definition().kind == ToolKind::Static)
            .map(|t| t.definition().id.clone())
            .collect();
        assert_eq!(statics, vec!["applyCSS"]);
    }

    #[test]
    fn test_double_registration_fails() {
        let registry = ToolRegistry::new();
        let ext = extension();
        ext.register(&registry).unwrap();
        assert!(ext.register(&registry).is_err());
    }
}
