//! # webtailor Core
//!
//! The deterministic heart of the customization engine.
//!
//! ## Components
//!
//! - [`ToolRegistry`] - Name -> tool dispatch table
//! - [`PlanExecutor`] - Settle-all concurrent execution of a plan
//! - [`derive_storage_plan`] - Freezes resolved generative actions into `applyCSS`
//! - [`origin_key`] - Registrable-domain partition key for stored rules
//! - [`AppliedStyleSet`] - Session-scoped de-duplication of injected stylesheets
//! - [`parse_json_response`] - Lenient JSON extraction from generation output

pub mod executor;
pub mod origin;
pub mod registry;
pub mod response;
pub mod styles;
pub mod transform;

pub use executor::PlanExecutor;
pub use origin::origin_key;
pub use registry::{RegistryError, ToolRegistry};
pub use response::parse_json_response;
pub use styles::AppliedStyleSet;
pub use transform::derive_storage_plan;
