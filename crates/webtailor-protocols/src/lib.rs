//! # webtailor Protocols
//!
//! Core protocol definitions for the webtailor page customization engine.
//! Contains interface definitions and the shared data model only - no
//! implementations.
//!
//! ## Core Traits
//!
//! - [`Tool`] - A named page operation invoked by plans
//! - [`Document`] - The live document tools mutate
//! - [`SnapshotProvider`] - Builds the page description handed to generation
//! - [`GenerationClient`] - The external reasoning/generation service
//! - [`KeyValueStore`] - Durable key-value persistence
//!
//! ## Data Model
//!
//! - [`Action`] / [`ExecutionPlan`] - What planning produces
//! - [`ActionOutcome`] - What executing one action produced
//! - [`Rule`] - A persisted, replayable customization

pub mod document;
pub mod error;
pub mod persistence;
pub mod plan;
pub mod provider;
pub mod rule;
pub mod snapshot;
pub mod tool;

pub use document::{AddedNode, Document, ElementRef, MutationRecord, NodeId, PageLocation};
pub use error::{
    CommandError, DispatchError, DocumentError, GenerationError, PersistenceError,
    PlanParseError, ToolError,
};
pub use persistence::KeyValueStore;
pub use plan::{Action, ActionOutcome, CommandResult, ExecutionPlan, APPLY_CSS_TOOL};
pub use provider::GenerationClient;
pub use rule::Rule;
pub use snapshot::{
    ElementSample, PageContextSnapshot, PageStructure, SnapshotProvider, TextSample, Theme,
};
pub use tool::{ParameterKind, ParameterSpec, Tool, ToolDefinition, ToolKind, ToolOutput};
