//! # webtailor Runtime
//!
//! Drives the core against one live document.
//!
//! ## Components
//!
//! - [`PageContextCache`] - TTL cache in front of the snapshot provider
//! - [`Planner`] - Natural-language command -> execution plan
//! - [`ReplayController`] - Re-executes stored rules on a fresh load
//! - [`MutationWatch`] - Debounced replay after structural DOM changes
//! - [`Customizer`] - The host command surface and initialization state machine

pub mod context_cache;
pub mod customizer;
pub mod planner;
pub mod replay;
pub mod watch;

#[cfg(test)]
mod testing;

pub use context_cache::PageContextCache;
pub use customizer::{
    Customizer, CustomizerConfig, CustomizerDeps, InitState, PERSISTENCE_KEYWORDS,
    effective_command, should_persist,
};
pub use planner::{Planner, build_prompt};
pub use replay::{DEFAULT_STALENESS_DAYS, ReplayController, ReplaySummary, effective_rules};
pub use watch::{MutationWatch, is_significant};
