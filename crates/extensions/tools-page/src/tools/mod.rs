//! Page customization tools.
//!
//! Static tools apply exactly their parameters. Generative tools call the
//! generation service and report the stylesheet they produced under `css`
//! so the result can be frozen into a replayable `applyCSS` action.

mod content;
mod style;

pub use content::*;
pub use style::*;

pub const GENERATE_CSS_TOOL: &str = "generateCSS";
pub const HIDE_ELEMENTS_TOOL: &str = "hideElements";
pub const TRANSFORM_LAYOUT_TOOL: &str = "transformLayout";
pub const SELECT_ELEMENTS_TOOL: &str = "selectElements";
pub const MODIFY_TEXT_TOOL: &str = "modifyText";
pub const SUMMARIZE_CONTENT_TOOL: &str = "summarizeContent";
