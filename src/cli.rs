//! CLI definitions for webtailor.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// webtailor CLI.
#[derive(Parser)]
#[command(name = "webtailor")]
#[command(about = "Rule cache and replay engine for AI page customization")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.webtailor/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run a natural-language command against a page fixture
    Run {
        /// JSON page fixture ({url, title, body})
        #[arg(long)]
        page: PathBuf,

        /// Do not prefix the stored global prompt
        #[arg(long)]
        no_global: bool,

        /// The command, e.g. "always hide ads on this site"
        #[arg(required = true, trailing_var_arg = true)]
        command: Vec<String>,
    },

    /// Replay the stored rules for the fixture's site
    Replay {
        /// JSON page fixture ({url, title, body})
        #[arg(long)]
        page: PathBuf,
    },

    /// Invoke a single tool directly
    Tool {
        /// JSON page fixture ({url, title, body})
        #[arg(long)]
        page: PathBuf,

        /// Tool name, e.g. applyCSS
        name: String,

        /// Tool parameters as a JSON object
        #[arg(long, default_value = "{}")]
        params: String,
    },

    /// Stored rule management
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Print the origin key rules for a host are stored under
    Origin {
        /// Host name, e.g. news.bbc.co.uk
        host: String,
    },

    /// Global prompt management
    GlobalPrompt {
        #[command(subcommand)]
        action: GlobalPromptAction,
    },

    /// Store the generation API key
    ApiKey {
        key: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum RulesAction {
    /// List stored rules, for one site or all of them
    List {
        /// Any URL of the site
        #[arg(long)]
        url: Option<String>,
    },

    /// Forget every rule stored for a site
    Clear {
        /// Any URL of the site
        #[arg(long)]
        url: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum GlobalPromptAction {
    /// Replace the global prompt
    Set {
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Print the global prompt
    Show,

    /// Run the global prompt on its own against a page fixture
    Apply {
        #[arg(long)]
        page: PathBuf,
    },
}
