//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use vstudio_models::PrivacyStatus;

#[derive(Parser, Debug)]
#[command(name = "vstudio")]
#[command(about = "Manage AI video projects and publish them to YouTube", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON file of runtime-injected settings (VITE_API_BASE_URL, ...)
    #[arg(long, env = "STUDIO_RUNTIME_CONFIG", global = true)]
    pub runtime_config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List projects
    Projects {
        /// Status filter ("all" or a status such as video_ready)
        #[arg(long, default_value = "all")]
        status: String,

        #[arg(long, default_value = "")]
        search: String,
    },

    /// Show one project in the editor view
    Show {
        id: String,

        /// Tab whose preview is shown
        #[arg(long, default_value = "script")]
        tab: String,
    },

    /// Create a project
    New {
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        use_case: Option<String>,
    },

    /// Merge fields into a project and save it
    Edit {
        id: String,

        /// `key=value`; values that parse as JSON are used as such
        #[arg(long = "set", value_name = "KEY=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Delete a project
    Delete {
        id: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Run a generation stage
    Generate {
        /// Project id, or `new` for an unsaved draft
        id: String,

        #[arg(value_enum)]
        target: TargetArg,

        /// 1-based scene number for `scene`
        #[arg(long)]
        scene: Option<usize>,

        /// Save the project after a successful generation
        #[arg(long)]
        save: bool,
    },

    /// YouTube account connection
    Youtube {
        #[command(subcommand)]
        action: YoutubeAction,
    },

    /// Upload a rendered video, optionally scheduling it
    Publish {
        id: String,

        /// Publication time (`YYYY-MM-DDTHH:MM` UTC or RFC 3339)
        #[arg(long)]
        at: Option<String>,

        #[arg(long)]
        premiere: bool,

        /// Visibility once the scheduled time is reached
        #[arg(long, value_parser = parse_privacy, default_value = "public")]
        privacy: PrivacyStatus,
    },

    /// Schedule an already uploaded video
    Schedule {
        id: String,

        #[arg(long)]
        at: String,

        #[arg(long)]
        premiere: bool,

        #[arg(long, value_parser = parse_privacy, default_value = "public")]
        privacy: PrivacyStatus,
    },

    /// Push the project thumbnail to its YouTube video
    Thumbnail { id: String },

    /// Edit YouTube title, description and tags
    Metadata {
        id: String,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Comma-separated
        #[arg(long, default_value = "")]
        tags: String,
    },

    /// Resolve an application route
    Open { route: String },

    /// Settings page
    Settings,

    /// Pro plan page
    Pro,
}

#[derive(Subcommand, Debug)]
pub enum YoutubeAction {
    Status,
    /// Print the OAuth URL to open
    Connect,
    Disconnect,
    /// Handle the query string of the OAuth redirect
    Callback { query: String },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetArg {
    Script,
    Audio,
    Images,
    Scene,
    Video,
    Description,
}

fn parse_privacy(raw: &str) -> Result<PrivacyStatus, String> {
    raw.parse()
}

/// Split `key=value`, reading the value as JSON when it parses.
pub fn parse_assignment(raw: &str) -> anyhow::Result<(String, serde_json::Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected KEY=VALUE, got {:?}", raw))?;
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("empty key in {:?}", raw);
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
