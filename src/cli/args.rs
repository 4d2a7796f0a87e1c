use a2ui_kit::a2ui::InputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::prompt::ChatMode;

#[derive(Parser)]
#[command(name = "a2ui-demo")]
#[command(about = "Stream A2UI surfaces out of model responses and render them as text", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML config file; a missing file means defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, value_parser = ["error", "warn", "info", "debug", "trace"], default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stream a response into surfaces and print the resolved trees
    Render {
        /// Response file (stdin when omitted or "-")
        input: Option<PathBuf>,

        /// Stream shape: framed, openai or gemini
        #[arg(long, default_value = "framed")]
        format: InputFormat,

        /// Only render this surface
        #[arg(long)]
        surface: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Print surface events as they are applied
        #[arg(long)]
        watch: bool,
    },

    /// Tell whether a response is A2UI or plain markdown
    Detect {
        /// Response file (stdin when omitted or "-")
        input: Option<PathBuf>,
    },

    /// Show a markdown reply next to the A2UI rendering of the same answer
    Compare {
        /// Markdown-mode reply
        #[arg(long)]
        markdown: PathBuf,

        /// A2UI-mode reply
        #[arg(long)]
        a2ui: PathBuf,
    },

    /// Print the system prompt used for a chat mode
    Prompt {
        #[arg(long, default_value = "a2ui")]
        mode: ChatMode,
    },
}
