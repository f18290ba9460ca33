use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::template::extractor::CallHandling;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "formwright",
    version,
    about = "Turn form field lists and text templates into interview definitions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: formwright.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a fillable form's raw field list (JSON) into interview blocks
    Fields {
        /// Path to the introspected field list, one tuple per field
        #[arg(long)]
        input: String,

        /// Optional YAML file of screen groupings
        #[arg(long)]
        screens: Option<String>,

        /// Document name used in the binding block
        #[arg(long, default_value = "document")]
        doc_name: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Extract and resolve a text template's variable references
    Template {
        /// Path to the template source text
        #[arg(long)]
        input: String,

        /// Keep call expressions with a trailing () marker
        #[arg(long)]
        retain_calls: bool,

        /// Also report references wrapped in this filter (signature lines)
        #[arg(long)]
        signature_filter: Option<String>,

        /// Document name used in the binding block
        #[arg(long, default_value = "document")]
        doc_name: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show how labels canonicalize (developer aid)
    Resolve {
        /// Labels to canonicalize
        labels: Vec<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `formwright.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tenant-declared custom person collections (plural names).
    #[serde(default)]
    pub people: Vec<String>,

    /// Call handling for template extraction: discard or retain.
    #[serde(default = "default_calls")]
    pub calls: String,

    /// Estimated character capacity above which a text widget is asked
    /// as a multi-line area.
    #[serde(default = "default_area_threshold")]
    pub area_threshold: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            people: Vec::new(),
            calls: default_calls(),
            area_threshold: default_area_threshold(),
        }
    }
}

fn default_calls() -> String {
    "discard".to_string()
}

fn default_area_threshold() -> usize {
    100
}

impl AppConfig {
    pub fn call_handling(&self) -> CallHandling {
        match self.calls.as_str() {
            "retain" => CallHandling::Retain,
            _ => CallHandling::Discard,
        }
    }
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or
/// malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("formwright.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}
