use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::scan::scan_config::ScanConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "ng-locator-scan",
    version,
    about = "Extract field and button locators from rendered AngularJS pages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: ng-locator-scan.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append scan decisions to this JSONL file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

/// Where the page comes from. Exactly one of the two is required.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Saved HTML page (rendered DOM)
    #[arg(long, value_name = "PATH")]
    pub html: Option<String>,

    /// URL to fetch; the response body is parsed as is
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only scan under elements matching this CSS selector (repeatable, scanned in order)
    #[arg(long = "root", value_name = "CSS")]
    pub roots: Vec<String>,

    /// Extend the descriptors of an earlier scan instead of starting empty
    #[arg(long, value_name = "FILE")]
    pub merge: Option<String>,

    /// Output file ("-" for stdout; default from config)
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan tabs, sections and form fields into field descriptors
    Fields(ScanArgs),

    /// Scan buttons into unique, duplicate and manual buckets
    Buttons(ScanArgs),

    /// Evaluate an XPath expression and print the matching elements
    Xpath {
        #[command(flatten)]
        source: SourceArgs,

        /// XPath expression
        #[arg(long)]
        expr: String,

        /// Evaluate relative to the first element matching this CSS selector
        #[arg(long, value_name = "CSS")]
        base: Option<String>,
    },

    /// Check that every locator of a descriptor file resolves in a page
    Verify {
        #[command(flatten)]
        source: SourceArgs,

        /// Field descriptor file (fieldData.json)
        #[arg(long, value_name = "FILE")]
        descriptors: String,

        /// Report format (default from config)
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Console,
    Junit,
    Json,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

pub const DEFAULT_CONFIG_FILE: &str = "ng-locator-scan.yaml";

/// Optional YAML config file: `ng-locator-scan.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_fields_file")]
    pub fields_file: String,

    #[serde(default = "default_buttons_file")]
    pub buttons_file: String,

    #[serde(default)]
    pub report_format: ReportFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            fields_file: default_fields_file(),
            buttons_file: default_buttons_file(),
            report_format: ReportFormat::Console,
        }
    }
}

// Serde default helpers
fn default_fields_file() -> String { "fieldData.json".to_string() }
fn default_buttons_file() -> String { "buttons.json".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content),
        Err(_) => AppConfig::default(),
    }
}

pub fn parse_config(yaml: &str) -> AppConfig {
    match serde_yaml::from_str::<Option<AppConfig>>(yaml) {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "malformed config file, using defaults");
            AppConfig::default()
        }
    }
}
