use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub truncation: TruncationConfig,
    #[serde(default)]
    pub attachment: AttachmentConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Work area whose panes are enumerated as open documents
    #[serde(default = "default_main_area")]
    pub main_area: String,
    #[serde(default = "default_notebook_extension")]
    pub notebook_extension: String,
    #[serde(default = "default_mime_type")]
    pub default_mime_type: String,
    /// Suffixes stripped from the connection base address, first match wins
    #[serde(default = "default_api_suffixes")]
    pub api_suffixes: Vec<String>,
    /// Skips base-address derivation entirely when set
    #[serde(default)]
    pub workspace_root: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruncationConfig {
    #[serde(default = "default_max_cell_lines")]
    pub max_cell_lines: usize,
    #[serde(default = "default_truncation_marker")]
    pub marker: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentConfig {
    #[serde(default = "default_attachment_marker")]
    pub marker: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default = "default_max_listed_tabs")]
    pub max_listed_tabs: usize,
    #[serde(default = "default_source_preview_chars")]
    pub source_preview_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values
fn default_main_area() -> String {
    "main".to_string()
}

fn default_notebook_extension() -> String {
    "ipynb".to_string()
}

fn default_mime_type() -> String {
    "text/plain".to_string()
}

fn default_api_suffixes() -> Vec<String> {
    vec!["/api/contents".to_string(), "/api".to_string()]
}

fn default_max_cell_lines() -> usize {
    10
}

fn default_truncation_marker() -> String {
    "\n...(truncated)".to_string()
}

fn default_attachment_marker() -> String {
    "__active_context__".to_string()
}

fn default_max_listed_tabs() -> usize {
    5
}

fn default_source_preview_chars() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            main_area: default_main_area(),
            notebook_extension: default_notebook_extension(),
            default_mime_type: default_mime_type(),
            api_suffixes: default_api_suffixes(),
            workspace_root: None,
        }
    }
}

impl Default for TruncationConfig {
    fn default() -> Self {
        Self {
            max_cell_lines: default_max_cell_lines(),
            marker: default_truncation_marker(),
        }
    }
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            marker: default_attachment_marker(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            max_listed_tabs: default_max_listed_tabs(),
            source_preview_chars: default_source_preview_chars(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub async fn load(path: &str) -> Result<Self> {
        // Try to load from file first
        if let Ok(content) = tokio::fs::read_to_string(path).await {
            let mut config = Self::from_toml(&content)?;
            config.apply_env_overrides();
            return Ok(config);
        }

        // If no config file, use defaults and apply env overrides
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var("ACTIVE_CONTEXT_WORKSPACE_ROOT") {
            self.capture.workspace_root = Some(root);
        }
        if let Ok(lines) = std::env::var("ACTIVE_CONTEXT_MAX_CELL_LINES") {
            if let Ok(lines) = lines.parse() {
                self.truncation.max_cell_lines = lines;
            }
        }
        if let Ok(marker) = std::env::var("ACTIVE_CONTEXT_MARKER") {
            self.attachment.marker = marker;
        }
        if let Ok(level) = std::env::var("ACTIVE_CONTEXT_LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}
