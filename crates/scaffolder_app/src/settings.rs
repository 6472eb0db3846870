use std::fs;
use std::path::Path;

use scaffold_logging::scaffold_warn;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILENAME: &str = "scaffolder.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub platform_base_url: String,
    pub code_host_base_url: String,
    pub poll_interval_ms: u64,
    /// `None` keeps polling until the server reports a terminal step.
    pub max_poll_attempts: Option<u32>,
    /// Optional template search to run after the feeds load.
    pub search_query: Option<String>,
    /// Optional scaffold job to drive end to end.
    pub scaffold: Option<ScaffoldJob>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldJob {
    pub template_owner: String,
    pub template_name: String,
    pub destination_name: String,
    #[serde(default)]
    pub replacements: Vec<(String, String)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            platform_base_url: "http://localhost:64736".to_string(),
            code_host_base_url: "https://api.github.com".to_string(),
            poll_interval_ms: 1000,
            max_poll_attempts: None,
            search_query: None,
            scaffold: None,
        }
    }
}

pub fn load_settings(path: &Path) -> Settings {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Settings::default();
        }
        Err(err) => {
            scaffold_warn!("Failed to read settings from {:?}: {}", path, err);
            return Settings::default();
        }
    };
    match ron::from_str(&content) {
        Ok(settings) => settings,
        Err(err) => {
            scaffold_warn!("Failed to parse settings from {:?}: {}", path, err);
            Settings::default()
        }
    }
}
