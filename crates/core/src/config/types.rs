use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

use crate::exclusion::ExclusionConfig;
use crate::export::ReadErrorPolicy;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub vault_root: String,
    /// Where archives go when no explicit output path is given.
    #[serde(default)]
    pub output_dir: Option<String>,
}

/// The `[export]` table.
///
/// Every list accepts either a TOML array or a single comma-separated string.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ExportSettings {
    #[serde(default, deserialize_with = "deserialize_list")]
    pub excluded_frontmatter_keys: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub excluded_headers: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub excluded_folders: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub excluded_files: Vec<String>,
    #[serde(default)]
    pub on_read_error: ReadErrorPolicy,
}

impl ExportSettings {
    pub fn exclusion_config(&self) -> ExclusionConfig {
        ExclusionConfig {
            frontmatter_keys: self.excluded_frontmatter_keys.clone(),
            headers: self.excluded_headers.clone(),
            folders: self.excluded_folders.clone(),
            files: self.excluded_files.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringList {
    Joined(String),
    Items(Vec<String>),
}

fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringList::deserialize(deserializer)? {
        StringList::Joined(s) => split_list(&s),
        StringList::Items(items) => items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    })
}

/// Split a comma-separated setting into trimmed, non-empty items.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub vault_root: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub exclusions: ExclusionConfig,
    pub on_read_error: ReadErrorPolicy,
    pub logging: LoggingConfig,
}
