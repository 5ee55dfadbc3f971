use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use manual_tags::{DeviceMapping, VectorStoreId};
use manual_tags_openai::OpenAiClientConfig;
use serde::{Deserialize, Serialize};

/// Vector store holding the service manuals.
const DEFAULT_VECTOR_STORE_ID: &str = "vs_6910dedb369c81918640e1f1b97ae027";

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_PAGE_SIZE: u32 = 100;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub vector_store_id: Option<String>,
    pub api_base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// File name → device identifier.
    #[serde(default)]
    pub tags: DeviceMapping,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Built-in device table for the manuals currently in the store.
pub fn default_tags() -> DeviceMapping {
    DeviceMapping::from_iter([
        ("foresight_elite.pdf", "CASMED-FORESIGHT-ELITE"),
        ("Service Manual Nico2.pdf", "NICO2"),
        ("Service Manual Nellcor N-395.pdf", "Nellcor-N-395"),
    ])
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            vector_store_id: Some(DEFAULT_VECTOR_STORE_ID.into()),
            api_base_url: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            tags: default_tags(),
        }
    }
}

impl AppConfig {
    /// The store to operate on: the command-line override if given,
    /// otherwise the configured one.
    pub fn resolve_store(&self, cli_override: Option<&str>) -> Result<VectorStoreId> {
        let id = cli_override
            .or(self.vector_store_id.as_deref())
            .map(VectorStoreId::new)
            .context("no vector store configured; pass --vector-store or set vector_store_id")?;

        if id.is_empty() {
            anyhow::bail!("vector store id must not be empty");
        }

        Ok(id)
    }

    /// Client settings. `env_base_url` (from `OPENAI_BASE_URL`) is used only
    /// when the config file does not name a base URL.
    pub fn client_config(&self, api_key: String, env_base_url: Option<String>) -> OpenAiClientConfig {
        let mut config = OpenAiClientConfig::new(api_key);
        config.api_base_url = self.api_base_url.clone().or(env_base_url);
        config.request_timeout = Duration::from_secs(self.request_timeout_secs.max(1));
        config.page_size = self.page_size;
        config
    }
}

/// Config file path: `~/.config/manual-tagger/tags.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("manual-tagger").join("tags.toml"))
}

/// Load config from an explicit path, or from the default location with a
/// fallback to built-in defaults.
///
/// An explicit path must exist and parse. The default file is optional; if it
/// is present but malformed a warning is printed and defaults are used.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        return toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()));
    }

    if let Some(path) = config_path()
        && let Ok(contents) = std::fs::read_to_string(&path)
    {
        if let Ok(config) = toml::from_str::<AppConfig>(&contents) {
            tracing::debug!(path = %path.display(), "loaded config");
            return Ok(config);
        }
        eprintln!(
            "warning: failed to parse config at {}, using defaults",
            path.display()
        );
    }

    Ok(AppConfig::default())
}
