use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::pipeline::{DEFAULT_REQUEST_TIMEOUT, PipelineOptions};

/// Project configuration loaded from `.pyclient.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PyclientConfig {
    /// Directory the client package is created in.
    pub output_dir: PathBuf,
    /// Timeout for downloading a spec, in seconds.
    pub fetch_timeout: u64,
    pub client: ClientConfig,
    pub post_process: PostProcessConfig,
}

impl Default for PyclientConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            fetch_timeout: 15,
            client: ClientConfig::default(),
            post_process: PostProcessConfig::default(),
        }
    }
}

impl PyclientConfig {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            base_url: self.client.base_url.clone(),
            request_timeout: self.client.request_timeout,
        }
    }
}

/// Options baked into the generated client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Overrides the first `servers` entry as the default base URL.
    pub base_url: Option<String>,
    /// Default per-request timeout of the generated transport, in seconds.
    pub request_timeout: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostProcessConfig {
    /// Run `ruff check --fix` and `ruff format` over the generated package.
    pub ruff: bool,
    /// Keep `api-spec.json` next to the generated package.
    pub keep_spec: bool,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            ruff: true,
            keep_spec: false,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".pyclient.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<PyclientConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config = serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# pyclient configuration
output_dir: .
fetch_timeout: 15       # seconds allowed for downloading a spec

client:
  # base_url: https://api.example.com   # defaults to the first `servers` entry
  request_timeout: 15   # seconds, baked into utils/request_base.py

post_process:
  ruff: true            # run `ruff check --fix` and `ruff format` when ruff is installed
  keep_spec: false      # keep api-spec.json next to the generated client
"#
}
