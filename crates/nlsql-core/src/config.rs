use crate::errors::ConfigError;
use crate::executor::StatementExecutor;
use crate::orchestrator::Orchestrator;
use crate::providers::llm::{ollama, FakeClient, LlmClient, OllamaClient, OpenAIClient};
use crate::sanitize::FenceStrategy;
use crate::schema::SchemaDescriptor;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub mod path_resolver;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;
pub const DEFAULT_CONFIG_FILE: &str = "nlsql.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub version: u32,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub schema: SchemaSource,
    /// JSONL file the interaction log is appended to.
    #[serde(default)]
    pub history: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Ollama,
    Openai,
    Fake,
}

impl std::str::FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "openai" => Ok(ProviderKind::Openai),
            "fake" => Ok(ProviderKind::Fake),
            other => Err(ConfigError(format!(
                "unknown provider '{}' (expected ollama|openai|fake)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
    pub model: Option<String>,
    pub base_url: Option<String>,
    /// Environment variable holding the API key (openai only).
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Scripted completions for the fake provider.
    #[serde(default)]
    pub responses: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub fence_strategy: FenceStrategy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaSource {
    /// Custom description text, used verbatim.
    pub file: Option<String>,
    /// Describe whatever tables the database holds instead of the built-in
    /// students description.
    #[serde(default)]
    pub introspect: bool,
}

fn default_database() -> String {
    "students.db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            database: default_database(),
            provider: ProviderConfig::default(),
            settings: Settings::default(),
            schema: SchemaSource::default(),
            history: None,
            log_level: default_log_level(),
        }
    }
}

pub fn load_config(path: &Path, strict: bool) -> Result<AppConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;

    let mut ignored_keys = std::collections::BTreeSet::new();
    let deserializer = serde_yaml::Deserializer::from_str(&raw);
    let mut cfg: AppConfig = serde_ignored::deserialize(deserializer, |p| {
        ignored_keys.insert(p.to_string());
    })
    .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;

    let unknown: Vec<_> = ignored_keys
        .into_iter()
        .filter(|k| !k.starts_with('_') && !k.starts_with("x-"))
        .collect();
    if !unknown.is_empty() {
        if strict {
            return Err(ConfigError(format!(
                "Unknown fields detected in strict mode: {:?} (file: {})",
                unknown,
                path.display()
            )));
        }
        tracing::warn!(event = "config.unknown_fields", fields = ?unknown, file = %path.display());
    }

    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(ConfigError(format!(
            "unsupported config version {} (supported: {})",
            cfg.version, SUPPORTED_CONFIG_VERSION
        )));
    }

    normalize_paths(&mut cfg, path);
    Ok(cfg)
}

/// Like [`load_config`], but a missing file means defaults.
pub fn load_or_default(path: &Path, strict: bool) -> Result<AppConfig, ConfigError> {
    if path.exists() {
        load_config(path, strict)
    } else {
        tracing::debug!(event = "config.defaults", missing = %path.display());
        Ok(AppConfig::default())
    }
}

fn normalize_paths(cfg: &mut AppConfig, config_path: &Path) {
    let r = path_resolver::PathResolver::new(config_path);
    r.resolve_str(&mut cfg.database);
    r.resolve_opt_str(&mut cfg.schema.file);
    r.resolve_opt_str(&mut cfg.history);
}

impl AppConfig {
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|k| std::env::var(k).ok())
    }

    /// `NLSQL_DB`, `NLSQL_PROVIDER`, `NLSQL_MODEL`, `NLSQL_TIMEOUT_SECS`, `NLSQL_LOG`.
    pub fn apply_overrides<F>(&mut self, get: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = get("NLSQL_DB") {
            self.database = v;
        }
        if let Some(v) = get("NLSQL_PROVIDER") {
            self.provider.kind = v.parse()?;
        }
        if let Some(v) = get("NLSQL_MODEL") {
            self.provider.model = Some(v);
        }
        if let Some(v) = get("NLSQL_TIMEOUT_SECS") {
            let n = v
                .parse()
                .map_err(|_| ConfigError(format!("NLSQL_TIMEOUT_SECS is not a number: {}", v)))?;
            self.settings.timeout_seconds = Some(n);
        }
        if let Some(v) = get("NLSQL_LOG") {
            self.log_level = v;
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database)
    }

    pub fn completion_timeout(&self) -> Option<Duration> {
        self.settings
            .timeout_seconds
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
    }

    pub fn build_client(&self) -> anyhow::Result<Arc<dyn LlmClient>> {
        let p = &self.provider;
        let client: Arc<dyn LlmClient> = match p.kind {
            ProviderKind::Ollama => {
                let mut c = OllamaClient::new(
                    p.model.clone().unwrap_or_else(|| ollama::DEFAULT_MODEL.to_string()),
                    p.base_url
                        .clone()
                        .unwrap_or_else(|| ollama::DEFAULT_BASE_URL.to_string()),
                );
                c.temperature = p.temperature;
                Arc::new(c)
            }
            ProviderKind::Openai => {
                let var = p.api_key_env.as_deref().unwrap_or("OPENAI_API_KEY");
                let key = std::env::var(var)
                    .with_context(|| format!("openai provider needs ${} to be set", var))?;
                let mut c = OpenAIClient::new(
                    p.model.clone().unwrap_or_else(|| "gpt-4o-mini".to_string()),
                    key,
                    p.temperature.unwrap_or(0.0),
                    p.max_tokens.unwrap_or(512),
                );
                if let Some(url) = &p.base_url {
                    c = c.with_base_url(url.clone());
                }
                Arc::new(c)
            }
            ProviderKind::Fake => Arc::new(FakeClient::new(p.responses.clone())),
        };
        Ok(client)
    }

    pub fn load_schema(&self) -> anyhow::Result<SchemaDescriptor> {
        if let Some(file) = &self.schema.file {
            return SchemaDescriptor::from_file(Path::new(file));
        }
        if self.schema.introspect {
            return SchemaDescriptor::introspect(&self.database_path());
        }
        Ok(SchemaDescriptor::students())
    }

    pub fn build_orchestrator(&self) -> anyhow::Result<Orchestrator> {
        let client = self.build_client()?;
        let schema = self.load_schema()?;
        Ok(
            Orchestrator::new(client, StatementExecutor::new(self.database_path()), schema)
                .with_fence_strategy(self.settings.fence_strategy)
                .with_completion_timeout(self.completion_timeout()),
        )
    }
}

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(
        path,
        r#"version: 1
database: students.db
provider:
  kind: ollama
  model: mistral
  base_url: http://localhost:11434
settings:
  timeout_seconds: 120
  fence_strategy: leading_keyword
schema:
  introspect: false
history: .nlsql/history.jsonl
log_level: info
"#,
    )
    .map_err(|e| ConfigError(format!("failed to write sample config: {}", e)))?;
    Ok(())
}
