//! Runtime configuration from `CAREGRAPH_*` environment variables.

use crate::dashboard::PipelineSettings;
use crate::error::DashboardError;
use crate::layout::LayoutConfig;
use crate::narrative::CompletionProvider;
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SOURCE: &str = "csv:data/edges.csv";
pub const DEFAULT_TABLE: &str = "EDGES";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq)]
pub enum SourceSpec {
    Csv(PathBuf),
    Sled(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub provider: CompletionProvider,
    pub base_url: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub source: SourceSpec,
    pub table: String,
    pub bind: String,
    pub llm: Option<LlmConfig>,
    pub settings: PipelineSettings,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, DashboardError> {
        let vars: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("CAREGRAPH_"))
            .collect();
        Self::from_vars(&vars)
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, DashboardError> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let source = parse_source(get("CAREGRAPH_SOURCE").unwrap_or(DEFAULT_SOURCE))?;

        let table = get("CAREGRAPH_TABLE").unwrap_or(DEFAULT_TABLE).to_string();
        validate_table_name(&table)?;

        let llm = match get("CAREGRAPH_LLM_PROVIDER").unwrap_or("none").to_lowercase().as_str() {
            "none" => None,
            "openai" => Some(CompletionProvider::OpenAi),
            "ollama" => Some(CompletionProvider::Ollama),
            other => {
                return Err(DashboardError::Config(format!(
                    "unknown CAREGRAPH_LLM_PROVIDER: {}",
                    other
                )))
            }
        }
        .map(|provider| LlmConfig {
            provider,
            base_url: get("CAREGRAPH_LLM_URL").map(String::from),
            model: get("CAREGRAPH_LLM_MODEL")
                .unwrap_or(match provider {
                    CompletionProvider::OpenAi => "gpt-4o-mini",
                    CompletionProvider::Ollama => "llama3",
                })
                .to_string(),
            api_key: get("CAREGRAPH_LLM_API_KEY").map(String::from),
        });

        let defaults = PipelineSettings::default();
        let settings = PipelineSettings {
            layout: LayoutConfig {
                seed: parse_num(get("CAREGRAPH_LAYOUT_SEED"), "CAREGRAPH_LAYOUT_SEED", defaults.layout.seed)?,
                iterations: parse_num(
                    get("CAREGRAPH_LAYOUT_ITERATIONS"),
                    "CAREGRAPH_LAYOUT_ITERATIONS",
                    defaults.layout.iterations,
                )?,
                k: defaults.layout.k,
            },
            top_k: parse_num(get("CAREGRAPH_TOP_K"), "CAREGRAPH_TOP_K", defaults.top_k)?,
            chart: defaults.chart,
            fetch_timeout: parse_timeout(
                get("CAREGRAPH_FETCH_TIMEOUT_SECS"),
                "CAREGRAPH_FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout,
            )?,
            narrative_timeout: parse_timeout(
                get("CAREGRAPH_LLM_TIMEOUT_SECS"),
                "CAREGRAPH_LLM_TIMEOUT_SECS",
                defaults.narrative_timeout,
            )?,
        };

        Ok(Self {
            source,
            table,
            bind: get("CAREGRAPH_BIND").unwrap_or(DEFAULT_BIND).to_string(),
            llm,
            settings,
        })
    }
}

fn parse_source(spec: &str) -> Result<SourceSpec, DashboardError> {
    if let Some(path) = spec.strip_prefix("csv:") {
        Ok(SourceSpec::Csv(PathBuf::from(path)))
    } else if let Some(path) = spec.strip_prefix("sled:") {
        Ok(SourceSpec::Sled(PathBuf::from(path)))
    } else {
        Err(DashboardError::Config(format!(
            "CAREGRAPH_SOURCE must start with csv: or sled:, got {}",
            spec
        )))
    }
}

/// Table names are plain identifiers, optionally schema-qualified.
pub fn validate_table_name(name: &str) -> Result<(), DashboardError> {
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .map_err(|e| DashboardError::Config(e.to_string()))?;
    if re.is_match(name) {
        Ok(())
    } else {
        Err(DashboardError::Config(format!("invalid table name: {}", name)))
    }
}

fn parse_num<T: std::str::FromStr>(value: Option<&str>, key: &str, default: T) -> Result<T, DashboardError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| DashboardError::Config(format!("{} must be a number, got {}", key, v))),
    }
}

/// Whole seconds, at least one.
fn parse_timeout(value: Option<&str>, key: &str, default: Duration) -> Result<Duration, DashboardError> {
    match parse_num(value, key, default.as_secs())? {
        0 => Err(DashboardError::Config(format!("{} must be at least 1", key))),
        secs => Ok(Duration::from_secs(secs)),
    }
}
