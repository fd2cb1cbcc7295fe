//! Care network dashboard library - re-exports for testing and external use.
//!
//! The pipeline reads an edge table, builds an undirected graph of
//! patients, doctors, conditions and insurers, lays it out, computes
//! descriptive statistics and asks a completion service for a narrative.
//!
//! - `source`: edge table adapters (delimited files, sled tables)
//! - `classify`, `graph`, `layout`, `analytics`: the graph pipeline
//! - `narrative`: summaries and the completion service seam
//! - `dashboard`: orchestration and the snapshot cache
//! - `handlers`, `templates`, `chart`: the web front end

use std::sync::Arc;

use tracing::info;

pub mod analytics;
pub mod cache;
pub mod chart;
pub mod classify;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod graph;
pub mod handlers;
pub mod layout;
pub mod models;
pub mod narrative;
pub mod source;
pub mod templates;
pub mod url_validator;

use config::{DashboardConfig, SourceSpec};
use dashboard::Dashboard;
use error::DashboardError;
use narrative::{CompletionClient, LocalNarrative, NarrativeService};
use source::{CsvFileSource, EdgeSource, SledTableSource};

// ============================================================================
// Application State
// ============================================================================

pub struct AppState {
    pub dashboard: Dashboard,
    pub config: DashboardConfig,
}

impl AppState {
    pub fn from_config(config: DashboardConfig) -> Result<Self, DashboardError> {
        let source = open_source(&config);
        let narrator = open_narrator(&config)?;
        info!(
            source = %source.identity(),
            narrator = narrator.name(),
            "dashboard state ready"
        );
        Ok(Self {
            dashboard: Dashboard::new(source, narrator, config.settings),
            config,
        })
    }

    pub fn with_dashboard(dashboard: Dashboard, config: DashboardConfig) -> Self {
        Self { dashboard, config }
    }
}

/// Sources do no I/O here; the first refresh reports an unreachable store.
fn open_source(config: &DashboardConfig) -> Arc<dyn EdgeSource> {
    match &config.source {
        SourceSpec::Csv(path) => Arc::new(CsvFileSource::new(path).with_name(&config.table)),
        SourceSpec::Sled(path) => Arc::new(SledTableSource::new(path, &config.table)),
    }
}

fn open_narrator(config: &DashboardConfig) -> Result<Arc<dyn NarrativeService>, DashboardError> {
    match &config.llm {
        None => Ok(Arc::new(LocalNarrative)),
        Some(llm) => {
            let client = CompletionClient::new(
                llm.provider,
                llm.base_url.as_deref(),
                &llm.model,
                llm.api_key.clone(),
                config.settings.narrative_timeout,
            )?;
            Ok(Arc::new(client))
        }
    }
}

// Re-export commonly used types
pub use models::{
    Category, EdgeRecord, EdgeTable, Layout, Metrics, Narrative, NarrativeSource, NetworkChart,
    Position, RankedNode,
};

pub use error::{DataFetchError, InputShapeError, NarrativeError};

pub use graph::{build_graph, Graph, GraphEdge, GraphNode};

pub use classify::classify;

pub use layout::{spring_layout, LayoutConfig};

pub use analytics::{analyze, most_connected};

pub use narrative::{build_prompt, fallback_summary, narrate, summarize, NarrativeRequest};

pub use dashboard::{build_snapshot, DashboardSnapshot, PipelineSettings};

pub use source::{export_csv, import_csv_into_table, validate_edges, write_table};

pub use url_validator::{validate_endpoint_url, UrlValidationError};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> DashboardConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashboardConfig::from_vars(&vars).unwrap()
    }

    #[test]
    fn test_state_defaults_to_local_narrative() {
        let state = AppState::from_config(config(&[("CAREGRAPH_SOURCE", "csv:data/edges.csv")])).unwrap();
        assert_eq!(state.dashboard.narrator_name(), "local");
        assert_eq!(state.dashboard.source_identity(), "csv:data/edges.csv");
    }

    #[test]
    fn test_state_with_ollama() {
        let state = AppState::from_config(config(&[("CAREGRAPH_LLM_PROVIDER", "ollama")])).unwrap();
        assert_ne!(state.dashboard.narrator_name(), "local");
    }

    #[test]
    fn test_openai_without_key_is_rejected() {
        let result = AppState::from_config(config(&[("CAREGRAPH_LLM_PROVIDER", "openai")]));
        assert!(matches!(result, Err(DashboardError::Narrative(NarrativeError::Unavailable(_)))));
    }

    #[test]
    fn test_sled_source_opens_table() {
        let dir = tempfile::tempdir().unwrap();
        let source = format!("sled:{}", dir.path().join("db").display());
        let state = AppState::from_config(config(&[
            ("CAREGRAPH_SOURCE", source.as_str()),
            ("CAREGRAPH_TABLE", "CLINIC_EDGES"),
        ]))
        .unwrap();
        assert!(state.dashboard.source_identity().ends_with("CLINIC_EDGES"));
    }
}
