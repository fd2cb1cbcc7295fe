//! The refresh pipeline.
//!
//! fetch → validate → build graph → layout → analytics → summaries.
//! Snapshots are cached per source identity; the narrative is requested
//! on demand and never cached.

use crate::analytics::{analyze, most_connected};
use crate::cache::SnapshotCache;
use crate::chart::{network_chart, ChartSize};
use crate::error::{DashboardError, DashboardResult, DataFetchError};
use crate::graph::{build_graph, Graph};
use crate::layout::{spring_layout, LayoutConfig};
use crate::models::{EdgeTable, Layout, Metrics, Narrative, NetworkChart, RankedNode};
use crate::narrative::{build_prompt, fallback_summary, narrate, summarize, NarrativeRequest, NarrativeService};
use crate::source::{export_csv, validate_edges, EdgeSource};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    pub layout: LayoutConfig,
    pub top_k: usize,
    pub chart: ChartSize,
    pub fetch_timeout: Duration,
    pub narrative_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            top_k: 5,
            chart: ChartSize::default(),
            fetch_timeout: Duration::from_secs(15),
            narrative_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub source_identity: String,
    pub table_name: String,
    pub loaded_at: DateTime<Utc>,
    #[serde(skip)]
    pub table: EdgeTable,
    pub graph: Graph,
    pub layout: Layout,
    pub chart: NetworkChart,
    pub metrics: Metrics,
    pub top_nodes: Vec<RankedNode>,
    pub summary: String,
    pub local_summary: String,
}

/// Everything after the fetch. Pure apart from the timestamp.
pub fn build_snapshot(
    source_identity: &str,
    table_name: &str,
    table: EdgeTable,
    settings: &PipelineSettings,
) -> DashboardResult<DashboardSnapshot> {
    let edges = validate_edges(&table, table_name)?;
    let graph = build_graph(&edges);
    let layout = spring_layout(&graph, &settings.layout);
    let metrics = analyze(&graph);
    let top_nodes = most_connected(&graph, &metrics, settings.top_k);
    let chart = network_chart(&graph, &layout, &metrics, settings.chart);
    let summary = summarize(&graph, &metrics, &top_nodes);
    let local_summary = fallback_summary(&metrics, &top_nodes);

    Ok(DashboardSnapshot {
        source_identity: source_identity.to_string(),
        table_name: table_name.to_string(),
        loaded_at: Utc::now(),
        table,
        graph,
        layout,
        chart,
        metrics,
        top_nodes,
        summary,
        local_summary,
    })
}

/// Runs the blocking source read off the async runtime, bounded by `timeout`.
pub async fn fetch_table(
    source: Arc<dyn EdgeSource>,
    timeout: Duration,
) -> Result<EdgeTable, DataFetchError> {
    let task = tokio::task::spawn_blocking(move || source.fetch());
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(DataFetchError::Unreachable(format!(
            "fetch task failed: {}",
            join_err
        ))),
        Err(_) => Err(DataFetchError::Timeout(timeout)),
    }
}

pub struct Dashboard {
    source: Arc<dyn EdgeSource>,
    narrator: Arc<dyn NarrativeService>,
    cache: SnapshotCache<DashboardSnapshot>,
    settings: PipelineSettings,
}

impl Dashboard {
    pub fn new(
        source: Arc<dyn EdgeSource>,
        narrator: Arc<dyn NarrativeService>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            source,
            narrator,
            cache: SnapshotCache::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn source_identity(&self) -> String {
        self.source.identity()
    }

    pub fn narrator_name(&self) -> &str {
        self.narrator.name()
    }

    /// Cached snapshot, computed on first use.
    pub async fn snapshot(&self) -> DashboardResult<Arc<DashboardSnapshot>> {
        let identity = self.source.identity();
        self.cache
            .get_or_try_compute(&identity, || self.compute(&identity))
            .await
    }

    /// Drops every cached snapshot and recomputes.
    pub async fn refresh(&self) -> DashboardResult<Arc<DashboardSnapshot>> {
        info!(source = %self.source.identity(), "refresh requested, invalidating cache");
        self.cache.invalidate().await;
        self.snapshot().await
    }

    async fn load(&self, identity: &str) -> DashboardResult<DashboardSnapshot> {
        let table = fetch_table(Arc::clone(&self.source), self.settings.fetch_timeout).await?;
        build_snapshot(identity, self.source.table_name(), table, &self.settings)
    }

    async fn compute(&self, identity: &str) -> DashboardResult<DashboardSnapshot> {
        let result = self.load(identity).await;
        match &result {
            Ok(snapshot) => info!(
                source = identity,
                nodes = snapshot.metrics.node_count,
                edges = snapshot.metrics.edge_count,
                "dashboard snapshot built"
            ),
            Err(e) => error!(source = identity, error = %e, "refresh aborted"),
        }
        result
    }

    /// One completion attempt for the current snapshot. Service failures
    /// come back as a fallback narrative, not as an error.
    pub async fn narrative(&self) -> DashboardResult<(Arc<DashboardSnapshot>, Narrative)> {
        let snapshot = self.snapshot().await?;
        let request = NarrativeRequest {
            prompt: build_prompt(&snapshot.summary),
            local_summary: snapshot.local_summary.clone(),
        };
        let narrative = narrate(self.narrator.as_ref(), &request, self.settings.narrative_timeout).await;
        Ok((snapshot, narrative))
    }

    /// The original table as comma-separated text.
    pub async fn export_csv(&self) -> DashboardResult<String> {
        let snapshot = self.snapshot().await?;
        export_csv(&snapshot.table).map_err(|e| DashboardError::Export(e.to_string()))
    }

    pub fn generate_report(&self) -> DashboardResult<()> {
        Err(DashboardError::ReportUnavailable)
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;
