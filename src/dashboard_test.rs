//! Tests for the refresh pipeline.
//!
//! Sources are in-memory or temp-file backed and the narrative services are
//! local stubs, so nothing here touches the network.

use super::*;
use crate::error::{InputShapeError, NarrativeError};
use crate::models::{Category, NarrativeSource};
use crate::narrative::{LocalNarrative, NarrativeResult};
use crate::source::CsvFileSource;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// Helpers
// ============================================================================

/// In-memory source that counts fetches.
struct MemorySource {
    table: EdgeTable,
    fetches: AtomicUsize,
    delay: Option<Duration>,
}

impl MemorySource {
    fn new(columns: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            table: EdgeTable {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows: rows
                    .iter()
                    .map(|r| r.iter().map(|c| c.to_string()).collect())
                    .collect(),
            },
            fetches: AtomicUsize::new(0),
            delay: None,
        }
    }

    fn example() -> Self {
        Self::new(
            &["SOURCE", "TARGET", "RELATIONSHIP"],
            &[
                &["A", "B", "TREATED_BY"],
                &["B", "C", "HAS_INSURANCE"],
                &["A", "C", ""],
            ],
        )
    }
}

impl EdgeSource for MemorySource {
    fn identity(&self) -> String {
        "memory:EDGES".to_string()
    }

    fn table_name(&self) -> &str {
        "EDGES"
    }

    fn fetch(&self) -> Result<EdgeTable, DataFetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        Ok(self.table.clone())
    }
}

struct BrokenNarrator;

#[async_trait]
impl NarrativeService for BrokenNarrator {
    fn name(&self) -> &str {
        "broken"
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn complete(&self, _request: &NarrativeRequest) -> NarrativeResult<String> {
        Err(NarrativeError::Network("connection refused".to_string()))
    }
}

fn dashboard_with(source: Arc<MemorySource>, narrator: Arc<dyn NarrativeService>) -> Dashboard {
    Dashboard::new(source, narrator, PipelineSettings::default())
}

// ============================================================================
// Snapshot Building
// ============================================================================

#[test]
fn test_build_snapshot_example_scenario() {
    let table = MemorySource::example().table;
    let snapshot = build_snapshot("memory:EDGES", "EDGES", table, &PipelineSettings::default()).unwrap();

    assert_eq!(snapshot.metrics.node_count, 3);
    assert_eq!(snapshot.metrics.edge_count, 3);
    assert_eq!(snapshot.metrics.density, 1.0);
    assert_eq!(snapshot.metrics.component_count, 1);
    assert_eq!(snapshot.graph.category("A"), Some(Category::Other));
    assert_eq!(
        snapshot.graph.edge_between("A", "C").unwrap().relationship,
        "CONNECTED"
    );
    assert_eq!(snapshot.layout.len(), 3);
    assert_eq!(snapshot.chart.nodes.len(), 3);
    assert!(snapshot.summary.contains("density 1.000"));
    assert!(snapshot.local_summary.contains("3"));
    assert!(snapshot.local_summary.contains("1.000"));
}

#[test]
fn test_build_snapshot_rejects_blank_source() {
    let table = MemorySource::new(&["SOURCE", "TARGET"], &[&["A", "B"], &["", "C"]]).table;
    let err = build_snapshot("m", "EDGES", table, &PipelineSettings::default()).unwrap_err();
    assert_eq!(
        err,
        DashboardError::InputShape(InputShapeError {
            row: 1,
            reason: "empty SOURCE".to_string()
        })
    );
}

#[test]
fn test_build_snapshot_is_reproducible() {
    let settings = PipelineSettings::default();
    let a = build_snapshot("m", "EDGES", MemorySource::example().table, &settings).unwrap();
    let b = build_snapshot("m", "EDGES", MemorySource::example().table, &settings).unwrap();
    assert_eq!(a.layout, b.layout);
    assert_eq!(a.summary, b.summary);
    assert_eq!(a.top_nodes, b.top_nodes);
}

// ============================================================================
// Cache & Refresh
// ============================================================================

#[tokio::test]
async fn test_snapshot_is_cached_until_refresh() {
    let source = Arc::new(MemorySource::example());
    let dashboard = dashboard_with(Arc::clone(&source), Arc::new(LocalNarrative));

    let first = dashboard.snapshot().await.unwrap();
    let second = dashboard.snapshot().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);

    let refreshed = dashboard.refresh().await.unwrap();
    assert!(!Arc::ptr_eq(&first, &refreshed));
    assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_schema_error_aborts_and_is_not_cached() {
    let source = Arc::new(MemorySource::new(&["FROM", "TO"], &[&["A", "B"]]));
    let dashboard = dashboard_with(Arc::clone(&source), Arc::new(LocalNarrative));

    let err = dashboard.snapshot().await.unwrap_err();
    assert!(matches!(err, DashboardError::DataFetch(DataFetchError::Schema(_))));
    assert!(!err.hints().is_empty());

    dashboard.snapshot().await.unwrap_err();
    assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_slow_source_times_out() {
    let mut slow = MemorySource::example();
    slow.delay = Some(Duration::from_millis(500));
    let dashboard = Dashboard::new(
        Arc::new(slow),
        Arc::new(LocalNarrative),
        PipelineSettings {
            fetch_timeout: Duration::from_millis(20),
            ..PipelineSettings::default()
        },
    );

    let err = dashboard.snapshot().await.unwrap_err();
    assert_eq!(
        err,
        DashboardError::DataFetch(DataFetchError::Timeout(Duration::from_millis(20)))
    );
    assert_eq!(err.to_string(), "data fetch timed out after 20ms");
}

// ============================================================================
// Narrative, Export, Report
// ============================================================================

#[tokio::test]
async fn test_narrative_failure_falls_back_without_aborting() {
    let dashboard = dashboard_with(Arc::new(MemorySource::example()), Arc::new(BrokenNarrator));

    let (snapshot, narrative) = dashboard.narrative().await.unwrap();
    assert_eq!(narrative.source, NarrativeSource::Fallback);
    assert_eq!(narrative.text, snapshot.local_summary);
    assert!(narrative.error.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_local_narrator_is_marked_local() {
    let dashboard = dashboard_with(Arc::new(MemorySource::example()), Arc::new(LocalNarrative));
    let (_, narrative) = dashboard.narrative().await.unwrap();
    assert_eq!(narrative.source, NarrativeSource::Local);
    assert!(narrative.text.contains("1.000"));
}

#[tokio::test]
async fn test_export_keeps_original_table() {
    let dashboard = dashboard_with(Arc::new(MemorySource::example()), Arc::new(LocalNarrative));
    let csv = dashboard.export_csv().await.unwrap();
    assert_eq!(
        csv,
        "SOURCE,TARGET,RELATIONSHIP\nA,B,TREATED_BY\nB,C,HAS_INSURANCE\nA,C,\n"
    );
}

#[test]
fn test_report_is_a_placeholder() {
    let dashboard = dashboard_with(Arc::new(MemorySource::example()), Arc::new(LocalNarrative));
    assert_eq!(dashboard.generate_report(), Err(DashboardError::ReportUnavailable));
}

#[tokio::test]
async fn test_csv_file_source_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edges.csv");
    std::fs::write(
        &path,
        "source,target,relationship\npatient_1,Dr_Who,TREATED_BY\npatient_1,Acme Insurance,HAS_INSURANCE\nDr_Who,Dr_No,REFERRED\n",
    )
    .unwrap();

    let dashboard = Dashboard::new(
        Arc::new(CsvFileSource::new(&path)),
        Arc::new(LocalNarrative),
        PipelineSettings::default(),
    );
    let snapshot = dashboard.snapshot().await.unwrap();

    assert_eq!(snapshot.table_name, "EDGES");
    assert_eq!(snapshot.metrics.category_count(Category::Patient), 1);
    assert_eq!(snapshot.metrics.category_count(Category::Doctor), 2);
    assert_eq!(snapshot.metrics.category_count(Category::ConditionInsurance), 1);
    let top: Vec<&str> = snapshot.top_nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(top, vec!["patient_1", "Dr_Who", "Acme Insurance", "Dr_No"]);
}
