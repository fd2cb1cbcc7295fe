//! Narrative summaries of the edge graph.
//!
//! `summarize` serializes the graph and its metrics into a fixed text block.
//! That block, behind an instructional prefix, is the only thing sent to the
//! completion service. When the service fails, `fallback_summary` produces a
//! deterministic description from the metrics alone.

pub mod client;

use crate::error::NarrativeError;
use crate::graph::Graph;
use crate::models::{Category, Metrics, Narrative, NarrativeSource, RankedNode};
use async_trait::async_trait;
use std::fmt::Write;
use std::time::Duration;
use tracing::{info, warn};

pub use client::{CompletionClient, CompletionProvider};

pub const PROMPT_PREFIX: &str = "You are a healthcare data analyst. Summarize the relationship \
network below for a non-technical audience. Describe the main entities, how they are \
connected, which nodes are most central, and anything unusual. Keep it to two short paragraphs.";

pub type NarrativeResult<T> = Result<T, NarrativeError>;

// ============================================================================
// Text Templates
// ============================================================================

pub fn summarize(graph: &Graph, metrics: &Metrics, top: &[RankedNode]) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Network: {} nodes, {} edges, density {:.3}",
        metrics.node_count, metrics.edge_count, metrics.density
    );

    out.push_str("Categories:\n");
    for category in Category::ALL {
        let _ = writeln!(out, "- {}: {}", category, metrics.category_count(category));
    }

    out.push_str("Relationships:\n");
    for edge in graph.edges() {
        let _ = writeln!(out, "- {} --[{}]--> {}", edge.source, edge.relationship, edge.target);
    }

    out.push_str("Most connected:\n");
    for node in top {
        let _ = writeln!(out, "- {} (degree {})", node.id, node.degree);
    }

    out
}

pub fn build_prompt(summary: &str) -> String {
    format!("{}\n\n{}", PROMPT_PREFIX, summary)
}

pub fn fallback_summary(metrics: &Metrics, top: &[RankedNode]) -> String {
    if metrics.node_count == 0 {
        return "The network is empty: no nodes or relationships were loaded.".to_string();
    }

    let mut out = format!(
        "The network contains {} nodes and {} relationships with a density of {:.3}, \
         forming {} connected component{}. Nodes have {:.2} connections on average.",
        metrics.node_count,
        metrics.edge_count,
        metrics.density,
        metrics.component_count,
        if metrics.component_count == 1 { "" } else { "s" },
        metrics.avg_degree,
    );

    if let Some(first) = top.first() {
        let _ = write!(
            out,
            " The most connected node is {} ({}) with {} connection{}.",
            first.id,
            first.category,
            first.degree,
            if first.degree == 1 { "" } else { "s" }
        );
    }

    let breakdown: Vec<String> = Category::ALL
        .iter()
        .map(|c| (c, metrics.category_count(*c)))
        .filter(|(_, n)| *n > 0)
        .map(|(c, n)| format!("{} {}", c, n))
        .collect();
    if !breakdown.is_empty() {
        let _ = write!(out, " Category breakdown: {}.", breakdown.join(", "));
    }

    out
}

// ============================================================================
// Narrative Service
// ============================================================================

/// What a narrative service receives: the prompt for a remote model and the
/// locally built summary for implementations that answer without one.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeRequest {
    pub prompt: String,
    pub local_summary: String,
}

#[async_trait]
pub trait NarrativeService: Send + Sync {
    fn name(&self) -> &str;
    fn is_remote(&self) -> bool;
    async fn complete(&self, request: &NarrativeRequest) -> NarrativeResult<String>;
}

/// Answers every request with the local summary.
pub struct LocalNarrative;

#[async_trait]
impl NarrativeService for LocalNarrative {
    fn name(&self) -> &str {
        "local"
    }

    fn is_remote(&self) -> bool {
        false
    }

    async fn complete(&self, request: &NarrativeRequest) -> NarrativeResult<String> {
        Ok(request.local_summary.clone())
    }
}

/// Runs one completion attempt under `timeout`. Any failure degrades to the
/// local summary and the error is kept for display.
pub async fn narrate(
    service: &dyn NarrativeService,
    request: &NarrativeRequest,
    timeout: Duration,
) -> Narrative {
    let outcome = match tokio::time::timeout(timeout, service.complete(request)).await {
        Ok(result) => result,
        Err(_) => Err(NarrativeError::Timeout(timeout)),
    };

    match outcome {
        Ok(text) if !text.trim().is_empty() => {
            info!(service = service.name(), "narrative generated");
            Narrative {
                text: text.trim().to_string(),
                source: if service.is_remote() {
                    NarrativeSource::Remote
                } else {
                    NarrativeSource::Local
                },
                error: None,
            }
        }
        Ok(_) => fallback(
            service,
            request,
            NarrativeError::Malformed("empty completion".to_string()),
        ),
        Err(e) => fallback(service, request, e),
    }
}

fn fallback(service: &dyn NarrativeService, request: &NarrativeRequest, err: NarrativeError) -> Narrative {
    warn!(service = service.name(), error = %err, "narrative service failed, using local summary");
    Narrative {
        text: request.local_summary.clone(),
        source: NarrativeSource::Fallback,
        error: Some(err.to_string()),
    }
}
