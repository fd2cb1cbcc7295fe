//! Data models for the dashboard.
//!
//! This module contains the core data structures shared across the pipeline:
//! edge records and the raw table they come from, node categories, layout
//! positions, computed metrics, chart primitives and narrative results.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relationship label used when a row has none.
pub const DEFAULT_RELATIONSHIP: &str = "CONNECTED";

// ============================================================================
// Edge Data
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub relationship: String,
}

impl EdgeRecord {
    /// Builds a record, substituting `CONNECTED` for a blank relationship.
    pub fn new(source: impl Into<String>, target: impl Into<String>, relationship: &str) -> Self {
        let relationship = relationship.trim();
        Self {
            source: source.into(),
            target: target.into(),
            relationship: if relationship.is_empty() {
                DEFAULT_RELATIONSHIP.to_string()
            } else {
                relationship.to_string()
            },
        }
    }
}

/// The table exactly as the data source returned it. Kept for export.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl EdgeTable {
    /// Case-insensitive column lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.trim().eq_ignore_ascii_case(name))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Node Categories
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Patient,
    Doctor,
    #[serde(rename = "Condition/Insurance")]
    ConditionInsurance,
    Relationship,
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 5] = [
        Category::Patient,
        Category::Doctor,
        Category::ConditionInsurance,
        Category::Relationship,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Patient => "Patient",
            Category::Doctor => "Doctor",
            Category::ConditionInsurance => "Condition/Insurance",
            Category::Relationship => "Relationship",
            Category::Other => "Other",
        }
    }

    /// Chart colour (solarized palette, same as the page styles).
    pub fn color(&self) -> &'static str {
        match self {
            Category::Patient => "#268bd2",
            Category::Doctor => "#859900",
            Category::ConditionInsurance => "#dc322f",
            Category::Relationship => "#b58900",
            Category::Other => "#93a1a1",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Layout
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    pub positions: IndexMap<String, Position>,
}

impl Layout {
    pub fn get(&self, node: &str) -> Option<Position> {
        self.positions.get(node).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

// ============================================================================
// Analytics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub component_count: usize,
    pub avg_degree: f64,
    pub max_degree: usize,
    pub degree_by_node: IndexMap<String, usize>,
    pub category_groups: IndexMap<Category, Vec<String>>,
}

impl Metrics {
    pub fn category_count(&self, category: Category) -> usize {
        self.category_groups
            .get(&category)
            .map(|nodes| nodes.len())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedNode {
    pub id: String,
    pub category: Category,
    pub degree: usize,
}

// ============================================================================
// Chart Primitives
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeMarker {
    pub id: String,
    pub category: Category,
    pub color: &'static str,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSegment {
    pub source: String,
    pub target: String,
    pub relationship: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkChart {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeMarker>,
    pub edges: Vec<EdgeSegment>,
}

// ============================================================================
// Narrative
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeSource {
    Remote,   // Completion service answered
    Local,    // Local service configured, no remote call made
    Fallback, // Remote call failed, local summary substituted
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Narrative {
    pub text: String,
    pub source: NarrativeSource,
    pub error: Option<String>,
}
