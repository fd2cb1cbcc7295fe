//! Chart primitives built from a layout.
//!
//! Layout coordinates live in `[-1, 1]`; charts map them into a pixel
//! viewport with a margin so labels and markers stay inside the frame.

use crate::graph::Graph;
use crate::models::{EdgeSegment, Layout, Metrics, NetworkChart, NodeMarker, Position};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSize {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 600.0,
            margin: 40.0,
        }
    }
}

impl ChartSize {
    fn project(&self, p: Position) -> (f64, f64) {
        let half_w = (self.width - 2.0 * self.margin) / 2.0;
        let half_h = (self.height - 2.0 * self.margin) / 2.0;
        (
            self.margin + half_w * (p.x + 1.0),
            self.margin + half_h * (p.y + 1.0),
        )
    }
}

/// Marker radius grows with the square root of degree.
pub fn marker_radius(degree: usize) -> f64 {
    5.0 + 2.5 * (degree as f64).sqrt()
}

pub fn network_chart(graph: &Graph, layout: &Layout, metrics: &Metrics, size: ChartSize) -> NetworkChart {
    let nodes = graph
        .nodes()
        .filter_map(|node| {
            let (x, y) = size.project(layout.get(&node.id)?);
            let degree = metrics.degree_by_node.get(&node.id).copied().unwrap_or(0);
            Some(NodeMarker {
                color: node.category.color(),
                category: node.category,
                radius: marker_radius(degree),
                id: node.id,
                x,
                y,
            })
        })
        .collect();

    let edges = graph
        .edges()
        .filter_map(|edge| {
            let (x1, y1) = size.project(layout.get(&edge.source)?);
            let (x2, y2) = size.project(layout.get(&edge.target)?);
            Some(EdgeSegment {
                source: edge.source.clone(),
                target: edge.target.clone(),
                relationship: edge.relationship.clone(),
                x1,
                y1,
                x2,
                y2,
            })
        })
        .collect();

    NetworkChart {
        width: size.width,
        height: size.height,
        nodes,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::analyze;
    use crate::graph::build_graph;
    use crate::layout::{spring_layout, LayoutConfig};
    use crate::models::EdgeRecord;

    #[test]
    fn test_projection_corners() {
        let size = ChartSize {
            width: 200.0,
            height: 100.0,
            margin: 10.0,
        };
        assert_eq!(size.project(Position { x: -1.0, y: -1.0 }), (10.0, 10.0));
        assert_eq!(size.project(Position { x: 1.0, y: 1.0 }), (190.0, 90.0));
        assert_eq!(size.project(Position { x: 0.0, y: 0.0 }), (100.0, 50.0));
    }

    #[test]
    fn test_chart_has_marker_per_node_and_segment_per_edge() {
        let graph = build_graph(&[
            EdgeRecord::new("patient_1", "Dr_Who", "TREATED_BY"),
            EdgeRecord::new("Dr_Who", "Acme Insurance", ""),
        ]);
        let layout = spring_layout(&graph, &LayoutConfig::default());
        let metrics = analyze(&graph);
        let chart = network_chart(&graph, &layout, &metrics, ChartSize::default());

        assert_eq!(chart.nodes.len(), 3);
        assert_eq!(chart.edges.len(), 2);
        assert_eq!(chart.nodes[0].color, "#268bd2");
        assert!(chart.nodes[1].radius > chart.nodes[0].radius);
        for m in &chart.nodes {
            assert!(m.x >= 40.0 - 1e-9 && m.x <= 860.0 + 1e-9);
            assert!(m.y >= 40.0 - 1e-9 && m.y <= 560.0 + 1e-9);
        }
        assert_eq!(chart.edges[1].relationship, "CONNECTED");
    }
}
