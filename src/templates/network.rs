//! Inline SVG rendering of a `NetworkChart`.

use super::components::html_escape;
use crate::models::{Category, NetworkChart};

/// Edges first so markers draw on top. Hovering an edge or marker shows its
/// label through the SVG `<title>` element.
pub fn render_network_svg(chart: &NetworkChart) -> String {
    let mut svg = format!(
        r#"<svg viewBox="0 0 {w:.0} {h:.0}" xmlns="http://www.w3.org/2000/svg" role="img" aria-label="Network graph">"#,
        w = chart.width,
        h = chart.height
    );

    svg.push_str(r#"<g class="edges">"#);
    for edge in &chart.edges {
        svg.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}"><title>{} --[{}]--&gt; {}</title></line>"#,
            edge.x1,
            edge.y1,
            edge.x2,
            edge.y2,
            html_escape(&edge.source),
            html_escape(&edge.relationship),
            html_escape(&edge.target)
        ));
    }
    svg.push_str("</g>");

    svg.push_str(r#"<g class="nodes">"#);
    for node in &chart.nodes {
        svg.push_str(&format!(
            r#"<g><circle cx="{x:.1}" cy="{y:.1}" r="{r:.1}" fill="{color}"><title>{id} ({category})</title></circle><text x="{tx:.1}" y="{ty:.1}">{id}</text></g>"#,
            x = node.x,
            y = node.y,
            r = node.radius,
            color = node.color,
            id = html_escape(&node.id),
            category = node.category.label(),
            tx = node.x + node.radius + 2.0,
            ty = node.y + 3.0,
        ));
    }
    svg.push_str("</g></svg>");
    svg
}

pub fn render_legend() -> String {
    let items: String = Category::ALL
        .iter()
        .map(|c| {
            format!(
                r#"<span class="legend-item"><span class="legend-color" style="background: {}"></span>{}</span>"#,
                c.color(),
                c.label()
            )
        })
        .collect();
    format!(r#"<div class="legend">{}</div>"#, items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EdgeSegment, NodeMarker};

    fn chart() -> NetworkChart {
        NetworkChart {
            width: 900.0,
            height: 600.0,
            nodes: vec![
                NodeMarker {
                    id: "patient_1".to_string(),
                    category: Category::Patient,
                    color: Category::Patient.color(),
                    x: 100.0,
                    y: 200.0,
                    radius: 7.5,
                },
                NodeMarker {
                    id: "<Dr>".to_string(),
                    category: Category::Doctor,
                    color: Category::Doctor.color(),
                    x: 300.0,
                    y: 400.0,
                    radius: 7.5,
                },
            ],
            edges: vec![EdgeSegment {
                source: "patient_1".to_string(),
                target: "<Dr>".to_string(),
                relationship: "TREATED_BY".to_string(),
                x1: 100.0,
                y1: 200.0,
                x2: 300.0,
                y2: 400.0,
            }],
        }
    }

    #[test]
    fn test_svg_has_one_element_per_primitive() {
        let svg = render_network_svg(&chart());
        assert!(svg.starts_with(r#"<svg viewBox="0 0 900 600""#));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert_eq!(svg.matches("<line").count(), 1);
        assert!(svg.contains(r#"cx="100.0" cy="200.0""#));
        assert!(svg.contains("patient_1 --[TREATED_BY]--&gt; &lt;Dr&gt;"));
        assert!(!svg.contains("<Dr>"));
    }

    #[test]
    fn test_edges_drawn_before_nodes() {
        let svg = render_network_svg(&chart());
        let edges_at = svg.find(r#"class="edges""#).unwrap();
        let nodes_at = svg.find(r#"class="nodes""#).unwrap();
        assert!(edges_at < nodes_at);
    }

    #[test]
    fn test_legend_lists_every_category() {
        let legend = render_legend();
        for c in Category::ALL {
            assert!(legend.contains(c.label()));
            assert!(legend.contains(c.color()));
        }
    }
}
