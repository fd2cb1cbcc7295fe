//! The dashboard page and the refresh error page.

use super::components::{base_html, html_escape};
use super::network::{render_legend, render_network_svg};
use crate::dashboard::DashboardSnapshot;
use crate::error::DashboardError;
use crate::models::{Category, Narrative, NarrativeSource};

const PAGE_TITLE: &str = "Care Network Dashboard";

// ============================================================================
// Sections
// ============================================================================

fn toolbar(snapshot: &DashboardSnapshot, narrator_name: &str) -> String {
    format!(
        r#"<div class="toolbar">
            <form action="/refresh" method="post"><button class="btn" type="submit">Refresh data</button></form>
            <form action="/narrative" method="post"><button class="btn" type="submit" title="Narrative service: {narrator}">Generate narrative</button></form>
            <a class="btn secondary" href="/export.csv">Export CSV</a>
            <a class="btn secondary" href="/report">Generate report</a>
            <span class="loaded-at">{table} loaded {loaded}</span>
        </div>"#,
        narrator = html_escape(narrator_name),
        table = html_escape(&snapshot.table_name),
        loaded = snapshot.loaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

fn stats(snapshot: &DashboardSnapshot) -> String {
    let m = &snapshot.metrics;
    let stat = |value: String, label: &str| {
        format!(
            r#"<div class="stat"><div class="value">{}</div><div class="label">{}</div></div>"#,
            value, label
        )
    };
    format!(
        r#"<div class="stats">{}{}{}{}{}{}</div>"#,
        stat(m.node_count.to_string(), "Nodes"),
        stat(m.edge_count.to_string(), "Edges"),
        stat(format!("{:.3}", m.density), "Density"),
        stat(m.component_count.to_string(), "Components"),
        stat(format!("{:.2}", m.avg_degree), "Avg degree"),
        stat(m.max_degree.to_string(), "Max degree"),
    )
}

fn category_table(snapshot: &DashboardSnapshot) -> String {
    let rows: String = Category::ALL
        .iter()
        .map(|c| {
            format!(
                r#"<tr><td><span class="legend-color" style="display:inline-block; background: {}"></span> {}</td><td class="num">{}</td></tr>"#,
                c.color(),
                c.label(),
                snapshot.metrics.category_count(*c)
            )
        })
        .collect();
    format!(
        r#"<table class="data-table"><thead><tr><th>Category</th><th>Nodes</th></tr></thead><tbody>{}</tbody></table>"#,
        rows
    )
}

fn top_nodes_table(snapshot: &DashboardSnapshot) -> String {
    if snapshot.top_nodes.is_empty() {
        return r#"<p class="muted">No nodes.</p>"#.to_string();
    }
    let rows: String = snapshot
        .top_nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            format!(
                r#"<tr><td class="num">{}</td><td>{}</td><td>{}</td><td class="num">{}</td></tr>"#,
                i + 1,
                html_escape(&node.id),
                node.category.label(),
                node.degree
            )
        })
        .collect();
    format!(
        r#"<table class="data-table"><thead><tr><th>#</th><th>Node</th><th>Category</th><th>Degree</th></tr></thead><tbody>{}</tbody></table>"#,
        rows
    )
}

fn edge_table(snapshot: &DashboardSnapshot) -> String {
    let rows: String = snapshot
        .graph
        .edges()
        .map(|edge| {
            format!(
                r#"<tr><td>{}</td><td class="rel">{}</td><td>{}</td></tr>"#,
                html_escape(&edge.source),
                html_escape(&edge.relationship),
                html_escape(&edge.target)
            )
        })
        .collect();
    format!(
        r#"<table class="data-table"><thead><tr><th>Source</th><th>Relationship</th><th>Target</th></tr></thead><tbody>{}</tbody></table>"#,
        rows
    )
}

pub fn render_narrative(narrative: &Narrative) -> String {
    let (class, meta) = match narrative.source {
        NarrativeSource::Remote => ("narrative", "Generated by the completion service.".to_string()),
        NarrativeSource::Local => ("narrative", "Local summary (no completion service configured).".to_string()),
        NarrativeSource::Fallback => (
            "narrative fallback",
            "Completion service unavailable; showing the local summary.".to_string(),
        ),
    };
    let error = narrative
        .error
        .as_deref()
        .map(|e| format!(r#"<div class="message warning">{}</div>"#, html_escape(e)))
        .unwrap_or_default();

    format!(
        r#"<h2>Narrative</h2>{error}<div class="{class}">{text}</div><div class="narrative-meta">{meta}</div>"#,
        error = error,
        class = class,
        text = html_escape(&narrative.text),
        meta = meta,
    )
}

// ============================================================================
// Pages
// ============================================================================

pub fn render_dashboard(
    snapshot: &DashboardSnapshot,
    narrative: Option<&Narrative>,
    narrator_name: &str,
) -> String {
    let narrative_html = narrative.map(render_narrative).unwrap_or_default();

    let content = format!(
        r#"<h1>{title}</h1>
        {toolbar}
        {stats}
        {narrative}
        <h2>Network</h2>
        <div class="chart">{svg}</div>
        {legend}
        <div class="columns">
            <div><h2>Categories</h2>{categories}</div>
            <div><h2>Most connected</h2>{top}</div>
        </div>
        <h2>Relationships</h2>
        {edges}
        <h2>Summary sent to the narrative service</h2>
        <pre class="summary-text">{summary}</pre>"#,
        title = PAGE_TITLE,
        toolbar = toolbar(snapshot, narrator_name),
        stats = stats(snapshot),
        narrative = narrative_html,
        svg = render_network_svg(&snapshot.chart),
        legend = render_legend(),
        categories = category_table(snapshot),
        top = top_nodes_table(snapshot),
        edges = edge_table(snapshot),
        summary = html_escape(&snapshot.summary),
    );

    base_html(PAGE_TITLE, &content, &snapshot.source_identity)
}

pub fn render_error_page(error: &DashboardError, source_identity: &str) -> String {
    let hints: String = error
        .hints()
        .iter()
        .map(|h| format!("<li>{}</li>", html_escape(h)))
        .collect();

    let content = format!(
        r#"<h1>{title}</h1>
        <div class="message error">{message}</div>
        <h2>What to check</h2>
        <ul class="hints">{hints}</ul>
        <form action="/refresh" method="post"><button class="btn" type="submit">Retry</button></form>"#,
        title = PAGE_TITLE,
        message = html_escape(&error.to_string()),
        hints = hints,
    );

    base_html(PAGE_TITLE, &content, source_identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{build_snapshot, PipelineSettings};
    use crate::error::DataFetchError;
    use crate::models::EdgeTable;

    fn snapshot() -> DashboardSnapshot {
        let table = EdgeTable {
            columns: vec!["SOURCE".into(), "TARGET".into(), "RELATIONSHIP".into()],
            rows: vec![
                vec!["patient_1".into(), "Dr_Who".into(), "TREATED_BY".into()],
                vec!["Dr_Who".into(), "<script>".into(), "".into()],
            ],
        };
        build_snapshot("csv:edges.csv", "EDGES", table, &PipelineSettings::default()).unwrap()
    }

    #[test]
    fn test_dashboard_page_sections() {
        let page = render_dashboard(&snapshot(), None, "local");
        assert!(page.contains("<svg"));
        assert!(page.contains(r#"action="/refresh""#));
        assert!(page.contains(r#"href="/export.csv""#));
        assert!(page.contains(r#"href="/report""#));
        assert!(page.contains("Most connected"));
        assert!(page.contains("TREATED_BY"));
        assert!(page.contains("CONNECTED"));
        assert!(!page.contains("<h2>Narrative</h2>"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn test_fallback_narrative_shows_error() {
        let narrative = Narrative {
            text: "The network contains 3 nodes.".to_string(),
            source: NarrativeSource::Fallback,
            error: Some("network error: connection refused".to_string()),
        };
        let page = render_dashboard(&snapshot(), Some(&narrative), "openai");
        assert!(page.contains("<h2>Narrative</h2>"));
        assert!(page.contains("The network contains 3 nodes."));
        assert!(page.contains("connection refused"));
        assert!(page.contains("narrative fallback"));
    }

    #[test]
    fn test_error_page_lists_hints() {
        let err = DashboardError::DataFetch(DataFetchError::Schema("missing column(s) TARGET".into()));
        let page = render_error_page(&err, "sled:db/EDGES");
        assert!(page.contains("missing column(s) TARGET"));
        for hint in err.hints() {
            assert!(page.contains(hint));
        }
    }
}
