//! Shared HTML components: navigation bar, base page, escaping.

use super::styles::STYLE;

// ============================================================================
// Text Escaping
// ============================================================================

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ============================================================================
// Navigation Bar
// ============================================================================

pub fn nav_bar(source_identity: &str) -> String {
    format!(
        r#"<nav class="nav-bar">
            <a href="/" class="brand">Care Network</a>
            <a href="/">Dashboard</a>
            <a href="/export.csv">Export CSV</a>
            <a href="/api/graph">JSON</a>
            <span class="spacer"></span>
            <span class="source">{}</span>
        </nav>"#,
        html_escape(source_identity)
    )
}

// ============================================================================
// Base HTML Template
// ============================================================================

pub fn base_html(title: &str, content: &str, source_identity: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    {nav}
    <div class="container">
        {content}
    </div>
</body>
</html>"#,
        title = html_escape(title),
        nav = nav_bar(source_identity),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_base_html_escapes_title_and_source() {
        let page = base_html("<Dash>", "<p>body</p>", "csv:<edges>");
        assert!(page.contains("<title>&lt;Dash&gt;</title>"));
        assert!(page.contains("csv:&lt;edges&gt;"));
        assert!(page.contains("<p>body</p>"));
    }
}
