//! CSS for the dashboard page.

// ============================================================================
// CSS Styles
// ============================================================================

pub const STYLE: &str = r#"
/* Solarized Light Theme */
:root {
    --base03: #002b36;
    --base02: #073642;
    --base01: #586e75;
    --base00: #657b83;
    --base1: #93a1a1;
    --base2: #eee8d5;
    --base3: #fdf6e3;

    --yellow: #b58900;
    --red: #dc322f;
    --blue: #268bd2;
    --cyan: #2aa198;
    --green: #859900;

    --bg: var(--base3);
    --fg: var(--base00);
    --muted: var(--base1);
    --border: var(--base2);
    --link: var(--blue);
    --link-hover: var(--cyan);
    --accent: var(--base2);
}

* { box-sizing: border-box; margin: 0; padding: 0; }

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    line-height: 1.6;
    color: var(--fg);
    background: var(--bg);
}

.container {
    max-width: 1000px;
    margin: 0 auto;
    padding: 1rem;
}

a { color: var(--link); text-decoration: none; }
a:hover { color: var(--link-hover); text-decoration: underline; }

h1, h2, h3 { font-weight: 600; margin-top: 1.5em; margin-bottom: 0.5em; color: var(--base01); }
h1 { font-size: 1.6rem; margin-top: 0.5em; }
h2 { font-size: 1.2rem; }

.nav-bar {
    display: flex;
    align-items: center;
    gap: 1.5rem;
    padding: 0.75rem 1rem;
    background: var(--accent);
    border-bottom: 1px solid var(--base1);
}
.nav-bar .brand { font-weight: 700; color: var(--base01); }
.nav-bar .spacer { flex: 1; }
.nav-bar .source { font-size: 0.8rem; color: var(--muted); font-family: "SF Mono", "Consolas", "Liberation Mono", monospace; }

.toolbar {
    display: flex;
    flex-wrap: wrap;
    gap: 0.5rem;
    margin: 1rem 0;
    align-items: center;
}
.toolbar form { display: inline; }
.toolbar .loaded-at { font-size: 0.8rem; color: var(--muted); margin-left: auto; }

.btn {
    padding: 0.5rem 1rem;
    border: 1px solid var(--base1);
    border-radius: 4px;
    background: var(--blue);
    color: var(--base3);
    cursor: pointer;
    font-size: 0.9rem;
    font-family: inherit;
    text-decoration: none;
    display: inline-block;
}

.btn:hover { background: var(--cyan); border-color: var(--cyan); color: var(--base3); text-decoration: none; }
.btn.secondary { background: var(--base2); color: var(--base00); border-color: var(--base1); }
.btn.secondary:hover { background: var(--base3); }

.stats {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
    gap: 0.75rem;
    margin: 1rem 0;
}
.stat {
    padding: 0.75rem;
    background: var(--accent);
    border-radius: 6px;
}
.stat .value { font-size: 1.4rem; font-weight: 600; color: var(--base01); }
.stat .label { font-size: 0.8rem; color: var(--muted); text-transform: uppercase; }

.chart {
    border: 1px solid var(--border);
    border-radius: 6px;
    background: #fffdf6;
    overflow: hidden;
}
.chart svg { display: block; width: 100%; height: auto; }
.chart line { stroke: var(--base1); stroke-opacity: 0.7; }
.chart circle { stroke: var(--base3); stroke-width: 1.5; }
.chart text { font-size: 10px; fill: var(--base01); pointer-events: none; }

.legend { display: flex; flex-wrap: wrap; gap: 1rem; font-size: 0.8rem; margin-top: 0.5rem; }
.legend-item { display: flex; align-items: center; gap: 0.3rem; }
.legend-color { width: 12px; height: 12px; border-radius: 50%; }

.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
@media (max-width: 700px) { .columns { grid-template-columns: 1fr; } }

.data-table { width: 100%; border-collapse: collapse; font-size: 0.85rem; }
.data-table th, .data-table td { padding: 0.4rem 0.5rem; text-align: left; border-bottom: 1px solid var(--border); }
.data-table th { font-weight: 600; color: var(--base01); }
.data-table td.num { text-align: right; font-variant-numeric: tabular-nums; }
.data-table .rel { font-family: "SF Mono", "Consolas", "Liberation Mono", monospace; color: var(--yellow); }

.narrative {
    padding: 1rem;
    background: var(--accent);
    border-left: 4px solid var(--blue);
    border-radius: 4px;
    white-space: pre-wrap;
}
.narrative.fallback { border-left-color: var(--yellow); }
.narrative-meta { font-size: 0.8rem; color: var(--muted); margin-top: 0.5rem; }

.summary-text {
    font-family: "SF Mono", "Consolas", "Liberation Mono", monospace;
    font-size: 0.8rem;
    background: var(--accent);
    padding: 0.75rem;
    border-radius: 4px;
    white-space: pre-wrap;
    max-height: 300px;
    overflow: auto;
}

.message {
    padding: 0.75rem 1rem;
    border-radius: 4px;
    margin-bottom: 1rem;
}
.message.error { background: #fdf2f2; color: var(--red); border: 1px solid var(--red); }
.message.warning { background: #fdf8ea; color: var(--yellow); border: 1px solid var(--yellow); }

.hints { margin: 0.5rem 0 1rem 1.5rem; }
.hints li { margin: 0.25rem 0; }

.muted { color: var(--muted); }
"#;
