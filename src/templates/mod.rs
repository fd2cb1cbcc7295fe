//! HTML templates and styling for the dashboard.
//!
//! ## Module Structure
//!
//! - `styles` - CSS constant (solarized light)
//! - `components` - Shared HTML components (nav bar, base template, escaping)
//! - `network` - Inline SVG network chart and category legend
//! - `dashboard` - Dashboard and error pages

mod components;
mod dashboard;
mod network;
mod styles;

pub use components::{base_html, html_escape, nav_bar};
pub use dashboard::{render_dashboard, render_error_page, render_narrative};
pub use network::{render_legend, render_network_svg};
pub use styles::STYLE;
