//! Application configuration.
//!
//! Hardcoded for development; the backend serves the production bundle
//! from its static directory, so the same origin works there too.

/// Backend API base URL.
pub const BACKEND_URL: &str = "http://localhost:3000";

/// Maximum logs to keep in memory.
pub const MAX_LOG_ENTRIES: usize = 100;

/// Drawing area of every SVG chart, in viewBox units.
pub const CHART_WIDTH: f64 = 640.0;
pub const CHART_HEIGHT: f64 = 360.0;

/// Entities listed in the dropdown before the filter narrows them.
pub const MAX_ENTITY_OPTIONS: usize = 50;

/// Rows rendered per table; longer tables show a "first N of M" note.
pub const MAX_TABLE_ROWS: usize = 100;
