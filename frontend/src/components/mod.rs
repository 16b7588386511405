//! UI Components for the energy explorer dashboard.
//!
//! # Layout Components
//! - [`Header`] - Title bar and page navigation
//! - [`Hero`] - Report title
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`TabBar`], [`ViewSelector`], [`YearPicker`], [`EntityPicker`] - Analysis controls
//! - [`PanelView`] - One report panel (notes, chart, table)
//! - [`Chart`] - SVG rendering of a chart spec
//! - [`LogsPanel`] - Real-time server logs (SSE)

mod chart;
mod controls;
mod footer;
mod header;
mod hero;
mod logs;
mod panel;
pub mod plot;

pub use chart::*;
pub use controls::*;
pub use footer::*;
pub use header::*;
pub use hero::*;
pub use logs::*;
pub use panel::*;
