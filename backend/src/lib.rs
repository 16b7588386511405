//! # Energy Explorer - Sustainable energy analytics
//!
//! Loads the global sustainable-energy dataset (one row per country and
//! year) and derives the tables and chart specs behind the dashboard:
//! GDP rankings, electricity access extremes, correlation heatmaps,
//! regional maps, low-carbon leaders and emission reductions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Dataset   │────▶│    Query    │────▶│   Report    │
//! │ (auto-enc)  │     │ (typed rows)│     │ (pure fns)  │     │ (panels)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                                   │
//!                                              HTTP API / CLI ◀─────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use energy_explorer::{build_report, Dataset, ViewState};
//!
//! let dataset = Dataset::load("Energy_data.csv")?;
//! let report = build_report(&dataset, &ViewState::default())?;
//! println!("{} panels", report.panels.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Schema: observations, metrics, fields, tables
//! - [`parser`] - CSV decoding with encoding/delimiter detection
//! - [`dataset`] - Validated in-memory dataset
//! - [`query`] - Rankings, extremes, correlations, series, aggregates
//! - [`report`] - View state and report builder
//! - [`config`] - Environment settings
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Loading
pub mod dataset;
pub mod parser;

// Analytics
pub mod query;
pub mod report;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{ConfigError, CsvError, DatasetError, QueryError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Cell, Column, Field, Metric, Observation, Table};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{decode_auto, detect_delimiter, detect_encoding, parse_number, parse_observations};

// =============================================================================
// Re-exports - Dataset
// =============================================================================

pub use config::Settings;
pub use dataset::{Dataset, RowOrder, SourceInfo};

// =============================================================================
// Re-exports - Queries
// =============================================================================

pub use query::{
    correlation_matrix, entities, entity_series, extremes, first_last_reductions, latest_per_entity,
    latest_top, overview, rank, resolve_entity, series_table, summarize, CorrelationMatrix, Extreme,
    ExtremesQuery, FieldSummary, LatestQuery, Overview, RankingQuery, Reduction, SortOrder,
};

// =============================================================================
// Re-exports - Reports
// =============================================================================

pub use report::{build_report, glossary, ChartKind, ChartSpec, Panel, Report, ViewEvent, ViewState};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
