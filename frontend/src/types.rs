//! Types shared with the backend API.
//!
//! These mirror the backend's wire format (camelCase structs, snake_case
//! enum values) so requests and responses decode without adapters.
//!
//! # Categories
//!
//! - **View Types** - Page, tabs, display modes, [`ViewState`], [`ViewEvent`]
//! - **Report Types** - Tables, chart specs, panels
//! - **Log Types** - Real-time log streaming
//! - **API Types** - Backend response structures
//! - **Error Types** - Frontend error handling

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// View Types
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Methodology,
    Overview,
    Features,
    Analysis,
    Conclusion,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Methodology,
        Page::Overview,
        Page::Features,
        Page::Analysis,
        Page::Conclusion,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Page::Methodology => "Project Objectives and Methodology",
            Page::Overview => "Overview",
            Page::Features => "Features",
            Page::Analysis => "Analysis",
            Page::Conclusion => "Conclusion",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisTab {
    #[default]
    Gdp,
    ElectricityAccess,
    RegionalInsights,
    LowCarbonLeaders,
    EmissionReduction,
}

impl AnalysisTab {
    pub const ALL: [AnalysisTab; 5] = [
        AnalysisTab::Gdp,
        AnalysisTab::ElectricityAccess,
        AnalysisTab::RegionalInsights,
        AnalysisTab::LowCarbonLeaders,
        AnalysisTab::EmissionReduction,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AnalysisTab::Gdp => "GDP Analysis",
            AnalysisTab::ElectricityAccess => "Electricity Access",
            AnalysisTab::RegionalInsights => "Regional Insights",
            AnalysisTab::LowCarbonLeaders => "Low CO2 Emitters",
            AnalysisTab::EmissionReduction => "Reduced CO2 Emissions",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GdpView {
    #[default]
    Highest,
    Lowest,
    LowestTrend,
    HighestTrend,
}

impl GdpView {
    pub const ALL: [GdpView; 4] = [
        GdpView::Highest,
        GdpView::Lowest,
        GdpView::LowestTrend,
        GdpView::HighestTrend,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GdpView::Highest => "Top 10 highest GDP per capita",
            GdpView::Lowest => "Top 10 lowest GDP per capita",
            GdpView::LowestTrend => "GDP trend of the poorest",
            GdpView::HighestTrend => "GDP trend of the richest",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessView {
    #[default]
    FocusYearData,
    Correlations,
    Graphs,
    Trends,
    Summary,
}

impl AccessView {
    pub const ALL: [AccessView; 5] = [
        AccessView::FocusYearData,
        AccessView::Correlations,
        AccessView::Graphs,
        AccessView::Trends,
        AccessView::Summary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AccessView::FocusYearData => "Focus year data",
            AccessView::Correlations => "Correlations",
            AccessView::Graphs => "Graphs",
            AccessView::Trends => "Trends",
            AccessView::Summary => "Summary",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionalView {
    #[default]
    RenewableMap,
    GeographicInfluence,
    GdpVsEnergy,
}

impl RegionalView {
    pub const ALL: [RegionalView; 3] = [
        RegionalView::RenewableMap,
        RegionalView::GeographicInfluence,
        RegionalView::GdpVsEnergy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RegionalView::RenewableMap => "Renewable energy map",
            RegionalView::GeographicInfluence => "Geographic influence",
            RegionalView::GdpVsEnergy => "GDP vs energy consumption",
        }
    }
}

/// Current selections; sent with every report request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    pub page: Page,
    pub tab: AnalysisTab,
    pub gdp_view: GdpView,
    pub access_view: AccessView,
    pub regional_view: RegionalView,
    pub entity: Option<String>,
    pub year: i32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: Page::default(),
            tab: AnalysisTab::default(),
            gdp_view: GdpView::default(),
            access_view: AccessView::default(),
            regional_view: RegionalView::default(),
            entity: None,
            year: 2020,
        }
    }
}

/// A single user interaction, applied by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    Navigate { page: Page },
    SelectTab { tab: AnalysisTab },
    SelectGdpView { view: GdpView },
    SelectAccessView { view: AccessView },
    SelectRegionalView { view: RegionalView },
    SelectEntity { entity: Option<String> },
    SelectYear { year: i32 },
}

// =============================================================================
// Report Types
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Int(i64),
    Number(Option<f64>),
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Text(_) => None,
            Cell::Int(i) => Some(*i as f64),
            Cell::Number(n) => *n,
        }
    }

    /// Text for a table cell; missing numbers render blank.
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Number(Some(n)) => format_number(*n),
            Cell::Number(None) => String::new(),
        }
    }
}

/// Up to two decimals, trailing zeros dropped.
pub fn format_number(n: f64) -> String {
    let s = format!("{:.2}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    pub fn label(&self, key: &str) -> String {
        self.columns
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.label.clone())
            .unwrap_or_else(|| key.to_string())
    }

    /// Numeric values of one column; `None` for missing or text cells.
    pub fn numbers(&self, key: &str) -> Vec<Option<f64>> {
        match self.column_index(key) {
            Some(idx) => self.rows.iter().map(|row| row[idx].as_f64()).collect(),
            None => vec![None; self.rows.len()],
        }
    }

    pub fn texts(&self, key: &str) -> Vec<String> {
        match self.column_index(key) {
            Some(idx) => self.rows.iter().map(|row| row[idx].display()).collect(),
            None => vec![String::new(); self.rows.len()],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
    Heatmap,
    Choropleth,
    ScatterGeo,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x: String,
    pub y: Vec<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub hover: Vec<String>,
    #[serde(default)]
    pub animation_frame: Option<String>,
    #[serde(default)]
    pub x_label: Option<String>,
    #[serde(default)]
    pub y_label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub heading: String,
    #[serde(default)]
    pub table: Option<Table>,
    #[serde(default)]
    pub chart: Option<ChartSpec>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub empty: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub panels: Vec<Panel>,
}

// =============================================================================
// Log Types
// =============================================================================

/// Log severity level.
///
/// Matches the backend's log levels for SSE streaming.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            LogLevel::Info => "log-info",
            LogLevel::Success => "log-success",
            LogLevel::Warning => "log-warning",
            LogLevel::Error => "log-error",
        }
    }
}

/// A single log entry from the backend, received via SSE from `/api/logs`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub indent: u8,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Entry raised by the frontend itself (request failures).
    pub fn local(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            indent: 0,
            timestamp: Utc::now(),
        }
    }

    pub fn time(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

// =============================================================================
// API Types
// =============================================================================

/// Body of `POST /api/interact`.
#[derive(Clone, Debug, Serialize)]
pub struct InteractRequest<'a> {
    pub state: &'a ViewState,
    pub event: &'a ViewEvent,
}

/// Response of `/api/report` and `/api/interact`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub request_id: String,
    pub state: ViewState,
    pub report: Report,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EntitiesResponse {
    pub count: usize,
    pub entities: Vec<String>,
}

/// Error body returned with non-2xx statuses.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// =============================================================================
// Error Types
// =============================================================================

#[derive(Clone, Debug)]
pub enum AppError {
    /// Network/HTTP error.
    Network(String),
    /// Backend answered with an error status.
    Server { status: u16, message: String },
    /// Response body did not match the expected shape.
    Decode(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Server { status, message } => write!(f, "Server error ({}): {}", status, message),
            AppError::Decode(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_response_decodes() {
        let body = json!({
            "requestId": "9d1c",
            "state": {"page": "analysis", "tab": "gdp", "gdpView": "lowest", "year": 2020},
            "report": {
                "title": "GDP Analysis (2020)",
                "panels": [{
                    "heading": "Lowest GDP per capita",
                    "table": {
                        "columns": [
                            {"key": "entity", "label": "Entity"},
                            {"key": "year", "label": "Year"},
                            {"key": "gdp_per_capita", "label": "GDP per capita"}
                        ],
                        "rows": [["Burundi", 2020, 216.83], ["Chad", 2020, null]]
                    },
                    "chart": {"kind": "bar", "title": "t", "x": "entity", "y": ["gdp_per_capita"], "xLabel": "Country name"},
                    "empty": false
                }]
            }
        });

        let response: ReportResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.state.gdp_view, GdpView::Lowest);
        assert_eq!(response.state.access_view, AccessView::FocusYearData);

        let panel = &response.report.panels[0];
        let table = panel.table.as_ref().unwrap();
        assert_eq!(table.rows[0][1], Cell::Int(2020));
        assert_eq!(table.rows[1][2], Cell::Number(None));
        assert_eq!(table.numbers("gdp_per_capita"), vec![Some(216.83), None]);
        assert_eq!(table.label("gdp_per_capita"), "GDP per capita");

        let chart = panel.chart.as_ref().unwrap();
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.x_label.as_deref(), Some("Country name"));
        assert!(chart.hover.is_empty());
    }

    #[test]
    fn test_text_only_panel_decodes() {
        let panel: Panel = serde_json::from_value(json!({
            "heading": "Objective",
            "notes": ["Explore the dataset."],
            "image": "Energy.webp"
        }))
        .unwrap();
        assert!(panel.table.is_none());
        assert!(!panel.empty);
        assert_eq!(panel.image.as_deref(), Some("Energy.webp"));
    }

    #[test]
    fn test_event_wire_format() {
        let event = ViewEvent::SelectAccessView { view: AccessView::Trends };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "select_access_view", "view": "trends"})
        );

        let state = ViewState::default();
        let request = InteractRequest { state: &state, event: &event };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["state"]["regionalView"], "renewable_map");
        assert_eq!(value["state"]["entity"], serde_json::Value::Null);
    }

    #[test]
    fn test_log_entry_decodes() {
        let entry: LogEntry = serde_json::from_str(
            r#"{"level":"warning","message":"Slow","indent":1,"timestamp":"2024-05-01T08:09:10Z"}"#,
        )
        .unwrap();
        assert_eq!(entry.level, LogLevel::Warning);
        assert_eq!(entry.time(), "08:09:10");
        assert_eq!(entry.level.css_class(), "log-warning");
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Number(Some(12.5)).display(), "12.5");
        assert_eq!(Cell::Number(Some(3.0)).display(), "3");
        assert_eq!(Cell::Number(Some(0.123456)).display(), "0.12");
        assert_eq!(Cell::Number(None).display(), "");
        assert_eq!(Cell::Int(2000).display(), "2000");
    }
}
