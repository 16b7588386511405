//! Report builder: turns a [`ViewState`] into renderable panels.
//!
//! ```text
//! ViewState ──▶ build_report ──▶ query::* ──▶ Report { panels: [table + chart] }
//! ```
//!
//! Reports describe *what* to draw (tables and chart specs that reference
//! table columns by key). Drawing is the frontend's job.

mod analysis;
mod pages;
pub mod state;

pub use pages::{glossary, FieldInfo};
pub use state::{
    AccessView, AnalysisTab, GdpView, Page, RegionalView, ViewEvent, ViewState, DEFAULT_FOCUS_YEAR,
};

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::QueryResult;
use crate::models::Table;

/// Landing image served from the static directory.
pub const LANDING_IMAGE: &str = "Energy.webp";

// =============================================================================
// Chart spec
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
    /// `x` is the row-label column, `y` the value columns.
    Heatmap,
    /// `x` is the location (entity name) column.
    Choropleth,
    /// `x` is longitude, `y[0]` latitude.
    ScatterGeo,
}

/// How to draw a panel's table. Every name refers to a table column key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x: String,
    pub y: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hover: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_frame: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: impl Into<String>, x: &str, y: &[&str]) -> Self {
        Self {
            kind,
            title: title.into(),
            x: x.to_string(),
            y: y.iter().map(|s| s.to_string()).collect(),
            color: None,
            size: None,
            hover: Vec::new(),
            animation_frame: None,
            x_label: None,
            y_label: None,
        }
    }

    pub fn color(mut self, key: &str) -> Self {
        self.color = Some(key.to_string());
        self
    }

    pub fn size(mut self, key: &str) -> Self {
        self.size = Some(key.to_string());
        self
    }

    pub fn hover(mut self, keys: &[&str]) -> Self {
        self.hover = keys.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn animate(mut self, key: &str) -> Self {
        self.animation_frame = Some(key.to_string());
        self
    }

    pub fn labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = Some(x.into());
        self.y_label = Some(y.into());
        self
    }
}

// =============================================================================
// Report
// =============================================================================

/// One block of a report: heading, optional table/chart/notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub heading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Set when the panel has a table with no rows.
    #[serde(default)]
    pub empty: bool,
}

impl Panel {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            table: None,
            chart: None,
            notes: Vec::new(),
            image: None,
            empty: false,
        }
    }

    pub fn table(mut self, table: Table) -> Self {
        self.empty = table.is_empty();
        self.table = Some(table);
        self
    }

    pub fn chart(mut self, chart: ChartSpec) -> Self {
        self.chart = Some(chart);
        self
    }

    pub fn notes<I, S>(mut self, notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notes.extend(notes.into_iter().map(Into::into));
        self
    }

    pub fn image(mut self, path: &str) -> Self {
        self.image = Some(path.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub panels: Vec<Panel>,
}

impl Report {
    pub fn new(title: impl Into<String>, panels: Vec<Panel>) -> Self {
        Self {
            title: title.into(),
            panels,
        }
    }
}

/// Build the report for the current view.
pub fn build_report(dataset: &Dataset, state: &ViewState) -> QueryResult<Report> {
    match state.page {
        Page::Methodology => Ok(pages::methodology()),
        Page::Overview => Ok(pages::overview(dataset)),
        Page::Features => Ok(pages::features()),
        Page::Conclusion => Ok(pages::conclusion()),
        Page::Analysis => match state.tab {
            AnalysisTab::Gdp => analysis::gdp(dataset, state),
            AnalysisTab::ElectricityAccess => analysis::electricity_access(dataset, state),
            AnalysisTab::RegionalInsights => analysis::regional_insights(dataset, state),
            AnalysisTab::LowCarbonLeaders => analysis::low_carbon_leaders(dataset),
            AnalysisTab::EmissionReduction => Ok(analysis::emission_reduction(dataset)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures::energy;

    fn all_states() -> Vec<ViewState> {
        let mut states: Vec<ViewState> = Page::ALL
            .into_iter()
            .map(|page| ViewState {
                page,
                ..ViewState::default()
            })
            .collect();

        let analysis = ViewState::default().apply(ViewEvent::Navigate { page: Page::Analysis });
        for tab in AnalysisTab::ALL {
            states.push(analysis.apply(ViewEvent::SelectTab { tab }));
        }
        for view in [GdpView::Highest, GdpView::Lowest, GdpView::LowestTrend, GdpView::HighestTrend] {
            states.push(analysis.apply(ViewEvent::SelectGdpView { view }));
        }
        let access = analysis.apply(ViewEvent::SelectTab {
            tab: AnalysisTab::ElectricityAccess,
        });
        for view in [
            AccessView::FocusYearData,
            AccessView::Correlations,
            AccessView::Graphs,
            AccessView::Trends,
            AccessView::Summary,
        ] {
            states.push(access.apply(ViewEvent::SelectAccessView { view }));
        }
        let regional = analysis.apply(ViewEvent::SelectTab {
            tab: AnalysisTab::RegionalInsights,
        });
        for view in [
            RegionalView::RenewableMap,
            RegionalView::GeographicInfluence,
            RegionalView::GdpVsEnergy,
        ] {
            states.push(regional.apply(ViewEvent::SelectRegionalView { view }));
        }
        states
    }

    #[test]
    fn test_every_view_builds() {
        let dataset = energy();
        for state in all_states() {
            let report = build_report(&dataset, &state).unwrap();
            assert!(!report.title.is_empty());
            assert!(!report.panels.is_empty(), "{state:?}");
        }
    }

    #[test]
    fn test_chart_columns_exist_in_table() {
        let dataset = energy();
        for state in all_states() {
            for panel in build_report(&dataset, &state).unwrap().panels {
                let (Some(chart), Some(table)) = (&panel.chart, &panel.table) else {
                    continue;
                };
                let mut keys = vec![&chart.x];
                keys.extend(&chart.y);
                keys.extend(chart.color.iter().chain(&chart.size).chain(&chart.animation_frame));
                keys.extend(&chart.hover);
                for key in keys {
                    assert!(table.column_index(key).is_some(), "{}: missing {key}", panel.heading);
                }
            }
        }
    }

    #[test]
    fn test_report_is_idempotent() {
        let dataset = energy();
        for state in all_states() {
            assert_eq!(build_report(&dataset, &state), build_report(&dataset, &state));
        }
    }

    #[test]
    fn test_empty_panel_flag() {
        let panel = Panel::new("Nothing").table(Table::default());
        assert!(panel.empty);
        assert!(!Panel::new("Text").notes(["a"]).empty);
    }
}
