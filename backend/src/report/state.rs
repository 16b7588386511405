//! Dashboard view state and the events that move it.
//!
//! The state is a plain value: every report call receives it, and
//! [`ViewState::apply`] derives the next one from the previous state plus
//! a single [`ViewEvent`].

use serde::{Deserialize, Serialize};

/// Focus year used by year-filtered reports unless the user picks another.
pub const DEFAULT_FOCUS_YEAR: i32 = 2020;

/// Top-level navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
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

/// Tabs of the analysis page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GdpView {
    #[default]
    Highest,
    Lowest,
    LowestTrend,
    HighestTrend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessView {
    #[default]
    FocusYearData,
    Correlations,
    Graphs,
    Trends,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionalView {
    #[default]
    RenewableMap,
    GeographicInfluence,
    GdpVsEnergy,
}

/// Everything the user has selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    pub page: Page,
    pub tab: AnalysisTab,
    pub gdp_view: GdpView,
    pub access_view: AccessView,
    pub regional_view: RegionalView,
    /// Free-text or dropdown entity; `None` means the first entity.
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
            year: DEFAULT_FOCUS_YEAR,
        }
    }
}

/// A single user interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

impl ViewState {
    /// Next state after `event`. Only the field the event targets changes.
    pub fn apply(&self, event: ViewEvent) -> ViewState {
        let mut next = self.clone();
        match event {
            ViewEvent::Navigate { page } => next.page = page,
            ViewEvent::SelectTab { tab } => next.tab = tab,
            ViewEvent::SelectGdpView { view } => next.gdp_view = view,
            ViewEvent::SelectAccessView { view } => next.access_view = view,
            ViewEvent::SelectRegionalView { view } => next.regional_view = view,
            ViewEvent::SelectEntity { entity } => {
                next.entity = entity
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty());
            }
            ViewEvent::SelectYear { year } => next.year = year,
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_state() {
        let state = ViewState::default();
        assert_eq!(state.page, Page::Methodology);
        assert_eq!(state.year, 2020);
        assert_eq!(state.entity, None);
    }

    #[test]
    fn test_events_only_touch_their_field() {
        let start = ViewState {
            page: Page::Analysis,
            entity: Some("Chad".into()),
            ..ViewState::default()
        };

        let next = start.apply(ViewEvent::SelectTab {
            tab: AnalysisTab::RegionalInsights,
        });
        assert_eq!(next.tab, AnalysisTab::RegionalInsights);
        assert_eq!(next.page, Page::Analysis);
        assert_eq!(next.entity.as_deref(), Some("Chad"));

        let next = next.apply(ViewEvent::SelectAccessView {
            view: AccessView::Graphs,
        });
        assert_eq!(next.access_view, AccessView::Graphs);
        assert_eq!(next.tab, AnalysisTab::RegionalInsights);

        let next = next.apply(ViewEvent::Navigate { page: Page::Overview });
        assert_eq!(next.page, Page::Overview);
        assert_eq!(next.access_view, AccessView::Graphs);
    }

    #[test]
    fn test_blank_entity_clears_selection() {
        let state = ViewState::default().apply(ViewEvent::SelectEntity {
            entity: Some(" Norway ".into()),
        });
        assert_eq!(state.entity.as_deref(), Some("Norway"));

        let state = state.apply(ViewEvent::SelectEntity {
            entity: Some("   ".into()),
        });
        assert_eq!(state.entity, None);
    }

    #[test]
    fn test_apply_does_not_mutate_previous_state() {
        let start = ViewState::default();
        let _ = start.apply(ViewEvent::SelectYear { year: 2010 });
        assert_eq!(start.year, 2020);
    }

    #[test]
    fn test_wire_format() {
        let state: ViewState = serde_json::from_value(json!({
            "page": "analysis",
            "tab": "electricity_access",
            "accessView": "trends"
        }))
        .unwrap();
        assert_eq!(state.tab, AnalysisTab::ElectricityAccess);
        assert_eq!(state.access_view, AccessView::Trends);
        assert_eq!(state.year, 2020);

        let event: ViewEvent =
            serde_json::from_value(json!({"type": "select_gdp_view", "view": "lowest_trend"})).unwrap();
        assert_eq!(event, ViewEvent::SelectGdpView { view: GdpView::LowestTrend });
    }
}
