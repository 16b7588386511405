//! Analysis controls: tab bar, display-mode selector, year and entity pickers.
//!
//! Controls never change the state themselves; they emit a [`ViewEvent`]
//! and the app applies it through the backend.

use leptos::*;

use crate::config::MAX_ENTITY_OPTIONS;
use crate::types::{AccessView, AnalysisTab, GdpView, RegionalView, ViewEvent, ViewState};

#[component]
pub fn TabBar(state: ReadSignal<ViewState>, on_event: Callback<ViewEvent>) -> impl IntoView {
    let tabs = AnalysisTab::ALL
        .into_iter()
        .map(|tab| {
            view! {
                <button
                    class="tab"
                    class:active=move || state.get().tab == tab
                    on:click=move |_| on_event.call(ViewEvent::SelectTab { tab })
                >
                    {tab.label()}
                </button>
            }
        })
        .collect_view();

    view! { <div class="tab-bar">{tabs}</div> }
}

/// Dropdown over a fixed list of display modes.
fn mode_select<T>(
    label: &'static str,
    options: &'static [T],
    name: fn(T) -> &'static str,
    current: impl Fn() -> T + Copy + 'static,
    on_pick: impl Fn(T) + 'static,
) -> impl IntoView
where
    T: Copy + PartialEq + 'static,
{
    let items = options
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let opt = *opt;
            view! { <option value=i.to_string() selected=move || current() == opt>{name(opt)}</option> }
        })
        .collect_view();

    view! {
        <label class="mode-select">
            {label} " "
            <select on:change=move |ev| {
                if let Some(opt) = event_target_value(&ev).parse::<usize>().ok().and_then(|i| options.get(i)) {
                    on_pick(*opt);
                }
            }>
                {items}
            </select>
        </label>
    }
}

/// Display-mode selector of the current tab (none for single-view tabs).
#[component]
pub fn ViewSelector(state: ReadSignal<ViewState>, on_event: Callback<ViewEvent>) -> impl IntoView {
    move || match state.get().tab {
        AnalysisTab::Gdp => mode_select(
            "Display",
            &GdpView::ALL,
            GdpView::label,
            move || state.get().gdp_view,
            move |view| on_event.call(ViewEvent::SelectGdpView { view }),
        )
        .into_view(),
        AnalysisTab::ElectricityAccess => mode_select(
            "Display",
            &AccessView::ALL,
            AccessView::label,
            move || state.get().access_view,
            move |view| on_event.call(ViewEvent::SelectAccessView { view }),
        )
        .into_view(),
        AnalysisTab::RegionalInsights => mode_select(
            "Display",
            &RegionalView::ALL,
            RegionalView::label,
            move || state.get().regional_view,
            move |view| on_event.call(ViewEvent::SelectRegionalView { view }),
        )
        .into_view(),
        AnalysisTab::LowCarbonLeaders | AnalysisTab::EmissionReduction => ().into_view(),
    }
}

/// Focus year for the year-filtered tabs.
#[component]
pub fn YearPicker(state: ReadSignal<ViewState>, on_event: Callback<ViewEvent>) -> impl IntoView {
    view! {
        <Show
            when=move || matches!(state.get().tab, AnalysisTab::Gdp | AnalysisTab::ElectricityAccess)
            fallback=|| view! {}
        >
            <label class="year-picker">
                "Year "
                <input
                    type="number"
                    min="2000"
                    max="2020"
                    prop:value=move || state.get().year.to_string()
                    on:change=move |ev| {
                        if let Ok(year) = event_target_value(&ev).trim().parse::<i32>() {
                            on_event.call(ViewEvent::SelectYear { year });
                        }
                    }
                />
            </label>
        </Show>
    }
}

/// Names containing `filter` (case-insensitive), capped for the dropdown.
pub fn filter_entities(entities: &[String], filter: &str) -> Vec<String> {
    let needle = filter.trim().to_lowercase();
    entities
        .iter()
        .filter(|e| needle.is_empty() || e.to_lowercase().contains(&needle))
        .take(MAX_ENTITY_OPTIONS)
        .cloned()
        .collect()
}

/// Entity dropdown with a free-text filter, shown on the access trends view.
///
/// Enter in the filter box submits the typed text as-is; the backend
/// resolves prefixes and case.
#[component]
pub fn EntityPicker(
    state: ReadSignal<ViewState>,
    entities: ReadSignal<Vec<String>>,
    on_event: Callback<ViewEvent>,
) -> impl IntoView {
    let (filter, set_filter) = create_signal(String::new());
    let matches = move || entities.with(|all| filter_entities(all, &filter.get()));

    view! {
        <Show
            when=move || {
                let s = state.get();
                s.tab == AnalysisTab::ElectricityAccess && s.access_view == AccessView::Trends
            }
            fallback=|| view! {}
        >
            <div class="entity-picker">
                <input
                    type="text"
                    placeholder="Filter countries"
                    prop:value=move || filter.get()
                    on:input=move |ev| set_filter.set(event_target_value(&ev))
                    on:keydown=move |ev: ev::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            on_event.call(ViewEvent::SelectEntity { entity: Some(filter.get_untracked()) });
                        }
                    }
                />
                <select on:change=move |ev| {
                    let name = event_target_value(&ev);
                    on_event.call(ViewEvent::SelectEntity { entity: (!name.is_empty()).then_some(name) });
                }>
                    <option value="" selected=move || state.get().entity.is_none()>"First country"</option>
                    <For
                        each=matches
                        key=|name| name.clone()
                        children=move |name| {
                            let value = name.clone();
                            let current = name.clone();
                            view! {
                                <option
                                    value=value
                                    selected=move || state.get().entity.as_deref() == Some(current.as_str())
                                >
                                    {name}
                                </option>
                            }
                        }
                    />
                </select>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let all = names(&["Denmark", "Niger", "Nigeria", "Sweden"]);
        assert_eq!(filter_entities(&all, "NIG"), names(&["Niger", "Nigeria"]));
        assert_eq!(filter_entities(&all, "  "), all);
        assert!(filter_entities(&all, "atlantis").is_empty());
    }

    #[test]
    fn test_filter_caps_options() {
        let all: Vec<String> = (0..MAX_ENTITY_OPTIONS + 10).map(|i| format!("Country {i}")).collect();
        assert_eq!(filter_entities(&all, "").len(), MAX_ENTITY_OPTIONS);
    }
}
