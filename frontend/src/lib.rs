//! Energy Explorer - Frontend Rust/Leptos Application
//!
//! A WebAssembly dashboard over the sustainable energy backend. It keeps
//! the current [`ViewState`], sends each user interaction to the backend
//! and renders the report that comes back.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (page navigation)                                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (report title)                                     │
//! │  ├── TabBar / ViewSelector / YearPicker / EntityPicker       │
//! │  ├── PanelView* (notes, chart, table)                        │
//! │  └── LogsPanel (server activity)                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - API types mirrored from the backend
//! - [`components`] - UI components
//! - [`services`] - Backend communication

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod components;
pub mod config;
pub mod services;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::*;

pub use types::{
    // View
    AccessView, AnalysisTab, GdpView, Page, RegionalView, ViewEvent, ViewState,
    // Report
    Cell, ChartKind, ChartSpec, Column, Panel, Report, Table,
    // Logs
    LogEntry, LogLevel,
    // API
    EntitiesResponse, ReportResponse,
    // Errors
    AppError, AppResult,
};

pub use components::*;
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 Energy Explorer - Starting Leptos App");

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let (state, set_state) = create_signal(ViewState::default());
    let (report, set_report) = create_signal(None::<Report>);
    let (entities, set_entities) = create_signal(Vec::<String>::new());
    let (loading, set_loading) = create_signal(false);
    let (logs, set_logs) = create_signal(Vec::<LogEntry>::new());

    init_sse_logs(set_logs);

    let report_error = move |err: AppError| {
        log::error!("❌ {}", err);
        set_logs.update(|logs| push_log(logs, LogEntry::local(LogLevel::Error, err.to_string())));
    };

    // Initial report and the entity list for the dropdown.
    spawn_local(async move {
        set_loading.set(true);
        match fetch_report(&ViewState::default()).await {
            Ok(response) => {
                set_state.set(response.state);
                set_report.set(Some(response.report));
            }
            Err(e) => report_error(e),
        }
        set_loading.set(false);
    });
    spawn_local(async move {
        match fetch_entities().await {
            Ok(list) => {
                log::info!("🌍 {} entities", list.len());
                set_entities.set(list);
            }
            Err(e) => report_error(e),
        }
    });

    // Every control goes through here: the backend applies the event and
    // returns the next state with its report. On failure the view stays put.
    let dispatch = Callback::new(move |event: ViewEvent| {
        let current = state.get_untracked();
        spawn_local(async move {
            set_loading.set(true);
            match interact(&current, &event).await {
                Ok(response) => {
                    log::debug!("report {} -> {}", response.request_id, response.report.title);
                    set_state.set(response.state);
                    set_report.set(Some(response.report));
                }
                Err(e) => report_error(e),
            }
            set_loading.set(false);
        });
    });

    let title = Signal::derive(move || {
        report
            .with(|r| r.as_ref().map(|r| r.title.clone()))
            .unwrap_or_else(|| "Sustainable Energy Explorer".to_string())
    });

    let panels = move || {
        report
            .get()
            .map(|r| {
                r.panels
                    .into_iter()
                    .map(|panel| view! { <PanelView panel=panel/> })
                    .collect_view()
            })
            .unwrap_or_else(|| ().into_view())
    };

    view! {
        <Title text=move || title.get()/>
        <Header state=state on_event=dispatch/>

        <div class="container">
            <Hero title=title loading=loading/>

            <Show when=move || state.get().page == Page::Analysis fallback=|| view! {}>
                <div class="controls">
                    <TabBar state=state on_event=dispatch/>
                    <div class="control-row">
                        <ViewSelector state=state on_event=dispatch/>
                        <YearPicker state=state on_event=dispatch/>
                        <EntityPicker state=state entities=entities on_event=dispatch/>
                    </div>
                </div>
            </Show>

            <div class="panels">{panels}</div>

            <Show when=move || !logs.get().is_empty() fallback=|| view! {}>
                <LogsPanel logs=logs set_logs=set_logs/>
            </Show>
        </div>

        <Footer/>
    }
}
