use leptos::*;

use crate::types::{Page, ViewEvent, ViewState};

/// Title bar with the page navigation radio.
#[component]
pub fn Header(state: ReadSignal<ViewState>, on_event: Callback<ViewEvent>) -> impl IntoView {
    let options = Page::ALL
        .into_iter()
        .map(|page| {
            view! {
                <label class="nav-option" class:active=move || state.get().page == page>
                    <input
                        type="radio"
                        name="page"
                        prop:checked=move || state.get().page == page
                        on:change=move |_| on_event.call(ViewEvent::Navigate { page })
                    />
                    {page.label()}
                </label>
            }
        })
        .collect_view();

    view! {
        <header>
            <div class="header-left">
                <a href="#" class="logo">"Sustainable Energy Explorer"</a>
                <span class="badge">"2000-2020"</span>
            </div>
            <nav class="page-nav">{options}</nav>
        </header>
    }
}
