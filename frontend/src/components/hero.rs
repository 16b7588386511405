//! Hero section component

use leptos::*;

/// Title of the current report, with a loading marker while a request runs.
#[component]
pub fn Hero(title: Signal<String>, loading: ReadSignal<bool>) -> impl IntoView {
    view! {
        <div class="hero">
            <h1>{move || title.get()}</h1>
            <p class="subtitle">
                "Global sustainable energy indicators: electricity access, renewables, "
                "emissions and economic context for every country from 2000 to 2020."
            </p>
            <Show when=move || loading.get() fallback=|| view! {}>
                <span class="loading">"Loading..."</span>
            </Show>
        </div>
    }
}
