//! Report panels: heading, notes, image, chart and table.

use leptos::*;

use super::chart::Chart;
use crate::config::{BACKEND_URL, MAX_TABLE_ROWS};
use crate::types::{Panel, Table};

#[component]
pub fn PanelView(panel: Panel) -> impl IntoView {
    let Panel {
        heading,
        table,
        chart,
        notes,
        image,
        empty,
    } = panel;

    let image = image.map(|path| {
        let src = format!("{}/{}", BACKEND_URL, path);
        view! { <img class="panel-image" src=src alt=heading.clone()/> }
    });

    let notes = notes
        .into_iter()
        .map(|note| view! { <p class="note">{note}</p> })
        .collect_view();

    let content = if empty {
        view! { <p class="no-data">"No data"</p> }.into_view()
    } else {
        let chart = match (chart, table.clone()) {
            (Some(spec), Some(data)) => Some(view! { <Chart spec=spec table=data/> }),
            _ => None,
        };
        let table = table.map(|t| view! { <DataTable table=t/> });
        view! { {chart} {table} }.into_view()
    };

    view! {
        <section class="panel">
            <h3>{heading}</h3>
            {image}
            {notes}
            {content}
        </section>
    }
}

#[component]
pub fn DataTable(table: Table) -> impl IntoView {
    let total = table.rows.len();
    let header = table
        .columns
        .iter()
        .map(|c| view! { <th title=c.key.clone()>{c.label.clone()}</th> })
        .collect_view();
    let rows = table
        .rows
        .iter()
        .take(MAX_TABLE_ROWS)
        .map(|row| {
            let cells = row
                .iter()
                .map(|cell| view! { <td>{cell.display()}</td> })
                .collect_view();
            view! { <tr>{cells}</tr> }
        })
        .collect_view();

    view! {
        <div class="table-wrap">
            <table class="data-table">
                <thead><tr>{header}</tr></thead>
                <tbody>{rows}</tbody>
            </table>
            <Show when=move || { total > MAX_TABLE_ROWS } fallback=|| view! {}>
                <p class="table-note">{format!("Showing the first {} of {} rows", MAX_TABLE_ROWS, total)}</p>
            </Show>
        </div>
    }
}
