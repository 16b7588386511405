//! SVG rendering of report chart specs.
//!
//! Every chart reads its marks from the panel's table through the column
//! keys named in the [`ChartSpec`]; see [`super::plot`] for the geometry.

use leptos::*;

use super::plot::{
    bars, compact, diverging, extent, frames, heat_grid, line_series, points, project, ramp, ticks,
    tiles, x_range, y_range, LinearScale, Point, DEFAULT_FILL, MISSING_FILL, PALETTE,
};
use crate::config::{CHART_HEIGHT, CHART_WIDTH};
use crate::types::{format_number, ChartKind, ChartSpec, Table};

const TICK_COUNT: usize = 5;
const TILE_COLUMNS: usize = 8;
const TILE_HEIGHT: f64 = 26.0;

fn px(v: f64) -> String {
    format!("{:.1}", v)
}

fn view_box(height: f64) -> String {
    format!("0 0 {} {}", CHART_WIDTH, height)
}

#[component]
pub fn Chart(spec: ChartSpec, table: Table) -> impl IntoView {
    let title = spec.title.clone();
    let body = match spec.kind {
        ChartKind::Bar => bar_chart(&spec, &table),
        ChartKind::Line => line_chart(&spec, &table),
        ChartKind::Scatter => scatter_chart(&spec, &table),
        ChartKind::Heatmap => heatmap(&spec, &table),
        ChartKind::ScatterGeo => geo_chart(&spec, &table),
        ChartKind::Choropleth => view! { <TileMap spec=spec table=table/> }.into_view(),
    };

    view! {
        <figure class="chart">
            <figcaption>{title}</figcaption>
            {body}
        </figure>
    }
}

fn no_values() -> View {
    view! { <p class="no-data">"No values to plot"</p> }.into_view()
}

// =============================================================================
// Axes
// =============================================================================

fn y_axis(scale: &LinearScale) -> View {
    let (lo, hi) = scale.domain();
    let (left, right) = x_range();
    ticks(lo, hi, TICK_COUNT)
        .into_iter()
        .map(|t| {
            let y = px(scale.map(t));
            view! {
                <g class="tick">
                    <line x1=px(left) x2=px(right) y1=y.clone() y2=y.clone() stroke="#eee"/>
                    <text x=px(left - 6.0) y=y text-anchor="end" dominant-baseline="middle" font-size="10">
                        {compact(t)}
                    </text>
                </g>
            }
        })
        .collect_view()
}

fn x_axis(scale: &LinearScale) -> View {
    let (lo, hi) = scale.domain();
    let (bottom, _) = y_range();
    ticks(lo, hi, TICK_COUNT)
        .into_iter()
        .map(|t| {
            let x = px(scale.map(t));
            view! {
                <text x=x y=px(bottom + 16.0) text-anchor="middle" font-size="10">
                    {compact(t)}
                </text>
            }
        })
        .collect_view()
}

fn axis_labels(spec: &ChartSpec, table: &Table) -> View {
    let (left, right) = x_range();
    let (bottom, top) = y_range();
    let x_label = spec.x_label.clone().unwrap_or_else(|| table.label(&spec.x));
    let y_label = spec
        .y_label
        .clone()
        .or_else(|| spec.y.first().map(|k| table.label(k)))
        .unwrap_or_default();
    let mid_y = (bottom + top) / 2.0;

    view! {
        <text x=px((left + right) / 2.0) y=px(CHART_HEIGHT - 6.0) text-anchor="middle" font-size="11">
            {x_label}
        </text>
        <text
            x="14"
            y=px(mid_y)
            text-anchor="middle"
            font-size="11"
            transform=format!("rotate(-90 14 {})", px(mid_y))
        >
            {y_label}
        </text>
    }
    .into_view()
}

// =============================================================================
// Charts
// =============================================================================

fn bar_chart(spec: &ChartSpec, table: &Table) -> View {
    let marks = bars(table, spec);
    let Some((lo, hi)) = extent(marks.iter().map(|b| b.1)) else {
        return no_values();
    };
    let (left, right) = x_range();
    let (bottom, top) = y_range();
    // Bars grow from zero.
    let y = LinearScale::new((lo.min(0.0), hi.max(0.0)), (bottom, top));
    let shade = LinearScale::new((lo, hi), (0.0, 1.0));
    let band = (right - left) / marks.len() as f64;
    let colored = spec.color.is_some();

    let rects = marks
        .into_iter()
        .enumerate()
        .map(|(i, (name, value))| {
            let x = left + band * i as f64 + band * 0.1;
            let (y0, y1) = (y.map(value.max(0.0)), y.map(value.min(0.0)));
            let fill = if colored {
                ramp(shade.normalize(value))
            } else {
                DEFAULT_FILL.to_string()
            };
            let tip = format!("{}: {}", name, format_number(value));
            let label_x = px(x + band * 0.4);
            let label_y = px(bottom + 10.0);
            let rotate = format!("rotate(40 {} {})", label_x, label_y);
            view! {
                <g class="bar">
                    <rect x=px(x) y=px(y0) width=px(band * 0.8) height=px((y1 - y0).max(0.5)) fill=fill>
                        <title>{tip}</title>
                    </rect>
                    <text x=label_x y=label_y transform=rotate font-size="9">{name}</text>
                </g>
            }
        })
        .collect_view();

    view! {
        <svg class="chart-svg" viewBox=view_box(CHART_HEIGHT)>
            {y_axis(&y)}
            {rects}
            {axis_labels(spec, table)}
        </svg>
    }
    .into_view()
}

fn line_chart(spec: &ChartSpec, table: &Table) -> View {
    let series = line_series(table, spec);
    let all = || series.iter().flat_map(|s| s.points.iter());
    let (Some(xs), Some(ys)) = (extent(all().map(|p| p.0)), extent(all().map(|p| p.1))) else {
        return no_values();
    };
    let x = LinearScale::new(xs, x_range());
    let y = LinearScale::new(ys, y_range());
    let (_, right) = x_range();

    let lines = series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let stroke = PALETTE[i % PALETTE.len()];
            let path = s
                .points
                .iter()
                .map(|(vx, vy)| format!("{},{}", px(x.map(*vx)), px(y.map(*vy))))
                .collect::<Vec<_>>()
                .join(" ");
            let legend_y = px(y_range().1 + 12.0 * i as f64);
            view! {
                <g class="series">
                    <polyline points=path fill="none" stroke=stroke stroke-width="2">
                        <title>{s.name.clone()}</title>
                    </polyline>
                    <text x=px(right - 4.0) y=legend_y text-anchor="end" font-size="10" fill=stroke>
                        {s.name.clone()}
                    </text>
                </g>
            }
        })
        .collect_view();

    view! {
        <svg class="chart-svg" viewBox=view_box(CHART_HEIGHT)>
            {y_axis(&y)}
            {x_axis(&x)}
            {lines}
            {axis_labels(spec, table)}
        </svg>
    }
    .into_view()
}

fn scatter_chart(spec: &ChartSpec, table: &Table) -> View {
    let marks = points(table, spec);
    let (Some(xs), Some(ys)) = (
        extent(marks.iter().map(|p| p.x)),
        extent(marks.iter().map(|p| p.y)),
    ) else {
        return no_values();
    };
    let x = LinearScale::new(xs, x_range());
    let y = LinearScale::new(ys, y_range());
    let dots = dots(&marks, |p| (x.map(p.x), y.map(p.y)));

    view! {
        <svg class="chart-svg" viewBox=view_box(CHART_HEIGHT)>
            {y_axis(&y)}
            {x_axis(&x)}
            {dots}
            {axis_labels(spec, table)}
        </svg>
    }
    .into_view()
}

fn geo_chart(spec: &ChartSpec, table: &Table) -> View {
    let marks = points(table, spec);
    if marks.is_empty() {
        return no_values();
    }
    // Points are (longitude, latitude).
    let dots = dots(&marks, |p| project(p.x, p.y));
    let graticule = [-60.0, -30.0, 0.0, 30.0, 60.0]
        .into_iter()
        .map(|lat| {
            let (_, y) = project(0.0, lat);
            view! { <line x1="0" x2=px(CHART_WIDTH) y1=px(y) y2=px(y) stroke="#e5e5e5"/> }
        })
        .chain([-120.0, -60.0, 0.0, 60.0, 120.0].into_iter().map(|lon| {
            let (x, _) = project(lon, 0.0);
            view! { <line x1=px(x) x2=px(x) y1="0" y2=px(CHART_HEIGHT) stroke="#e5e5e5"/> }
        }))
        .collect_view();

    view! {
        <svg class="chart-svg geo" viewBox=view_box(CHART_HEIGHT)>
            <rect x="0" y="0" width=px(CHART_WIDTH) height=px(CHART_HEIGHT) fill="#f4f8fb"/>
            {graticule}
            {dots}
        </svg>
    }
    .into_view()
}

/// Circles for scatter-like charts: color and size channels are scaled
/// over the extent of the plotted values.
fn dots(marks: &[Point], position: impl Fn(&Point) -> (f64, f64)) -> View {
    let color_scale = extent(marks.iter().filter_map(|p| p.color)).map(|d| LinearScale::new(d, (0.0, 1.0)));
    let size_scale = extent(marks.iter().filter_map(|p| p.size)).map(|d| LinearScale::new(d, (0.0, 1.0)));

    marks
        .iter()
        .map(|p| {
            let (cx, cy) = position(p);
            let fill = match (p.color, color_scale) {
                (Some(c), Some(scale)) => ramp(scale.normalize(c)),
                (None, Some(_)) => MISSING_FILL.to_string(),
                _ => DEFAULT_FILL.to_string(),
            };
            let r = match (p.size, size_scale) {
                (Some(s), Some(scale)) => 3.0 + 11.0 * scale.normalize(s).sqrt(),
                _ => 4.0,
            };
            view! {
                <circle cx=px(cx) cy=px(cy) r=px(r) fill=fill fill-opacity="0.8" stroke="#555" stroke-width="0.5">
                    <title>{p.hover.clone()}</title>
                </circle>
            }
        })
        .collect_view()
}

fn heatmap(spec: &ChartSpec, table: &Table) -> View {
    let (labels, grid) = heat_grid(table, spec);
    if labels.is_empty() || spec.y.is_empty() {
        return no_values();
    }
    let left = 150.0;
    let top = 60.0;
    let cell_w = (CHART_WIDTH - left - 10.0) / spec.y.len() as f64;
    let cell_h = 32.0;
    let height = top + cell_h * labels.len() as f64 + 10.0;

    let headers = spec
        .y
        .iter()
        .enumerate()
        .map(|(j, key)| {
            let x = px(left + cell_w * (j as f64 + 0.5));
            let y = px(top - 8.0);
            let rotate = format!("rotate(-30 {} {})", x, y);
            view! { <text x=x y=y transform=rotate font-size="10">{table.label(key)}</text> }
        })
        .collect_view();

    let cells = grid
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let y = top + cell_h * i as f64;
            let name = table.label(&labels[i]);
            let row_cells = row
                .into_iter()
                .enumerate()
                .map(|(j, value)| {
                    let x = left + cell_w * j as f64;
                    let (fill, text) = match value {
                        Some(v) => (diverging(v), format!("{:.2}", v)),
                        None => (MISSING_FILL.to_string(), String::new()),
                    };
                    view! {
                        <rect x=px(x) y=px(y) width=px(cell_w) height=px(cell_h) fill=fill stroke="#fff"/>
                        <text
                            x=px(x + cell_w / 2.0)
                            y=px(y + cell_h / 2.0)
                            text-anchor="middle"
                            dominant-baseline="middle"
                            font-size="10"
                        >
                            {text}
                        </text>
                    }
                })
                .collect_view();
            view! {
                <g class="heat-row">
                    <text x=px(left - 6.0) y=px(y + cell_h / 2.0) text-anchor="end" dominant-baseline="middle" font-size="10">
                        {name}
                    </text>
                    {row_cells}
                </g>
            }
        })
        .collect_view();

    view! {
        <svg class="chart-svg" viewBox=view_box(height)>
            {headers}
            {cells}
        </svg>
    }
    .into_view()
}

/// Choropleth without borders: one colored tile per entity, with a frame
/// selector when the spec animates over a column.
#[component]
fn TileMap(spec: ChartSpec, table: Table) -> impl IntoView {
    let frame_values = spec
        .animation_frame
        .as_deref()
        .map(|key| frames(&table, key))
        .unwrap_or_default();
    let (frame, set_frame) = create_signal(frame_values.last().copied());
    let color_scale = spec
        .color
        .as_deref()
        .and_then(|key| extent(table.numbers(key).into_iter().flatten()))
        .map(|d| LinearScale::new(d, (0.0, 1.0)));
    let frame_label = spec
        .animation_frame
        .as_deref()
        .map(|key| table.label(key))
        .unwrap_or_default();
    let legend = spec.color.as_deref().map(|key| table.label(key)).unwrap_or_default();

    let selector = (!frame_values.is_empty()).then(|| {
        let options = frame_values
            .iter()
            .map(|f| {
                let f = *f;
                view! { <option value=f.to_string() selected=move || frame.get() == Some(f)>{f}</option> }
            })
            .collect_view();
        view! {
            <label class="frame-select">
                {frame_label} " "
                <select on:change=move |ev| set_frame.set(event_target_value(&ev).parse().ok())>
                    {options}
                </select>
            </label>
        }
    });

    let grid = move || {
        let marks = tiles(&table, &spec, frame.get());
        if marks.is_empty() {
            return no_values();
        }
        let tile_w = CHART_WIDTH / TILE_COLUMNS as f64;
        let rows = marks.len().div_ceil(TILE_COLUMNS);
        let height = TILE_HEIGHT * rows as f64;
        let cells = marks
            .into_iter()
            .enumerate()
            .map(|(i, tile)| {
                let x = tile_w * (i % TILE_COLUMNS) as f64;
                let y = TILE_HEIGHT * (i / TILE_COLUMNS) as f64;
                let fill = match (tile.value, color_scale) {
                    (Some(v), Some(scale)) => ramp(scale.normalize(v)),
                    _ => MISSING_FILL.to_string(),
                };
                let short: String = tile.name.chars().take(14).collect();
                let tip = format!("{}\n{}", tile.name, tile.hover);
                view! {
                    <g class="tile">
                        <rect x=px(x) y=px(y) width=px(tile_w - 2.0) height=px(TILE_HEIGHT - 2.0) fill=fill>
                            <title>{tip}</title>
                        </rect>
                        <text x=px(x + 4.0) y=px(y + TILE_HEIGHT / 2.0) dominant-baseline="middle" font-size="9">
                            {short}
                        </text>
                    </g>
                }
            })
            .collect_view();
        view! { <svg class="chart-svg tiles" viewBox=view_box(height)>{cells}</svg> }.into_view()
    };

    view! {
        <div class="tile-map">
            {selector}
            <p class="legend">{legend}</p>
            {grid}
        </div>
    }
}
