//! Chart geometry: scales, color ramps and the extraction of drawable
//! marks from a report table. Pure functions, rendered by [`super::chart`].

use crate::config::{CHART_HEIGHT, CHART_WIDTH};
use crate::types::{format_number, ChartSpec, Table};

pub const MARGIN_LEFT: f64 = 72.0;
pub const MARGIN_RIGHT: f64 = 20.0;
pub const MARGIN_TOP: f64 = 16.0;
pub const MARGIN_BOTTOM: f64 = 72.0;

/// Horizontal pixel range of the plot area.
pub fn x_range() -> (f64, f64) {
    (MARGIN_LEFT, CHART_WIDTH - MARGIN_RIGHT)
}

/// Vertical pixel range of the plot area, bottom first.
pub fn y_range() -> (f64, f64) {
    (CHART_HEIGHT - MARGIN_BOTTOM, MARGIN_TOP)
}

// =============================================================================
// Scales
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// A zero-width domain is widened so single values land mid-range.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (lo, hi) = domain;
        let domain = if hi > lo {
            (lo, hi)
        } else {
            let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.5 };
            (lo - pad, lo + pad)
        };
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Position of `v` in the domain, clamped to [0, 1].
    pub fn normalize(&self, v: f64) -> f64 {
        let (lo, hi) = self.domain;
        ((v - lo) / (hi - lo)).clamp(0.0, 1.0)
    }

    pub fn map(&self, v: f64) -> f64 {
        let (r0, r1) = self.range;
        r0 + self.normalize(v) * (r1 - r0)
    }
}

/// Min and max of the finite values.
pub fn extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Round tick positions covering `[lo, hi]`, about `count` of them.
pub fn ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    let raw = (hi - lo) / count.max(1) as f64;
    if !(raw > 0.0) || !raw.is_finite() {
        return vec![lo];
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let step = magnitude
        * if residual < 1.5 {
            1.0
        } else if residual < 3.0 {
            2.0
        } else if residual < 7.0 {
            5.0
        } else {
            10.0
        };

    let mut out = Vec::new();
    let mut tick = (lo / step).ceil() * step;
    while tick <= hi + step * 1e-9 {
        // Avoid printing -0.
        out.push(if tick.abs() < step * 1e-9 { 0.0 } else { tick });
        tick += step;
    }
    out
}

/// Short axis label: 1.2M, 35k, 0.5.
pub fn compact(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1e9 {
        format!("{}B", format_number(v / 1e9))
    } else if abs >= 1e6 {
        format!("{}M", format_number(v / 1e6))
    } else if abs >= 1e4 {
        format!("{}k", format_number(v / 1e3))
    } else {
        format_number(v)
    }
}

// =============================================================================
// Colors
// =============================================================================

fn lerp_rgb(from: (f64, f64, f64), to: (f64, f64, f64), t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    format!(
        "rgb({},{},{})",
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2)
    )
}

/// Sequential ramp, pale yellow (0) to dark green (1).
pub fn ramp(t: f64) -> String {
    lerp_rgb((255.0, 237.0, 160.0), (0.0, 104.0, 55.0), t)
}

/// Diverging ramp for correlations: blue (-1), white (0), red (1).
pub fn diverging(v: f64) -> String {
    if v < 0.0 {
        lerp_rgb((255.0, 255.0, 255.0), (49.0, 130.0, 189.0), -v)
    } else {
        lerp_rgb((255.0, 255.0, 255.0), (222.0, 45.0, 38.0), v)
    }
}

pub const MISSING_FILL: &str = "#d9d9d9";
pub const DEFAULT_FILL: &str = "#2c7fb8";

/// Stroke colors for line series, cycled.
pub const PALETTE: [&str; 6] = ["#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02"];

/// Equirectangular projection of (longitude, latitude) onto the chart area.
pub fn project(lon: f64, lat: f64) -> (f64, f64) {
    let x = (lon.clamp(-180.0, 180.0) + 180.0) / 360.0 * CHART_WIDTH;
    let y = (90.0 - lat.clamp(-90.0, 90.0)) / 180.0 * CHART_HEIGHT;
    (x, y)
}

// =============================================================================
// Marks
// =============================================================================

/// Category bars: `x` text against `y[0]`, rows with no value skipped.
pub fn bars(table: &Table, spec: &ChartSpec) -> Vec<(String, f64)> {
    let Some(y_key) = spec.y.first() else {
        return Vec::new();
    };
    table
        .texts(&spec.x)
        .into_iter()
        .zip(table.numbers(y_key))
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name: String,
    /// Sorted by x.
    pub points: Vec<(f64, f64)>,
}

/// Line series. With a color column and a single `y`, one series per
/// distinct color value (first-seen order); otherwise one per `y` column.
pub fn line_series(table: &Table, spec: &ChartSpec) -> Vec<Series> {
    let xs = table.numbers(&spec.x);
    let mut series: Vec<Series> = Vec::new();

    match (&spec.color, spec.y.as_slice()) {
        (Some(group_key), [y_key]) => {
            let groups = table.texts(group_key);
            for ((name, x), y) in groups.into_iter().zip(&xs).zip(table.numbers(y_key)) {
                let (Some(x), Some(y)) = (*x, y) else { continue };
                match series.iter_mut().find(|s| s.name == name) {
                    Some(s) => s.points.push((x, y)),
                    None => series.push(Series {
                        name,
                        points: vec![(x, y)],
                    }),
                }
            }
        }
        _ => {
            for y_key in &spec.y {
                let points = xs
                    .iter()
                    .zip(table.numbers(y_key))
                    .filter_map(|(x, y)| Some(((*x)?, y?)))
                    .collect();
                series.push(Series {
                    name: table.label(y_key),
                    points,
                });
            }
        }
    }

    for s in &mut series {
        s.points.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
    series.retain(|s| !s.points.is_empty());
    series
}

#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub color: Option<f64>,
    pub size: Option<f64>,
    pub hover: String,
}

/// Scatter marks for `x` against `y[0]`; rows missing either are skipped.
pub fn points(table: &Table, spec: &ChartSpec) -> Vec<Point> {
    let Some(y_key) = spec.y.first() else {
        return Vec::new();
    };
    let xs = table.numbers(&spec.x);
    let ys = table.numbers(y_key);
    let colors = spec.color.as_deref().map(|k| table.numbers(k));
    let sizes = spec.size.as_deref().map(|k| table.numbers(k));

    (0..table.rows.len())
        .filter_map(|i| {
            let (x, y) = (xs[i]?, ys[i]?);
            Some(Point {
                x,
                y,
                color: colors.as_ref().and_then(|c| c[i]),
                size: sizes.as_ref().and_then(|s| s[i]),
                hover: hover_text(table, spec, i),
            })
        })
        .collect()
}

/// "Label: value" lines for the hover columns, then color and size.
pub fn hover_text(table: &Table, spec: &ChartSpec, row: usize) -> String {
    let mut keys: Vec<&str> = spec.hover.iter().map(String::as_str).collect();
    for key in [spec.color.as_deref(), spec.size.as_deref()].into_iter().flatten() {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys.into_iter()
        .filter_map(|key| {
            let idx = table.column_index(key)?;
            Some(format!("{}: {}", table.columns[idx].label, table.rows[row][idx].display()))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Row labels and the value grid of a heatmap.
pub fn heat_grid(table: &Table, spec: &ChartSpec) -> (Vec<String>, Vec<Vec<Option<f64>>>) {
    let labels = table.texts(&spec.x);
    let columns: Vec<Vec<Option<f64>>> = spec.y.iter().map(|k| table.numbers(k)).collect();
    let grid = (0..labels.len())
        .map(|row| columns.iter().map(|col| col[row]).collect())
        .collect();
    (labels, grid)
}

/// Distinct frame values of the animation column, ascending.
pub fn frames(table: &Table, key: &str) -> Vec<i64> {
    let mut out: Vec<i64> = table
        .numbers(key)
        .into_iter()
        .flatten()
        .map(|v| v.round() as i64)
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub name: String,
    pub value: Option<f64>,
    pub hover: String,
}

/// One tile per row of `frame` (all rows without an animation column).
pub fn tiles(table: &Table, spec: &ChartSpec, frame: Option<i64>) -> Vec<Tile> {
    let names = table.texts(&spec.x);
    let values = spec
        .color
        .as_deref()
        .map(|k| table.numbers(k))
        .unwrap_or_else(|| vec![None; table.rows.len()]);
    let frame_values = spec.animation_frame.as_deref().map(|k| table.numbers(k));

    (0..table.rows.len())
        .filter(|&i| match (&frame_values, frame) {
            (Some(f), Some(frame)) => f[i].map(|v| v.round() as i64) == Some(frame),
            _ => true,
        })
        .map(|i| Tile {
            name: names[i].clone(),
            value: values[i],
            hover: hover_text(table, spec, i),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, ChartKind, Column};

    fn table(columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        Table {
            columns: columns
                .iter()
                .map(|k| Column {
                    key: k.to_string(),
                    label: k.to_uppercase(),
                })
                .collect(),
            rows,
        }
    }

    fn spec(kind: ChartKind, x: &str, y: &[&str]) -> ChartSpec {
        ChartSpec {
            kind,
            title: "t".into(),
            x: x.into(),
            y: y.iter().map(|s| s.to_string()).collect(),
            color: None,
            size: None,
            hover: Vec::new(),
            animation_frame: None,
            x_label: None,
            y_label: None,
        }
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.into())
    }

    fn num(v: f64) -> Cell {
        Cell::Number(Some(v))
    }

    #[test]
    fn test_scale_maps_and_clamps() {
        let scale = LinearScale::new((0.0, 100.0), (300.0, 20.0));
        assert_eq!(scale.map(0.0), 300.0);
        assert_eq!(scale.map(100.0), 20.0);
        assert_eq!(scale.map(50.0), 160.0);
        assert_eq!(scale.map(250.0), 20.0);
    }

    #[test]
    fn test_flat_domain_is_widened() {
        let scale = LinearScale::new((5.0, 5.0), (0.0, 10.0));
        assert_eq!(scale.map(5.0), 5.0);
        assert_eq!(LinearScale::new((0.0, 0.0), (0.0, 10.0)).domain(), (-1.0, 1.0));
    }

    #[test]
    fn test_extent_skips_non_finite() {
        assert_eq!(extent([3.0, f64::NAN, -1.0, 7.5]), Some((-1.0, 7.5)));
        assert_eq!(extent(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_ticks_are_round() {
        assert_eq!(ticks(0.0, 100.0, 5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(ticks(-1.0, 1.0, 4), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(ticks(3.0, 3.0, 5), vec![3.0]);
    }

    #[test]
    fn test_compact_labels() {
        assert_eq!(compact(1_500_000.0), "1.5M");
        assert_eq!(compact(35_000.0), "35k");
        assert_eq!(compact(250.0), "250");
        assert_eq!(compact(2_000_000_000.0), "2B");
    }

    #[test]
    fn test_color_ramps() {
        assert_eq!(ramp(0.0), "rgb(255,237,160)");
        assert_eq!(ramp(1.0), "rgb(0,104,55)");
        assert_eq!(diverging(0.0), "rgb(255,255,255)");
        assert_eq!(diverging(1.0), "rgb(222,45,38)");
        assert_eq!(diverging(-1.0), "rgb(49,130,189)");
    }

    #[test]
    fn test_projection_corners() {
        assert_eq!(project(-180.0, 90.0), (0.0, 0.0));
        assert_eq!(project(180.0, -90.0), (CHART_WIDTH, CHART_HEIGHT));
        assert_eq!(project(0.0, 0.0), (CHART_WIDTH / 2.0, CHART_HEIGHT / 2.0));
    }

    #[test]
    fn test_bars_skip_missing_values() {
        let t = table(
            &["entity", "gdp"],
            vec![
                vec![text("Chad"), num(650.0)],
                vec![text("Niger"), Cell::Number(None)],
            ],
        );
        assert_eq!(bars(&t, &spec(ChartKind::Bar, "entity", &["gdp"])), vec![("Chad".to_string(), 650.0)]);
    }

    #[test]
    fn test_line_series_grouped_by_color() {
        let t = table(
            &["year", "entity", "gdp"],
            vec![
                vec![Cell::Int(2001), text("Chad"), num(2.0)],
                vec![Cell::Int(2000), text("Chad"), num(1.0)],
                vec![Cell::Int(2000), text("Mali"), num(5.0)],
                vec![Cell::Int(2001), text("Mali"), Cell::Number(None)],
            ],
        );
        let mut s = spec(ChartKind::Line, "year", &["gdp"]);
        s.color = Some("entity".into());

        let series = line_series(&t, &s);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "Chad");
        assert_eq!(series[0].points, vec![(2000.0, 1.0), (2001.0, 2.0)]);
        assert_eq!(series[1].points, vec![(2000.0, 5.0)]);
    }

    #[test]
    fn test_line_series_one_per_column() {
        let t = table(
            &["year", "a", "b"],
            vec![vec![Cell::Int(2000), num(1.0), Cell::Number(None)]],
        );
        let series = line_series(&t, &spec(ChartKind::Line, "year", &["a", "b"]));
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, "A");
    }

    #[test]
    fn test_points_carry_hover_and_channels() {
        let t = table(
            &["entity", "access", "gdp", "pop"],
            vec![
                vec![text("Chad"), num(10.0), num(650.0), num(16.0)],
                vec![text("Mali"), Cell::Number(None), num(800.0), num(20.0)],
            ],
        );
        let mut s = spec(ChartKind::Scatter, "access", &["gdp"]);
        s.hover = vec!["entity".into()];
        s.size = Some("pop".into());

        let pts = points(&t, &s);
        assert_eq!(pts.len(), 1);
        assert_eq!(pts[0].size, Some(16.0));
        assert_eq!(pts[0].color, None);
        assert_eq!(pts[0].hover, "ENTITY: Chad\nPOP: 16");
    }

    #[test]
    fn test_heat_grid_layout() {
        let t = table(
            &["variable", "a", "b"],
            vec![
                vec![text("a"), num(1.0), num(-0.5)],
                vec![text("b"), num(-0.5), Cell::Number(None)],
            ],
        );
        let (labels, grid) = heat_grid(&t, &spec(ChartKind::Heatmap, "variable", &["a", "b"]));
        assert_eq!(labels, vec!["a", "b"]);
        assert_eq!(grid[1], vec![Some(-0.5), None]);
    }

    #[test]
    fn test_tiles_filter_by_frame() {
        let t = table(
            &["entity", "year", "share"],
            vec![
                vec![text("Chad"), Cell::Int(2019), num(80.0)],
                vec![text("Chad"), Cell::Int(2020), num(82.0)],
                vec![text("Mali"), Cell::Int(2020), Cell::Number(None)],
            ],
        );
        let mut s = spec(ChartKind::Choropleth, "entity", &[]);
        s.color = Some("share".into());
        s.animation_frame = Some("year".into());

        assert_eq!(frames(&t, "year"), vec![2019, 2020]);
        let latest = tiles(&t, &s, Some(2020));
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].value, Some(82.0));
        assert_eq!(latest[1].value, None);
        assert_eq!(tiles(&t, &s, None).len(), 3);
    }
}
