//! End-to-end: CSV file on disk -> Dataset -> queries -> report.

use std::fs;
use std::path::PathBuf;

use energy_explorer::report::{AccessView, AnalysisTab, Page};
use energy_explorer::{
    build_report, first_last_reductions, rank, Cell, Dataset, DatasetError, Field, Metric,
    RankingQuery, RowOrder, SortOrder, ViewEvent, ViewState,
};
use tempfile::{tempdir, TempDir};

/// One CSV line with the given metric values; all other cells blank.
fn row(delimiter: char, entity: &str, year: i32, values: &[(Metric, &str)]) -> String {
    let mut cells = vec![entity.to_string(), year.to_string()];
    for metric in Metric::ALL {
        let value = values
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, v)| v.to_string())
            .unwrap_or_default();
        cells.push(value);
    }
    cells.join(&delimiter.to_string())
}

fn header(delimiter: char) -> String {
    Field::all()
        .into_iter()
        .map(|f| match f {
            // Header as exported in the public dataset, with a line break.
            Field::Metric(Metric::Density) => "\"Density\n(P/Km2)\"".to_string(),
            _ => format!("\"{}\"", f.header()),
        })
        .collect::<Vec<_>>()
        .join(&delimiter.to_string())
}

fn write_csv(dir: &TempDir, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, lines.join("\n")).unwrap();
    path
}

fn sample(delimiter: char) -> Vec<String> {
    use Metric::*;
    vec![
        header(delimiter),
        row(delimiter, "Afghanistan", 2000, &[(AccessToElectricity, "1.6"), (GdpPerCapita, ""), (Co2Emissions, "760")]),
        row(delimiter, "Afghanistan", 2020, &[(AccessToElectricity, "97.7"), (GdpPerCapita, "516.7"), (Co2Emissions, "8710")]),
        row(delimiter, "Denmark", 2000, &[(AccessToElectricity, "100"), (GdpPerCapita, "30743"), (Co2Emissions, "52800")]),
        row(delimiter, "Denmark", 2020, &[(AccessToElectricity, "100"), (GdpPerCapita, "61063"), (Co2Emissions, "26210")]),
        row(delimiter, "Niger", 2020, &[(AccessToElectricity, "19.3"), (GdpPerCapita, "567.7"), (Co2Emissions, "2750")]),
    ]
}

#[test]
fn test_load_rank_and_reduce() {
    let dir = tempdir().unwrap();
    let path = write_csv(&dir, "Energy_data.csv", &sample(','));

    let dataset = Dataset::load(&path).unwrap();
    assert_eq!(dataset.len(), 5);
    assert_eq!(dataset.source().delimiter, ',');
    assert_eq!(dataset.source().path.as_deref(), Some(path.display().to_string().as_str()));
    assert_eq!(dataset.rows()[0].gdp_per_capita, None);

    let top = rank(
        &dataset,
        &RankingQuery {
            year: 2020,
            field: Field::Metric(Metric::GdpPerCapita),
            order: SortOrder::Descending,
            limit: 2,
        },
    )
    .unwrap();
    let names: Vec<&str> = top.iter().map(|o| o.entity.as_str()).collect();
    assert_eq!(names, vec!["Denmark", "Niger"]);

    let reductions = first_last_reductions(&dataset, Metric::Co2Emissions, RowOrder::Chronological);
    assert_eq!(reductions.len(), 1);
    assert_eq!(reductions[0].entity, "Denmark");
    assert_eq!(reductions[0].difference, 26_590.0);
}

#[test]
fn test_semicolon_file_with_grouped_numbers() {
    let dir = tempdir().unwrap();
    let mut lines = sample(';');
    lines.push(row(';', "Brazil", 2020, &[(Metric::GdpPerCapita, "6,796.8")]));
    let path = write_csv(&dir, "energy_semicolon.csv", &lines);

    let dataset = Dataset::load(&path).unwrap();
    assert_eq!(dataset.source().delimiter, ';');
    assert_eq!(dataset.rows()[5].gdp_per_capita, Some(6796.8));
}

#[test]
fn test_report_flow_over_loaded_file() {
    let dir = tempdir().unwrap();
    let path = write_csv(&dir, "Energy_data.csv", &sample(','));
    let dataset = Dataset::load(&path).unwrap();

    let state = ViewState::default()
        .apply(ViewEvent::Navigate { page: Page::Analysis })
        .apply(ViewEvent::SelectTab {
            tab: AnalysisTab::ElectricityAccess,
        });
    let report = build_report(&dataset, &state).unwrap();
    let lowest = report.panels[0].table.as_ref().unwrap();
    assert_eq!(lowest.rows[0][0], Cell::Text("Niger".into()));

    let state = state
        .apply(ViewEvent::SelectAccessView { view: AccessView::Trends })
        .apply(ViewEvent::SelectEntity {
            entity: Some("den".into()),
        });
    let report = build_report(&dataset, &state).unwrap();
    assert!(report.panels[0].heading.ends_with("Denmark"));
    assert_eq!(report.panels[0].table.as_ref().unwrap().len(), 2);
}

#[test]
fn test_missing_required_column_fails_loudly() {
    let dir = tempdir().unwrap();
    let path = write_csv(
        &dir,
        "partial.csv",
        &["Entity,Year,gdp_per_capita".to_string(), "Chad,2020,650".to_string()],
    );

    match Dataset::load(&path).unwrap_err() {
        DatasetError::MissingColumns(columns) => {
            assert!(columns.contains(&"Population".to_string()));
            assert!(columns.contains(&"Access to electricity (% of population)".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unparseable_number_names_the_cell() {
    let dir = tempdir().unwrap();
    let mut lines = sample(',');
    lines.push(row(',', "Chad", 2020, &[(Metric::Population, "lots")]));
    let path = write_csv(&dir, "bad.csv", &lines);

    let err = Dataset::load(&path).unwrap_err().to_string();
    assert!(err.contains("Population"), "{err}");
    assert!(err.contains("lots"), "{err}");
}
