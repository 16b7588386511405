//! Analysis tabs. Each builder runs the queries for one view and wraps
//! the results into panels.

use super::{AccessView, ChartKind, ChartSpec, GdpView, Panel, RegionalView, Report, ViewState};
use crate::dataset::{Dataset, RowOrder};
use crate::error::QueryResult;
use crate::models::{Field, Metric, Observation, Table};
use crate::query::{
    correlation_matrix, entities, entity_series, extremes, first_last_reductions, latest_top, rank,
    resolve_entity, series_table, Extreme, ExtremesQuery, LatestQuery, RankingQuery, Reduction,
    SortOrder,
};

/// Rows in most top/bottom lists.
pub const TOP_N: usize = 10;

/// Rows in the high-access sample.
pub const HIGH_ACCESS_N: usize = 20;

/// Entities followed in the GDP trend charts.
pub const TREND_ENTITIES: usize = 3;

const ENTITY: Field = Field::Entity;
const YEAR: Field = Field::Year;
const ACCESS: Field = Field::Metric(Metric::AccessToElectricity);
const RENEWABLE: Field = Field::Metric(Metric::RenewableShare);
const LOW_CARBON: Field = Field::Metric(Metric::LowCarbonElectricity);
const PRIMARY_ENERGY: Field = Field::Metric(Metric::PrimaryEnergyPerCapita);
const CO2: Field = Field::Metric(Metric::Co2Emissions);
const GDP: Field = Field::Metric(Metric::GdpPerCapita);
const DENSITY: Field = Field::Metric(Metric::Density);
const LAND: Field = Field::Metric(Metric::LandArea);
const LATITUDE: Field = Field::Metric(Metric::Latitude);
const LONGITUDE: Field = Field::Metric(Metric::Longitude);
const POPULATION: Field = Field::Metric(Metric::Population);

/// Context columns of the electricity access tables.
const ACCESS_COLUMNS: [Field; 6] = [ENTITY, YEAR, ACCESS, GDP, LAND, POPULATION];

// =============================================================================
// GDP
// =============================================================================

fn gdp_ranking(dataset: &Dataset, year: i32, order: SortOrder) -> QueryResult<Vec<&Observation>> {
    rank(
        dataset,
        &RankingQuery {
            year,
            field: GDP,
            order,
            limit: TOP_N,
        },
    )
}

pub(super) fn gdp(dataset: &Dataset, state: &ViewState) -> QueryResult<Report> {
    let year = state.year;
    let title = format!("GDP Analysis ({year})");

    let panel = match state.gdp_view {
        GdpView::Highest => {
            let rows = gdp_ranking(dataset, year, SortOrder::Descending)?;
            let heading = format!("Ten countries with the highest GDP per capita in {year}");
            Panel::new(heading.clone())
                .table(Table::project(rows, &[YEAR, ENTITY, GDP]))
                .chart(gdp_bar(heading))
        }
        GdpView::Lowest => {
            let rows = gdp_ranking(dataset, year, SortOrder::Ascending)?;
            let heading = format!("Ten countries with the lowest GDP per capita in {year}");
            Panel::new(heading.clone())
                .table(Table::project(rows, &[YEAR, ENTITY, GDP]))
                .chart(gdp_bar(heading))
        }
        GdpView::LowestTrend => {
            let rows = gdp_ranking(dataset, year, SortOrder::Ascending)?;
            gdp_trend(dataset, &rows, format!("Lowest {TREND_ENTITIES} GDP per capita over time"))
        }
        GdpView::HighestTrend => {
            let rows = gdp_ranking(dataset, year, SortOrder::Descending)?;
            gdp_trend(dataset, &rows, format!("Highest {TREND_ENTITIES} GDP per capita over time"))
        }
    };

    Ok(Report::new(title, vec![panel]))
}

fn gdp_bar(title: String) -> ChartSpec {
    ChartSpec::new(ChartKind::Bar, title, ENTITY.key(), &[GDP.key()])
        .labels("Country name", GDP.label())
}

/// Line per entity for the first few entities of a ranking.
fn gdp_trend(dataset: &Dataset, ranked: &[&Observation], heading: String) -> Panel {
    let mut names: Vec<&str> = Vec::new();
    for obs in ranked {
        if !names.contains(&obs.entity.as_str()) {
            names.push(&obs.entity);
        }
    }
    names.truncate(TREND_ENTITIES);

    let rows = entity_series(dataset, &names);
    let chart = ChartSpec::new(ChartKind::Line, heading.clone(), YEAR.key(), &[GDP.key()])
        .color(ENTITY.key())
        .labels("Year", GDP.label());
    Panel::new(heading).table(series_table(rows, &[GDP])).chart(chart)
}

// =============================================================================
// Electricity access
// =============================================================================

fn access_extremes(dataset: &Dataset, year: i32, extreme: Extreme) -> QueryResult<Vec<&Observation>> {
    let limit = match extreme {
        Extreme::Lowest => TOP_N,
        Extreme::Highest => HIGH_ACCESS_N,
    };
    extremes(
        dataset,
        &ExtremesQuery {
            year,
            field: ACCESS,
            extreme,
            limit,
        },
    )
}

pub(super) fn electricity_access(dataset: &Dataset, state: &ViewState) -> QueryResult<Report> {
    let year = state.year;

    let panels = match state.access_view {
        AccessView::FocusYearData => {
            let lowest = access_extremes(dataset, year, Extreme::Lowest)?;
            let highest = access_extremes(dataset, year, Extreme::Highest)?;
            vec![
                Panel::new(format!("Entities with the lowest access to electricity in {year}"))
                    .table(Table::project(lowest, &ACCESS_COLUMNS)),
                Panel::new(format!("Entities with the highest access to electricity in {year}"))
                    .table(Table::project(highest, &ACCESS_COLUMNS)),
            ]
        }
        AccessView::Correlations => {
            let matrix = correlation_matrix(dataset.rows(), &[ACCESS, GDP, LAND, POPULATION])?;
            let keys: Vec<&str> = matrix.fields.iter().map(|f| f.key()).collect();
            let chart = ChartSpec::new(
                ChartKind::Heatmap,
                "Access to electricity correlation heatmap",
                "variable",
                &keys,
            );
            vec![Panel::new("Features correlations")
                .table(matrix.to_table())
                .chart(chart)]
        }
        AccessView::Graphs => {
            let lowest = access_extremes(dataset, year, Extreme::Lowest)?;
            let highest = access_extremes(dataset, year, Extreme::Highest)?;
            let mut panels = access_graphs(&lowest, &format!("lowest access to electricity {year}"));
            panels.extend(access_graphs(&highest, &format!("highest access to electricity {year}")));
            panels
        }
        AccessView::Trends => vec![access_trend(dataset, state.entity.as_deref())?],
        AccessView::Summary => access_summary(),
    };

    Ok(Report::new("Electricity Access", panels))
}

fn access_graphs(rows: &[&Observation], group: &str) -> Vec<Panel> {
    let table = Table::project(rows.iter().copied(), &ACCESS_COLUMNS);

    let vs_gdp = ChartSpec::new(
        ChartKind::Scatter,
        "Access to electricity vs GDP per capita",
        ACCESS.key(),
        &[GDP.key()],
    )
    .hover(&[ENTITY.key()])
    .labels(ACCESS.label(), GDP.label());

    let vs_population = ChartSpec::new(
        ChartKind::Scatter,
        "GDP per capita vs population",
        POPULATION.key(),
        &[GDP.key()],
    )
    .color(ACCESS.key())
    .hover(&[ENTITY.key()])
    .labels(POPULATION.label(), GDP.label());

    vec![
        Panel::new(format!("Entities with the {group}: access vs GDP"))
            .table(table.clone())
            .chart(vs_gdp),
        Panel::new(format!("Entities with the {group}: GDP vs population"))
            .table(table)
            .chart(vs_population),
    ]
}

fn access_trend(dataset: &Dataset, selected: Option<&str>) -> QueryResult<Panel> {
    let name = match selected {
        Some(input) => Some(resolve_entity(dataset, input)?),
        None => entities(dataset).first().copied(),
    };
    let Some(name) = name else {
        return Ok(Panel::new("Evolution of electricity access and renewable energy")
            .table(series_table(Vec::new(), &[ACCESS, RENEWABLE])));
    };

    let rows = entity_series(dataset, &[name]);
    let heading = format!("Evolution of electricity access and renewable energy: {name}");
    let chart = ChartSpec::new(
        ChartKind::Line,
        heading.clone(),
        YEAR.key(),
        &[ACCESS.key(), RENEWABLE.key()],
    )
    .labels("Year", "Percent");
    Ok(Panel::new(heading)
        .table(series_table(rows, &[ACCESS, RENEWABLE]))
        .chart(chart))
}

fn access_summary() -> Vec<Panel> {
    vec![
        Panel::new("Lowest entities by access to electricity").notes([
            "Access rates in this group tend to sit below 30%, indicating significant energy poverty.",
            "Higher GDP per capita goes together with better access to electricity.",
            "Population and GDP per capita show no clear pattern: populous countries can still have low GDP and limited access.",
        ]),
        Panel::new("Highest entities by access to electricity").notes([
            "Access is near universal (above 90% of the population), reflecting developed infrastructure.",
            "The GDP/access relationship is weaker than in the lowest group because access saturates.",
            "Populous countries with high GDP tend to have near-complete access.",
        ]),
    ]
}

// =============================================================================
// Regional insights
// =============================================================================

fn latest_by(dataset: &Dataset, field: Field) -> QueryResult<Vec<&Observation>> {
    latest_top(
        dataset,
        &LatestQuery {
            field,
            order: SortOrder::Descending,
            limit: TOP_N,
            row_order: RowOrder::default(),
        },
    )
}

pub(super) fn regional_insights(dataset: &Dataset, state: &ViewState) -> QueryResult<Report> {
    let panels = match state.regional_view {
        RegionalView::RenewableMap => {
            let table = Table::project(dataset.rows(), &[ENTITY, YEAR, RENEWABLE, LAND, DENSITY, GDP]);
            let chart = ChartSpec::new(
                ChartKind::Choropleth,
                "Renewable energy share by country over the years",
                ENTITY.key(),
                &[],
            )
            .color(RENEWABLE.key())
            .hover(&[YEAR.key(), LAND.key(), DENSITY.key(), GDP.key()])
            .animate(YEAR.key());
            vec![Panel::new("Renewable energy share by country").table(table).chart(chart)]
        }
        RegionalView::GeographicInfluence => {
            let matrix = correlation_matrix(
                dataset.rows(),
                &[LATITUDE, LONGITUDE, LAND, DENSITY, ACCESS, RENEWABLE, CO2],
            )?;
            let emitters = latest_by(dataset, CO2)?;
            let chart = ChartSpec::new(
                ChartKind::ScatterGeo,
                "CO2 emissions by country (most recent year)",
                LONGITUDE.key(),
                &[LATITUDE.key()],
            )
            .size(ACCESS.key())
            .color(CO2.key())
            .hover(&[ENTITY.key(), LAND.key(), DENSITY.key()]);
            vec![
                Panel::new("Correlation analysis").table(matrix.to_table()),
                Panel::new("Top emitters")
                    .table(Table::project(
                        emitters,
                        &[ENTITY, YEAR, LATITUDE, LONGITUDE, CO2, ACCESS, LAND, DENSITY],
                    ))
                    .chart(chart),
            ]
        }
        RegionalView::GdpVsEnergy => {
            let richest = latest_by(dataset, GDP)?;
            let chart = ChartSpec::new(
                ChartKind::ScatterGeo,
                "GDP and primary energy consumption per capita",
                LONGITUDE.key(),
                &[LATITUDE.key()],
            )
            .color(GDP.key())
            .size(PRIMARY_ENERGY.key())
            .hover(&[ENTITY.key(), LAND.key(), DENSITY.key()]);
            vec![Panel::new("GDP vs primary energy consumption per capita")
                .table(Table::project(
                    richest,
                    &[ENTITY, YEAR, LATITUDE, LONGITUDE, GDP, PRIMARY_ENERGY, LAND, DENSITY],
                ))
                .chart(chart)]
        }
    };

    Ok(Report::new("Regional Insights", panels))
}

// =============================================================================
// Low-carbon leaders and emission reduction
// =============================================================================

pub(super) fn low_carbon_leaders(dataset: &Dataset) -> QueryResult<Report> {
    let leaders = latest_by(dataset, LOW_CARBON)?;
    let panel = Panel::new("Entities with the top percentage of low-carbon electricity")
        .table(Table::project(leaders, &[ENTITY, YEAR, LOW_CARBON, GDP]));
    Ok(Report::new("Low CO2 Emitters", vec![panel]))
}

pub(super) fn emission_reduction(dataset: &Dataset) -> Report {
    let reductions = first_last_reductions(dataset, Metric::Co2Emissions, RowOrder::default());
    let heading = "Reduced CO2 emissions between the first and last recorded year";
    let chart = ChartSpec::new(ChartKind::Bar, heading, ENTITY.key(), &["emission_difference"])
        .color("emission_difference")
        .labels("Country", "Emission difference (first - last, kt)");
    let panel = Panel::new(heading)
        .table(Reduction::table(&reductions))
        .chart(chart);
    Report::new("Entities that reduced CO2 emissions over time", vec![panel])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::models::Cell;
    use crate::query::fixtures::energy;
    use crate::report::{AnalysisTab, Page, ViewEvent};

    fn analysis(tab: AnalysisTab) -> ViewState {
        ViewState::default()
            .apply(ViewEvent::Navigate { page: Page::Analysis })
            .apply(ViewEvent::SelectTab { tab })
    }

    fn entity_column(table: &Table) -> Vec<String> {
        table
            .column(ENTITY.key())
            .unwrap()
            .into_iter()
            .filter_map(|c| c.as_str().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_highest_gdp_table() {
        let report = gdp(&energy(), &analysis(AnalysisTab::Gdp)).unwrap();
        let table = report.panels[0].table.as_ref().unwrap();
        assert_eq!(entity_column(table), vec!["Norway", "Germany", "India", "Chad", "Chad"]);
        assert_eq!(report.title, "GDP Analysis (2020)");
    }

    #[test]
    fn test_lowest_trend_follows_three_unique_entities() {
        let state = analysis(AnalysisTab::Gdp).apply(ViewEvent::SelectGdpView {
            view: GdpView::LowestTrend,
        });
        let report = gdp(&energy(), &state).unwrap();
        let table = report.panels[0].table.as_ref().unwrap();

        let mut names = entity_column(table);
        names.dedup();
        assert_eq!(names, vec!["Chad", "India", "Germany"]);
    }

    #[test]
    fn test_focus_year_change_and_empty_year() {
        let state = analysis(AnalysisTab::Gdp).apply(ViewEvent::SelectYear { year: 1990 });
        let report = gdp(&energy(), &state).unwrap();
        assert!(report.panels[0].empty);
    }

    #[test]
    fn test_access_focus_year_tables() {
        let report = electricity_access(&energy(), &analysis(AnalysisTab::ElectricityAccess)).unwrap();
        assert_eq!(report.panels.len(), 2);

        let lowest = report.panels[0].table.as_ref().unwrap();
        let keys: Vec<&str> = lowest.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["entity", "year", "access_to_electricity", "gdp_per_capita", "land_area", "population"]
        );
        assert_eq!(lowest.rows[0][2], Cell::Number(Some(11.0)));
    }

    #[test]
    fn test_access_trend_selection() {
        let dataset = energy();
        let base = analysis(AnalysisTab::ElectricityAccess).apply(ViewEvent::SelectAccessView {
            view: AccessView::Trends,
        });

        let default = electricity_access(&dataset, &base).unwrap();
        assert!(default.panels[0].heading.ends_with("Norway"));

        let picked = base.apply(ViewEvent::SelectEntity {
            entity: Some("ind".into()),
        });
        let report = electricity_access(&dataset, &picked).unwrap();
        assert!(report.panels[0].heading.ends_with("India"));
        assert_eq!(report.panels[0].table.as_ref().unwrap().len(), 3);

        let unknown = base.apply(ViewEvent::SelectEntity {
            entity: Some("Atlantis".into()),
        });
        assert_eq!(
            electricity_access(&dataset, &unknown),
            Err(QueryError::UnknownEntity("Atlantis".into()))
        );
    }

    #[test]
    fn test_regional_map_uses_all_years() {
        let dataset = energy();
        let report = regional_insights(&dataset, &analysis(AnalysisTab::RegionalInsights)).unwrap();
        let panel = &report.panels[0];
        assert_eq!(panel.table.as_ref().unwrap().len(), dataset.len());
        assert_eq!(panel.chart.as_ref().unwrap().animation_frame.as_deref(), Some("year"));
    }

    #[test]
    fn test_low_carbon_leaders() {
        let report = low_carbon_leaders(&energy()).unwrap();
        let table = report.panels[0].table.as_ref().unwrap();
        assert_eq!(entity_column(table), vec!["Norway", "Germany", "India", "Chad"]);
    }

    #[test]
    fn test_emission_reduction_chart() {
        let report = emission_reduction(&energy());
        let panel = &report.panels[0];
        assert_eq!(entity_column(panel.table.as_ref().unwrap()), vec!["Germany", "Norway"]);
        assert_eq!(panel.chart.as_ref().unwrap().color.as_deref(), Some("emission_difference"));
    }
}
