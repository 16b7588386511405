//! Static and dataset-wide pages: methodology, overview, features, conclusion.

use serde::{Deserialize, Serialize};

use super::{Panel, Report, LANDING_IMAGE};
use crate::dataset::Dataset;
use crate::models::{Cell, Column, Field, Table};
use crate::query::{overview as dataset_overview, FieldSummary};

/// Glossary entry for one schema field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    pub key: String,
    pub header: String,
    pub label: String,
    pub description: String,
    pub required: bool,
}

/// Every schema field with its header and description.
pub fn glossary() -> Vec<FieldInfo> {
    Field::all()
        .into_iter()
        .map(|field| FieldInfo {
            key: field.key().to_string(),
            header: field.header().to_string(),
            label: field.label().to_string(),
            description: field.description().to_string(),
            required: field.is_required(),
        })
        .collect()
}

pub(super) fn methodology() -> Report {
    let objectives = Panel::new("Project Objectives")
        .image(LANDING_IMAGE)
        .notes([
            "Access to electricity: evaluate disparities across regions and identify trends over time.",
            "Access to electricity: relate access to economic development and geographic factors.",
            "Renewable energy adoption: assess the share of renewables in total energy consumption.",
            "Renewable energy adoption: explore economic, geographic and policy-related drivers.",
            "CO2 emissions: identify the highest and lowest emitters.",
            "CO2 emissions: investigate how renewables and economic growth affect emission trends.",
            "CO2 emissions: highlight countries that reduced their emissions over time.",
        ]);

    let method = Panel::new("Methodology").notes([
        "Data preprocessing: missing population values were estimated as density times land area.",
        "Outlier detection: anomalies in CO2 emissions, renewable share and GDP per capita were reviewed with scatter plots and descriptive statistics.",
        "Feature engineering: energy metrics such as primary energy per capita and low-carbon electricity share; geographic variables such as land area, density, latitude and longitude.",
        "Visualization: choropleth maps and scatter plots for global patterns, time series for decade-long trends, correlation analysis for relationships between metrics.",
    ]);

    Report::new("Project Objectives and Methodology", vec![objectives, method])
}

pub(super) fn overview(dataset: &Dataset) -> Report {
    let ov = dataset_overview(dataset);

    let shape = Panel::new("Shape of the dataset").notes([format!(
        "{} rows, {} columns",
        ov.rows, ov.columns
    )]);
    let head = Panel::new("First rows").table(ov.head);
    let summary = Panel::new("Summary Statistics").table(FieldSummary::table(&ov.summary));

    Report::new("Dataset Overview", vec![head, shape, summary])
}

pub(super) fn features() -> Report {
    let mut table = Table::new(vec![
        Column::new("header", "Column"),
        Column::new("key", "Key"),
        Column::new("description", "Description"),
    ]);
    for info in glossary() {
        table.push_row(vec![
            Cell::Text(info.header),
            Cell::Text(info.key),
            Cell::Text(info.description),
        ]);
    }

    Report::new("Features Description", vec![Panel::new("Features").table(table)])
}

pub(super) fn conclusion() -> Report {
    let summary = Panel::new("Conclusion").notes([
        "Access to electricity and clean cooking fuels has improved globally, with disparities remaining in developing regions such as Sub-Saharan Africa.",
        "Renewable energy adoption correlates positively with GDP per capita, although geographic advantages and policy let some low-GDP regions lead as well.",
    ]);

    let findings = Panel::new("Key Findings").notes([
        "Access to electricity: economically underdeveloped regions have the lowest access; high-GDP countries are near universal.",
        "Renewable energy adoption: land area, latitude and economic priorities shape renewable shares. Fossil fuels still dominate in many regions.",
        "Carbon emissions: countries with higher renewable use report lower CO2 emissions.",
        "Financial flows: regions with energy access gaps receive the most support for renewable development.",
        "Geographic influences: large land areas and favorable latitudes raise renewable potential; high density is a challenge.",
    ]);

    let outlook = Panel::new("Final Thoughts").notes([
        "The transition to low-carbon energy is gaining momentum, particularly in Europe and parts of Asia. Universal access will need targeted investment and policy work on economic and geographic disparities; leaders such as Norway and Iceland show what is possible.",
    ]);

    Report::new("Conclusion", vec![summary, findings, outlook])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;
    use crate::query::fixtures::energy;

    #[test]
    fn test_glossary_covers_schema() {
        let entries = glossary();
        assert_eq!(entries.len(), Metric::ALL.len() + 2);
        assert!(entries.iter().all(|e| !e.description.is_empty()));
        let co2 = entries.iter().find(|e| e.key == "co2_emissions").unwrap();
        assert_eq!(co2.header, "Value_co2_emissions_kt_by_country");
        assert!(co2.required);
    }

    #[test]
    fn test_overview_panels() {
        let report = overview(&energy());
        assert_eq!(report.panels[0].table.as_ref().unwrap().len(), 10);
        assert_eq!(report.panels[1].notes, vec!["13 rows, 22 columns".to_string()]);
    }

    #[test]
    fn test_methodology_references_landing_image() {
        let report = methodology();
        assert_eq!(report.panels[0].image.as_deref(), Some(LANDING_IMAGE));
    }
}
