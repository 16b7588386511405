//! First/last value per entity and the reduction between them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dataset::{Dataset, RowOrder};
use crate::models::{Cell, Column, Field, Metric, Table};

/// One entity whose metric went down between its first and last value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reduction {
    pub entity: String,
    pub first_year: i32,
    pub last_year: i32,
    pub first_value: f64,
    pub last_value: f64,
    /// `first_value - last_value`, always positive.
    pub difference: f64,
}

impl Reduction {
    /// Table with the emission_2000 / emission_2020 column layout.
    pub fn table(reductions: &[Reduction]) -> Table {
        let mut table = Table::new(vec![
            Column::from(Field::Entity),
            Column::new("emission_2000", "Emissions (first year)"),
            Column::new("emission_2020", "Emissions (last year)"),
            Column::new("emission_difference", "Reduction"),
            Column::new("first_year", "First year"),
            Column::new("last_year", "Last year"),
        ]);
        for r in reductions {
            table.push_row(vec![
                Cell::Text(r.entity.clone()),
                Cell::Number(Some(r.first_value)),
                Cell::Number(Some(r.last_value)),
                Cell::Number(Some(r.difference)),
                Cell::Int(i64::from(r.first_year)),
                Cell::Int(i64::from(r.last_year)),
            ]);
        }
        table
    }
}

/// Entities whose `metric` decreased from first to last non-missing value,
/// largest reduction first.
pub fn first_last_reductions(dataset: &Dataset, metric: Metric, order: RowOrder) -> Vec<Reduction> {
    // (first, last) as (year, value)
    let mut groups: BTreeMap<&str, ((i32, f64), (i32, f64))> = BTreeMap::new();

    for obs in dataset.ordered(order) {
        let Some(value) = metric.value(obs) else {
            continue;
        };
        let point = (obs.year, value);
        groups
            .entry(obs.entity.as_str())
            .and_modify(|(_, last)| *last = point)
            .or_insert((point, point));
    }

    let mut reductions: Vec<Reduction> = groups
        .into_iter()
        .filter(|(_, (first, last))| last.1 < first.1)
        .map(|(entity, (first, last))| Reduction {
            entity: entity.to_string(),
            first_year: first.0,
            last_year: last.0,
            first_value: first.1,
            last_value: last.1,
            difference: first.1 - last.1,
        })
        .collect();

    reductions.sort_by(|a, b| b.difference.total_cmp(&a.difference));
    reductions
}
