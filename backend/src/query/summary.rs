//! Descriptive statistics and the dataset overview.

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, SourceInfo};
use crate::error::QueryResult;
use crate::models::{Cell, Column, Field, Observation, Table};

/// Rows shown in the overview preview.
pub const HEAD_ROWS: usize = 10;

/// Statistics of one numeric field over its non-missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub field: Field,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl FieldSummary {
    fn of(field: Field, mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        let count = values.len();
        let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
        let std = mean.filter(|_| count > 1).map(|m| {
            let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        });

        Self {
            field,
            count,
            mean,
            std,
            min: values.first().copied(),
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values.last().copied(),
        }
    }

    /// Summary rows in describe() layout: one row per field.
    pub fn table(summaries: &[FieldSummary]) -> Table {
        let mut table = Table::new(vec![
            Column::new("field", "Field"),
            Column::new("count", "count"),
            Column::new("mean", "mean"),
            Column::new("std", "std"),
            Column::new("min", "min"),
            Column::new("q25", "25%"),
            Column::new("median", "50%"),
            Column::new("q75", "75%"),
            Column::new("max", "max"),
        ]);
        for s in summaries {
            table.push_row(vec![
                Cell::Text(s.field.key().to_string()),
                Cell::Int(s.count as i64),
                Cell::Number(s.mean),
                Cell::Number(s.std),
                Cell::Number(s.min),
                Cell::Number(s.q25),
                Cell::Number(s.median),
                Cell::Number(s.q75),
                Cell::Number(s.max),
            ]);
        }
        table
    }
}

/// Linear-interpolation quantile of sorted values.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        n => {
            let pos = q * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
        }
    }
}

/// Summarize each field over `rows`.
pub fn summarize<'a, I>(rows: I, fields: &[Field]) -> QueryResult<Vec<FieldSummary>>
where
    I: IntoIterator<Item = &'a Observation>,
{
    for field in fields {
        field.require_numeric()?;
    }
    let rows: Vec<&Observation> = rows.into_iter().collect();

    Ok(fields
        .iter()
        .map(|field| {
            let values = rows.iter().filter_map(|obs| field.numeric_value(obs)).collect();
            FieldSummary::of(*field, values)
        })
        .collect())
}

/// Shape, source, preview rows and statistics of the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub rows: usize,
    pub columns: usize,
    pub source: SourceInfo,
    pub head: Table,
    pub summary: Vec<FieldSummary>,
}

pub fn overview(dataset: &Dataset) -> Overview {
    let fields = Field::all();
    let numeric: Vec<Field> = fields.iter().copied().filter(|f| f.is_numeric()).collect();

    let head = Table::project(dataset.rows().iter().take(HEAD_ROWS), &fields);
    let summary = numeric
        .iter()
        .map(|field| {
            let values = dataset.rows().iter().filter_map(|obs| field.numeric_value(obs)).collect();
            FieldSummary::of(*field, values)
        })
        .collect();

    Overview {
        rows: dataset.len(),
        columns: dataset.column_count(),
        source: dataset.source().clone(),
        head,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::models::Metric;
    use crate::query::fixtures::{energy, obs};

    const GDP: Field = Field::Metric(Metric::GdpPerCapita);

    #[test]
    fn test_statistics_match_describe() {
        let rows: Vec<_> = [1.0, 2.0, 3.0, 4.0]
            .into_iter()
            .map(|v| obs("A", 2000).with(Metric::GdpPerCapita, v))
            .collect();
        let summary = &summarize(&rows, &[GDP]).unwrap()[0];

        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, Some(2.5));
        assert!((summary.std.unwrap() - 1.290_994_448_735_805_6).abs() < 1e-12);
        assert_eq!(summary.min, Some(1.0));
        assert_eq!(summary.q25, Some(1.75));
        assert_eq!(summary.median, Some(2.5));
        assert_eq!(summary.q75, Some(3.25));
        assert_eq!(summary.max, Some(4.0));
    }

    #[test]
    fn test_empty_and_single_value_fields() {
        let rows = vec![obs("A", 2000).with(Metric::GdpPerCapita, 7.0), obs("B", 2000)];
        let summaries = summarize(&rows, &[GDP, Field::Metric(Metric::Density)]).unwrap();

        assert_eq!(summaries[0].count, 1);
        assert_eq!(summaries[0].median, Some(7.0));
        assert_eq!(summaries[0].std, None);

        assert_eq!(summaries[1].count, 0);
        assert_eq!(summaries[1].mean, None);
        assert_eq!(summaries[1].max, None);
    }

    #[test]
    fn test_text_field_rejected() {
        let rows = vec![obs("A", 2000)];
        assert_eq!(
            summarize(&rows, &[Field::Entity]),
            Err(QueryError::NotNumeric("entity".into()))
        );
    }

    #[test]
    fn test_overview_shape() {
        let dataset = energy();
        let ov = overview(&dataset);

        assert_eq!(ov.rows, 13);
        assert_eq!(ov.columns, Metric::ALL.len() + 2);
        assert_eq!(ov.head.len(), HEAD_ROWS);
        assert_eq!(ov.head.columns.len(), Metric::ALL.len() + 2);
        assert_eq!(ov.summary.len(), Metric::ALL.len() + 1);
        assert_eq!(ov.summary[0].field, Field::Year);
        assert_eq!(ov.summary[0].min, Some(2000.0));
    }

    #[test]
    fn test_summary_table_layout() {
        let rows = vec![obs("A", 2000).with(Metric::GdpPerCapita, 7.0)];
        let table = FieldSummary::table(&summarize(&rows, &[GDP]).unwrap());
        assert_eq!(table.rows[0][0], Cell::Text("gdp_per_capita".into()));
        assert_eq!(table.rows[0][1], Cell::Int(1));
    }
}
