//! Pairwise-complete Pearson correlation matrix.
//!
//! Each pair of fields is computed over the rows where *both* values are
//! present, so different cells may rest on different row subsets.

use serde::{Deserialize, Serialize};

use crate::error::QueryResult;
use crate::models::{Cell, Column, Field, Observation, Table};

/// Square, symmetric correlation matrix indexed by `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub fields: Vec<Field>,
    /// `values[i][j]`; `None` when the pair has too few rows or no variance.
    pub values: Vec<Vec<Option<f64>>>,
    /// Number of complete rows behind each cell.
    pub pair_counts: Vec<Vec<usize>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: Field, b: Field) -> Option<f64> {
        let i = self.fields.iter().position(|f| *f == a)?;
        let j = self.fields.iter().position(|f| *f == b)?;
        self.values[i][j]
    }

    /// Heatmap-ready table: one row per field, first column is the name.
    pub fn to_table(&self) -> Table {
        let mut columns = vec![Column::new("variable", "Variable")];
        columns.extend(self.fields.iter().map(|f| Column::from(*f)));

        let mut table = Table::new(columns);
        for (field, row) in self.fields.iter().zip(&self.values) {
            let mut cells = vec![Cell::Text(field.key().to_string())];
            cells.extend(row.iter().map(|v| Cell::Number(*v)));
            table.push_row(cells);
        }
        table
    }
}

/// Correlate `fields` across `rows`.
///
/// Text fields are rejected with [`QueryError::NotNumeric`](crate::error::QueryError)
/// rather than coerced.
pub fn correlation_matrix<'a, I>(rows: I, fields: &[Field]) -> QueryResult<CorrelationMatrix>
where
    I: IntoIterator<Item = &'a Observation>,
{
    for field in fields {
        field.require_numeric()?;
    }

    let rows: Vec<&Observation> = rows.into_iter().collect();
    let columns: Vec<Vec<Option<f64>>> = fields
        .iter()
        .map(|f| rows.iter().map(|obs| f.numeric_value(obs)).collect())
        .collect();

    let n = fields.len();
    let mut values = vec![vec![None; n]; n];
    let mut pair_counts = vec![vec![0; n]; n];

    for i in 0..n {
        for j in i..n {
            let (r, count) = pearson(&columns[i], &columns[j]);
            let r = if i == j { r.map(|_| 1.0) } else { r };
            values[i][j] = r;
            values[j][i] = r;
            pair_counts[i][j] = count;
            pair_counts[j][i] = count;
        }
    }

    Ok(CorrelationMatrix {
        fields: fields.to_vec(),
        values,
        pair_counts,
    })
}

/// Pearson r over complete pairs, and the number of pairs used.
fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> (Option<f64>, usize) {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    let count = pairs.len();
    if count < 2 {
        return (None, count);
    }

    let n = count as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return (None, count);
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    (Some(r.clamp(-1.0, 1.0)), count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::models::Metric;
    use crate::query::fixtures::{energy, obs};

    const GDP: Field = Field::Metric(Metric::GdpPerCapita);
    const ACCESS: Field = Field::Metric(Metric::AccessToElectricity);
    const LAND: Field = Field::Metric(Metric::LandArea);
    const POP: Field = Field::Metric(Metric::Population);

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() {
        let dataset = energy();
        let fields = [ACCESS, GDP, LAND, POP, Field::Year];
        let m = correlation_matrix(dataset.rows(), &fields).unwrap();

        for i in 0..fields.len() {
            assert_eq!(m.values[i][i], Some(1.0));
            for j in 0..fields.len() {
                assert_eq!(m.values[i][j], m.values[j][i]);
                if let Some(r) = m.values[i][j] {
                    assert!((-1.0..=1.0).contains(&r));
                }
            }
        }
    }

    #[test]
    fn test_perfect_linear_relationships() {
        let rows = vec![
            obs("A", 2000).with(Metric::GdpPerCapita, 1.0).with(Metric::Density, 10.0),
            obs("B", 2000).with(Metric::GdpPerCapita, 2.0).with(Metric::Density, 8.0),
            obs("C", 2000).with(Metric::GdpPerCapita, 3.0).with(Metric::Density, 6.0),
        ];
        let density = Field::Metric(Metric::Density);
        let m = correlation_matrix(&rows, &[GDP, density]).unwrap();
        let r = m.get(GDP, density).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_complete_rows() {
        // Population is missing on row B, so GDP/Population uses A and C only.
        let rows = vec![
            obs("A", 2000)
                .with(Metric::GdpPerCapita, 1.0)
                .with(Metric::Population, 5.0)
                .with(Metric::LandArea, 1.0),
            obs("B", 2000)
                .with(Metric::GdpPerCapita, 2.0)
                .with(Metric::LandArea, 3.0),
            obs("C", 2000)
                .with(Metric::GdpPerCapita, 3.0)
                .with(Metric::Population, 7.0)
                .with(Metric::LandArea, 2.0),
        ];
        let m = correlation_matrix(&rows, &[GDP, POP, LAND]).unwrap();

        assert_eq!(m.pair_counts[0][1], 2);
        assert_eq!(m.pair_counts[0][2], 3);
        assert!((m.get(GDP, POP).unwrap() - 1.0).abs() < 1e-12);
        assert!((m.get(GDP, LAND).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_insufficient_data_is_missing() {
        let rows = vec![obs("A", 2000).with(Metric::GdpPerCapita, 1.0)];
        let m = correlation_matrix(&rows, &[GDP, POP]).unwrap();
        assert_eq!(m.get(GDP, POP), None);
        assert_eq!(m.pair_counts[1][1], 0);
    }

    #[test]
    fn test_text_field_rejected() {
        let dataset = energy();
        let err = correlation_matrix(dataset.rows(), &[GDP, Field::Entity]).unwrap_err();
        assert_eq!(err, QueryError::NotNumeric("entity".into()));
    }

    #[test]
    fn test_heatmap_table_layout() {
        let dataset = energy();
        let m = correlation_matrix(dataset.rows(), &[ACCESS, GDP]).unwrap();
        let table = m.to_table();

        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][0], Cell::Text("gdp_per_capita".into()));
        assert_eq!(table.rows[1][2], Cell::Number(Some(1.0)));
    }
}
