//! The in-memory dataset.
//!
//! Loaded once at startup, checked against the schema, then shared
//! read-only for the lifetime of the process.
//!
//! ```text
//! bytes ──▶ decode_auto ──▶ header check ──▶ parse_observations ──▶ Dataset
//!          (encoding,        (required         (typed rows)
//!           delimiter)        columns)
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::api::logs::{log_info, log_success};
use crate::error::{DatasetError, DatasetResult};
use crate::models::{Field, Metric, Observation, ENTITY_HEADER, YEAR_HEADER};
use crate::parser::{decode_auto, parse_observations, read_headers};

/// Which row order first/last-per-entity operations see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// Stable sort by (entity, year) first, so first/last mean earliest/latest.
    #[default]
    Chronological,
    /// File order. First/last are only chronological when the file
    /// already lists each entity's years in ascending order.
    AsLoaded,
}

/// Where the dataset came from and how it was decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub path: Option<String>,
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
}

/// Immutable table of observations.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<Observation>,
    source: SourceInfo,
}

impl Dataset {
    /// Load and validate a dataset file.
    pub fn load(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        log_info(format!("Loading dataset: {}", path.display()));

        let bytes = std::fs::read(path)?;
        let mut dataset = Self::from_bytes(&bytes)?;
        dataset.source.path = Some(path.display().to_string());

        log_success(format!(
            "Loaded {} rows x {} columns ({}, delimiter '{}')",
            dataset.len(),
            dataset.column_count(),
            dataset.source.encoding,
            format_delimiter(dataset.source.delimiter)
        ));
        Ok(dataset)
    }

    /// Decode, check the header against the schema, and parse rows.
    pub fn from_bytes(bytes: &[u8]) -> DatasetResult<Self> {
        let decoded = decode_auto(bytes)?;
        let headers = read_headers(&decoded.content, decoded.delimiter)?;

        let missing = missing_columns(&headers);
        if !missing.is_empty() {
            return Err(DatasetError::MissingColumns(missing));
        }

        let rows = parse_observations(&decoded.content, decoded.delimiter)?;
        if rows.is_empty() {
            return Err(DatasetError::Empty);
        }

        Ok(Self {
            rows,
            source: SourceInfo {
                path: None,
                encoding: decoded.encoding,
                delimiter: decoded.delimiter,
                headers,
            },
        })
    }

    /// Build a dataset from rows already in memory.
    pub fn from_rows(rows: Vec<Observation>) -> Self {
        let headers = Field::all().into_iter().map(|f| f.header().to_string()).collect();
        Self {
            rows,
            source: SourceInfo {
                path: None,
                encoding: "utf-8".to_string(),
                delimiter: ',',
                headers,
            },
        }
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns in the source file.
    pub fn column_count(&self) -> usize {
        self.source.headers.len()
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    /// Rows in the requested order for first/last-per-entity operations.
    pub fn ordered(&self, order: RowOrder) -> Vec<&Observation> {
        let mut rows: Vec<&Observation> = self.rows.iter().collect();
        if order == RowOrder::Chronological {
            rows.sort_by(|a, b| a.entity.cmp(&b.entity).then(a.year.cmp(&b.year)));
        }
        rows
    }
}

/// Required headers absent from `headers`, in schema order.
pub fn missing_columns(headers: &[String]) -> Vec<String> {
    let has = |wanted: &str| headers.iter().any(|h| h.trim() == wanted);

    let mut missing = Vec::new();
    for id in [ENTITY_HEADER, YEAR_HEADER] {
        if !has(id) {
            missing.push(id.to_string());
        }
    }
    for metric in Metric::ALL.into_iter().filter(|m| m.is_required()) {
        if !headers.iter().any(|h| metric.matches_header(h)) {
            missing.push(metric.header().to_string());
        }
    }
    missing
}

fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_header() -> String {
        Field::all()
            .into_iter()
            .map(|f| format!("\"{}\"", f.header()))
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn test_from_bytes_with_full_schema() {
        let blanks = vec![""; Metric::ALL.len()].join(",");
        let csv = format!("{}\nNorway,2020,{}\nChad,2020,{}", full_header(), blanks, blanks);
        let dataset = Dataset::from_bytes(csv.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.column_count(), Metric::ALL.len() + 2);
        assert_eq!(dataset.source().delimiter, ',');
        assert_eq!(dataset.rows()[1].entity, "Chad");
    }

    #[test]
    fn test_missing_required_columns_fail_loudly() {
        let csv = "Entity,Year,gdp_per_capita\nA,2020,1";
        let err = Dataset::from_bytes(csv.as_bytes()).unwrap_err();

        match err {
            DatasetError::MissingColumns(cols) => {
                assert!(cols.contains(&"Value_co2_emissions_kt_by_country".to_string()));
                assert!(!cols.contains(&"gdp_per_capita".to_string()));
                assert!(!cols.contains(&"Entity".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let headers: Vec<String> = Field::all()
            .into_iter()
            .filter(|f| match f {
                Field::Metric(m) => m.is_required(),
                _ => true,
            })
            .map(|f| f.header().to_string())
            .collect();
        assert!(missing_columns(&headers).is_empty());
    }

    #[test]
    fn test_header_only_is_empty() {
        let err = Dataset::from_bytes(full_header().as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::Empty));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Dataset::load("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }

    #[test]
    fn test_chronological_order_is_stable() {
        let dataset = Dataset::from_rows(vec![
            Observation::new("B", 2020),
            Observation::new("A", 2020),
            Observation::new("A", 2000),
            Observation::new("B", 2000),
        ]);

        let order: Vec<(&str, i32)> = dataset
            .ordered(RowOrder::Chronological)
            .iter()
            .map(|o| (o.entity.as_str(), o.year))
            .collect();
        assert_eq!(order, vec![("A", 2000), ("A", 2020), ("B", 2000), ("B", 2020)]);

        let loaded: Vec<i32> = dataset.ordered(RowOrder::AsLoaded).iter().map(|o| o.year).collect();
        assert_eq!(loaded, vec![2020, 2020, 2000, 2000]);
    }
}
