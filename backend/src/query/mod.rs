//! Analytics transform layer.
//!
//! Every report is built from a handful of independent, pure query
//! functions over the read-only [`Dataset`](crate::dataset::Dataset):
//!
//! - [`ranking`] - Top/bottom N rows of one year
//! - [`extremes`] - Lowest/highest N unique entities of one year
//! - [`correlation`] - Pairwise-complete Pearson matrix
//! - [`series`] - Time series for selected entities
//! - [`reduction`] - First/last value per entity and the improvement
//! - [`latest`] - Ranking of each entity's most recent row
//! - [`summary`] - Descriptive statistics
//!
//! Sorting is always stable and rows whose ranking value is missing are
//! left out of ranked results.

pub mod correlation;
pub mod extremes;
pub mod latest;
pub mod ranking;
pub mod reduction;
pub mod series;
pub mod summary;

pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use extremes::{extremes, Extreme, ExtremesQuery};
pub use latest::{latest_per_entity, latest_top, LatestQuery};
pub use ranking::{rank, RankingQuery};
pub use reduction::{first_last_reductions, Reduction};
pub use series::{entities, entity_series, resolve_entity, series_table};
pub use summary::{overview, summarize, FieldSummary, Overview};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{QueryError, QueryResult};
use crate::models::{Field, Observation};

/// Sort direction for ranked queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("ascending"),
            SortOrder::Descending => f.write_str("descending"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(format!("unknown sort order '{}' (use asc or desc)", other)),
        }
    }
}

/// Keep rows that have a value for `field`, stable-sorted in `order`.
pub(crate) fn sorted_by<'a>(
    rows: impl IntoIterator<Item = &'a Observation>,
    field: Field,
    order: SortOrder,
) -> Vec<&'a Observation> {
    let mut keyed: Vec<(f64, &Observation)> = rows
        .into_iter()
        .filter_map(|obs| field.numeric_value(obs).map(|v| (v, obs)))
        .collect();
    keyed.sort_by(|a, b| order.apply(a.0.total_cmp(&b.0)));
    keyed.into_iter().map(|(_, obs)| obs).collect()
}

pub(crate) fn check_limit(limit: usize) -> QueryResult<usize> {
    if limit == 0 {
        Err(QueryError::InvalidLimit(limit))
    } else {
        Ok(limit)
    }
}
