//! Top/bottom N rows of a single year.

use serde::{Deserialize, Serialize};

use super::{check_limit, sorted_by, SortOrder};
use crate::dataset::Dataset;
use crate::error::QueryResult;
use crate::models::{Field, Observation};

/// Rank rows of `year` by `field`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingQuery {
    pub year: i32,
    pub field: Field,
    pub order: SortOrder,
    pub limit: usize,
}

/// Rows with `Year == year`, stable-sorted by `field`, first `limit`.
///
/// Ties keep their input order. Fewer matching rows than `limit` is not
/// an error; an absent year yields an empty result.
pub fn rank<'a>(dataset: &'a Dataset, query: &RankingQuery) -> QueryResult<Vec<&'a Observation>> {
    let field = query.field.require_numeric()?;
    let limit = check_limit(query.limit)?;

    let in_year = dataset.rows().iter().filter(|obs| obs.year == query.year);
    let mut ranked = sorted_by(in_year, field, query.order);
    ranked.truncate(limit);
    Ok(ranked)
}
