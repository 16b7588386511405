//! Ranking of each entity's most recent row.

use serde::{Deserialize, Serialize};

use super::extremes::keep_last_per_entity;
use super::{check_limit, sorted_by, SortOrder};
use crate::dataset::{Dataset, RowOrder};
use crate::error::QueryResult;
use crate::models::{Field, Observation};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestQuery {
    pub field: Field,
    pub order: SortOrder,
    pub limit: usize,
    #[serde(default)]
    pub row_order: RowOrder,
}

/// Last row of every entity, in the order the rows were seen.
pub fn latest_per_entity(dataset: &Dataset, order: RowOrder) -> Vec<&Observation> {
    keep_last_per_entity(dataset.ordered(order))
}

/// Most recent row per entity, ranked by `field`, first `limit`.
pub fn latest_top<'a>(dataset: &'a Dataset, query: &LatestQuery) -> QueryResult<Vec<&'a Observation>> {
    let field = query.field.require_numeric()?;
    let limit = check_limit(query.limit)?;

    let latest = latest_per_entity(dataset, query.row_order);
    let mut ranked = sorted_by(latest, field, query.order);
    ranked.truncate(limit);
    Ok(ranked)
}
