//! Lowest/highest N unique entities of a single year.
//!
//! The slice is taken in three steps, in this order:
//!
//! 1. stable ascending sort by the metric,
//! 2. drop duplicate entities, keeping the **last** row of each in the
//!    sorted order (the highest value of that entity),
//! 3. head (lowest) or tail (highest).
//!
//! Deduplicating after the sort decides which duplicate survives.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::{check_limit, sorted_by, SortOrder};
use crate::dataset::Dataset;
use crate::error::QueryResult;
use crate::models::{Field, Observation};

/// Which end of the sorted, deduplicated rows to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extreme {
    Lowest,
    Highest,
}

impl fmt::Display for Extreme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extreme::Lowest => f.write_str("lowest"),
            Extreme::Highest => f.write_str("highest"),
        }
    }
}

impl FromStr for Extreme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lowest" | "low" | "head" => Ok(Extreme::Lowest),
            "highest" | "high" | "tail" => Ok(Extreme::Highest),
            other => Err(format!("unknown extreme '{}' (use lowest or highest)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremesQuery {
    pub year: i32,
    pub field: Field,
    pub extreme: Extreme,
    pub limit: usize,
}

/// Unique-entity extremes of `year`, in ascending order of `field`.
pub fn extremes<'a>(dataset: &'a Dataset, query: &ExtremesQuery) -> QueryResult<Vec<&'a Observation>> {
    let field = query.field.require_numeric()?;
    let limit = check_limit(query.limit)?;

    let in_year = dataset.rows().iter().filter(|obs| obs.year == query.year);
    let sorted = sorted_by(in_year, field, SortOrder::Ascending);
    let unique = keep_last_per_entity(sorted);

    let slice = match query.extreme {
        Extreme::Lowest => unique.into_iter().take(limit).collect(),
        Extreme::Highest => {
            let skip = unique.len().saturating_sub(limit);
            unique.into_iter().skip(skip).collect()
        }
    };
    Ok(slice)
}

/// Drop duplicate entities, keeping each one's last occurrence in place.
pub(crate) fn keep_last_per_entity(rows: Vec<&Observation>) -> Vec<&Observation> {
    let mut last_index: HashMap<&str, usize> = HashMap::new();
    for (idx, obs) in rows.iter().enumerate() {
        last_index.insert(obs.entity.as_str(), idx);
    }

    rows.iter()
        .enumerate()
        .filter(|(idx, obs)| last_index.get(obs.entity.as_str()) == Some(idx))
        .map(|(_, obs)| *obs)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;
    use crate::query::fixtures::{energy, obs};
    use std::collections::HashSet;

    fn access(extreme: Extreme, limit: usize) -> ExtremesQuery {
        ExtremesQuery {
            year: 2020,
            field: Field::Metric(Metric::AccessToElectricity),
            extreme,
            limit,
        }
    }

    #[test]
    fn test_duplicates_keep_highest_value() {
        let dataset = energy();
        let lowest = extremes(&dataset, &access(Extreme::Lowest, 1)).unwrap();

        // Chad appears twice in 2020 (9.0 and 11.0); the later row in
        // ascending order survives.
        assert_eq!(lowest.len(), 1);
        assert_eq!(lowest[0].entity, "Chad");
        assert_eq!(lowest[0].access_to_electricity, Some(11.0));
    }

    #[test]
    fn test_no_entity_repeats() {
        let dataset = energy();
        for extreme in [Extreme::Lowest, Extreme::Highest] {
            let rows = extremes(&dataset, &access(extreme, 10)).unwrap();
            let unique: HashSet<&str> = rows.iter().map(|o| o.entity.as_str()).collect();
            assert_eq!(unique.len(), rows.len());
            assert_eq!(rows.len(), 4);
        }
    }

    #[test]
    fn test_lowest_and_highest_disjoint() {
        let dataset = energy();
        let low: HashSet<&str> = extremes(&dataset, &access(Extreme::Lowest, 2))
            .unwrap()
            .iter()
            .map(|o| o.entity.as_str())
            .collect();
        let high: HashSet<&str> = extremes(&dataset, &access(Extreme::Highest, 2))
            .unwrap()
            .iter()
            .map(|o| o.entity.as_str())
            .collect();

        assert!(low.is_disjoint(&high));
        assert_eq!(low, HashSet::from(["Chad", "India"]));
    }

    #[test]
    fn test_highest_is_ascending_tail() {
        let dataset = Dataset::from_rows(vec![
            obs("A", 2020).with(Metric::RenewableShare, 30.0),
            obs("B", 2020).with(Metric::RenewableShare, 10.0),
            obs("C", 2020).with(Metric::RenewableShare, 20.0),
            obs("D", 2020),
        ]);
        let query = ExtremesQuery {
            year: 2020,
            field: Field::Metric(Metric::RenewableShare),
            extreme: Extreme::Highest,
            limit: 2,
        };
        let names: Vec<&str> = extremes(&dataset, &query)
            .unwrap()
            .iter()
            .map(|o| o.entity.as_str())
            .collect();
        assert_eq!(names, vec!["C", "A"]);
    }

    #[test]
    fn test_keep_last_per_entity_preserves_positions() {
        let rows = vec![obs("A", 1), obs("B", 1), obs("A", 2), obs("C", 1)];
        let kept: Vec<(&str, i32)> = keep_last_per_entity(rows.iter().collect())
            .iter()
            .map(|o| (o.entity.as_str(), o.year))
            .collect();
        assert_eq!(kept, vec![("B", 1), ("A", 2), ("C", 1)]);
    }

    #[test]
    fn test_extreme_parsing() {
        assert_eq!("tail".parse::<Extreme>(), Ok(Extreme::Highest));
        assert_eq!("Lowest".parse::<Extreme>(), Ok(Extreme::Lowest));
        assert!("middle".parse::<Extreme>().is_err());
    }
}
