//! Per-entity time series and entity lookup.

use std::collections::HashSet;

use crate::dataset::Dataset;
use crate::error::{QueryError, QueryResult};
use crate::models::{Field, Observation, Table};

/// Unique entity names in first-seen order.
pub fn entities(dataset: &Dataset) -> Vec<&str> {
    let mut seen = HashSet::new();
    dataset
        .rows()
        .iter()
        .map(|obs| obs.entity.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Resolve free-text input to a known entity name.
///
/// Tries an exact match, then a case-insensitive match, then a unique
/// case-insensitive prefix.
pub fn resolve_entity<'a>(dataset: &'a Dataset, input: &str) -> QueryResult<&'a str> {
    let wanted = input.trim();
    let names = entities(dataset);

    if let Some(name) = names.iter().copied().find(|n| *n == wanted) {
        return Ok(name);
    }

    let lower = wanted.to_lowercase();
    if let Some(name) = names.iter().copied().find(|n| n.to_lowercase() == lower) {
        return Ok(name);
    }

    if !lower.is_empty() {
        let mut prefixed = names.iter().copied().filter(|n| n.to_lowercase().starts_with(&lower));
        if let (Some(name), None) = (prefixed.next(), prefixed.next()) {
            return Ok(name);
        }
    }

    Err(QueryError::UnknownEntity(wanted.to_string()))
}

/// All rows of the given entities, in insertion order.
pub fn entity_series<'a, S: AsRef<str>>(dataset: &'a Dataset, names: &[S]) -> Vec<&'a Observation> {
    let wanted: HashSet<&str> = names.iter().map(|n| n.as_ref()).collect();
    dataset
        .rows()
        .iter()
        .filter(|obs| wanted.contains(obs.entity.as_str()))
        .collect()
}

/// Project series rows onto Year, Entity and `fields`.
pub fn series_table<'a, I>(rows: I, fields: &[Field]) -> Table
where
    I: IntoIterator<Item = &'a Observation>,
{
    let mut columns = vec![Field::Year, Field::Entity];
    columns.extend(
        fields
            .iter()
            .copied()
            .filter(|f| !matches!(f, Field::Year | Field::Entity)),
    );
    Table::project(rows, &columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, Metric};
    use crate::query::fixtures::{energy, obs};

    #[test]
    fn test_entities_first_seen_order() {
        assert_eq!(entities(&energy()), vec!["Norway", "Chad", "India", "Germany"]);
    }

    #[test]
    fn test_resolve_entity() {
        let dataset = Dataset::from_rows(vec![
            obs("India", 2020),
            obs("Indonesia", 2020),
            obs("Chad", 2020),
            obs("chad", 2020),
        ]);

        assert_eq!(resolve_entity(&dataset, "chad").unwrap(), "chad");
        assert_eq!(resolve_entity(&dataset, "INDIA").unwrap(), "India");
        assert_eq!(resolve_entity(&dataset, " indo").unwrap(), "Indonesia");
        assert_eq!(
            resolve_entity(&dataset, "ind"),
            Err(QueryError::UnknownEntity("ind".into()))
        );
        assert!(resolve_entity(&dataset, "").is_err());
    }

    #[test]
    fn test_entity_series_keeps_insertion_order() {
        let dataset = energy();
        let rows = entity_series(&dataset, &["Germany", "Norway"]);
        let keys: Vec<(&str, i32)> = rows.iter().map(|o| (o.entity.as_str(), o.year)).collect();
        assert_eq!(
            keys,
            vec![
                ("Norway", 2000),
                ("Norway", 2010),
                ("Norway", 2020),
                ("Germany", 2000),
                ("Germany", 2010),
                ("Germany", 2020),
            ]
        );
        assert!(entity_series(&dataset, &["Atlantis"]).is_empty());
    }

    #[test]
    fn test_series_table_columns() {
        let dataset = energy();
        let rows = entity_series(&dataset, &["India"]);
        let table = series_table(rows, &[Field::Metric(Metric::AccessToElectricity), Field::Year]);

        let keys: Vec<&str> = table.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["year", "entity", "access_to_electricity"]);
        assert_eq!(table.rows[2], vec![Cell::Int(2020), Cell::Text("India".into()), Cell::Number(Some(96.0))]);
    }
}
