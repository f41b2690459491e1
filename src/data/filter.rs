use std::collections::BTreeSet;

use super::model::{Creature, Dataset, Stat};

// ---------------------------------------------------------------------------
// Filter criteria: what the sidebar has selected
// ---------------------------------------------------------------------------

/// Current sidebar selection.
///
/// An empty `regions` or `categories` set means "no restriction" for that
/// field, not "match nothing". Mirrors the multiselect widgets, where
/// clearing every chip shows the whole table.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub regions: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    /// Inclusive `(min, max)` on `total`.
    pub total_range: (f64, f64),
}

impl FilterCriteria {
    /// Criteria that let every record with a present total through.
    pub fn allow_all(dataset: &Dataset) -> Self {
        FilterCriteria {
            regions: BTreeSet::new(),
            categories: BTreeSet::new(),
            total_range: dataset.total_bounds.unwrap_or((0.0, 0.0)),
        }
    }
}

/// Initial sidebar state: the first `max_regions` regions (all of them when
/// there are no more than that), every category, the full total range.
pub fn init_filter_state(dataset: &Dataset, max_regions: usize) -> FilterCriteria {
    let regions = if dataset.regions.len() > max_regions {
        dataset.regions.iter().take(max_regions).cloned().collect()
    } else {
        dataset.regions.clone()
    };
    FilterCriteria {
        regions,
        categories: dataset.categories.clone(),
        total_range: dataset.total_bounds.unwrap_or((0.0, 0.0)),
    }
}

/// Whether a single record satisfies all three predicates.
///
/// * region: selection empty, or the record's region is selected
/// * category: selection empty, or any of the record's labels is selected
/// * total: present and within the inclusive range
pub fn passes(creature: &Creature, criteria: &FilterCriteria) -> bool {
    let region_ok = criteria.regions.is_empty()
        || creature
            .region
            .as_ref()
            .is_some_and(|r| criteria.regions.contains(r));

    let category_ok = criteria.categories.is_empty()
        || creature
            .category_list
            .iter()
            .any(|c| criteria.categories.contains(c));

    let (lo, hi) = criteria.total_range;
    let total_ok = creature
        .stat(Stat::Total)
        .is_some_and(|t| lo <= t && t <= hi);

    region_ok && category_ok && total_ok
}

/// Return indices of records that pass all filters, in table order.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .creatures
        .iter()
        .enumerate()
        .filter(|(_, c)| passes(c, criteria))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// FilteredTable – borrowed view over the passing rows
// ---------------------------------------------------------------------------

/// The filtered subset: borrowed records in original relative order.
#[derive(Debug, Clone, Default)]
pub struct FilteredTable<'a> {
    rows: Vec<&'a Creature>,
}

impl<'a> FilteredTable<'a> {
    /// Apply `criteria` to the full table.
    pub fn apply(dataset: &'a Dataset, criteria: &FilterCriteria) -> Self {
        FilteredTable {
            rows: dataset.creatures.iter().filter(|c| passes(c, criteria)).collect(),
        }
    }

    /// Rebuild from cached indices (see [`filtered_indices`]).
    pub fn from_indices(dataset: &'a Dataset, indices: &[usize]) -> Self {
        FilteredTable {
            rows: indices
                .iter()
                .filter_map(|&i| dataset.creatures.get(i))
                .collect(),
        }
    }

    pub fn rows(&self) -> &[&'a Creature] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::*;

    fn sample() -> Dataset {
        dataset(vec![
            creature("Charizard", Some("Fire/Flying"), Some("Japan"), Some(534.0)),
            creature("Squirtle", Some("Water"), Some("Chile"), Some(314.0)),
            creature("Pidgey", Some("Normal/Flying"), Some("Peru"), Some(251.0)),
            creature("Ghost", None, None, Some(400.0)),
            creature("Broken", Some("Fire"), Some("Japan"), None),
        ])
    }

    fn names(table: &FilteredTable<'_>) -> Vec<String> {
        table.rows().iter().map(|c| c.name.clone()).collect()
    }

    fn criteria(regions: &[&str], categories: &[&str], range: (f64, f64)) -> FilterCriteria {
        FilterCriteria {
            regions: regions.iter().map(|s| s.to_string()).collect(),
            categories: categories.iter().map(|s| s.to_string()).collect(),
            total_range: range,
        }
    }

    #[test]
    fn output_is_ordered_subset() {
        let ds = sample();
        let idx = filtered_indices(&ds, &criteria(&["Japan", "Peru"], &[], (0.0, 1000.0)));
        assert_eq!(idx, [0, 2]);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_region_selection_equals_all_regions() {
        let ds = sample();
        let all: Vec<&str> = ds.regions.iter().map(String::as_str).collect();
        let open = filtered_indices(&ds, &criteria(&[], &["Fire", "Water"], (0.0, 1000.0)));
        let full = filtered_indices(&ds, &criteria(&all, &["Fire", "Water"], (0.0, 1000.0)));
        assert_eq!(open, full);
    }

    #[test]
    fn empty_category_selection_allows_uncategorised_records() {
        let ds = sample();
        let t = FilteredTable::apply(&ds, &criteria(&[], &[], (0.0, 1000.0)));
        assert!(names(&t).contains(&"Ghost".to_string()));

        let t = FilteredTable::apply(&ds, &criteria(&[], &["Fire"], (0.0, 1000.0)));
        assert!(!names(&t).contains(&"Ghost".to_string()));
    }

    #[test]
    fn category_filter_is_overlap_not_subset() {
        let ds = sample();
        let t = FilteredTable::apply(&ds, &criteria(&[], &["Water", "Fire"], (0.0, 1000.0)));
        assert_eq!(names(&t), ["Charizard", "Squirtle"]);
    }

    #[test]
    fn total_range_is_inclusive() {
        let ds = dataset(vec![
            creature("edge", None, None, Some(500.0)),
            creature("over", None, None, Some(501.0)),
            creature("low", None, None, Some(300.0)),
        ]);
        let t = FilteredTable::apply(&ds, &criteria(&[], &[], (300.0, 500.0)));
        assert_eq!(names(&t), ["edge", "low"]);
    }

    #[test]
    fn missing_total_never_passes_range() {
        let ds = sample();
        let t = FilteredTable::apply(&ds, &FilterCriteria::allow_all(&ds));
        assert!(!names(&t).contains(&"Broken".to_string()));
    }

    #[test]
    fn full_selection_reproduces_table() {
        let ds = dataset(vec![
            creature("A", Some("Fire/Flying"), Some("Japan"), Some(534.0)),
            creature("B", Some("Water"), Some("Chile"), Some(314.0)),
            creature("C", Some("Grass"), Some("Peru"), Some(318.5)),
        ]);
        let full = FilterCriteria {
            regions: ds.regions.clone(),
            categories: ds.categories.clone(),
            total_range: ds.total_bounds.unwrap(),
        };
        let t = FilteredTable::apply(&ds, &full);
        let expected: Vec<&Creature> = ds.creatures.iter().collect();
        assert_eq!(t.rows(), expected.as_slice());
    }

    #[test]
    fn record_without_tag_or_region_needs_empty_selection() {
        let ds = dataset(vec![
            creature("A", Some("Fire"), Some("Japan"), Some(300.0)),
            creature("Untagged", None, Some("Japan"), Some(310.0)),
            creature("Nowhere", Some("Fire"), None, Some(320.0)),
        ]);
        let range = ds.total_bounds.unwrap();

        let full = FilterCriteria {
            regions: ds.regions.clone(),
            categories: ds.categories.clone(),
            total_range: range,
        };
        assert_eq!(names(&FilteredTable::apply(&ds, &full)), ["A"]);

        let open = criteria(&[], &[], range);
        assert_eq!(
            names(&FilteredTable::apply(&ds, &open)),
            ["A", "Untagged", "Nowhere"]
        );
    }

    #[test]
    fn init_state_preselects_first_regions() {
        let ds = sample();
        let c = init_filter_state(&ds, 2);
        assert_eq!(c.regions.iter().collect::<Vec<_>>(), ["Chile", "Japan"]);
        assert_eq!(c.categories, ds.categories);
        let c = init_filter_state(&ds, 10);
        assert_eq!(c.regions, ds.regions);
    }

    #[test]
    fn from_indices_matches_apply() {
        let ds = sample();
        let c = criteria(&[], &["Flying"], (0.0, 1000.0));
        let idx = filtered_indices(&ds, &c);
        assert_eq!(
            names(&FilteredTable::from_indices(&ds, &idx)),
            names(&FilteredTable::apply(&ds, &c))
        );
    }
}
