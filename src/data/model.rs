use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use super::coerce::CoercionWarning;

// ---------------------------------------------------------------------------
// Stat – the seven numeric columns
// ---------------------------------------------------------------------------

/// One of the seven numeric stat columns of the source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Total,
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl Stat {
    pub const ALL: [Stat; 7] = [
        Stat::Total,
        Stat::Hp,
        Stat::Attack,
        Stat::Defense,
        Stat::SpecialAttack,
        Stat::SpecialDefense,
        Stat::Speed,
    ];

    /// Canonical column name in the source table.
    pub fn column_name(self) -> &'static str {
        match self {
            Stat::Total => "total",
            Stat::Hp => "hp",
            Stat::Attack => "attack",
            Stat::Defense => "defense",
            Stat::SpecialAttack => "special_attack",
            Stat::SpecialDefense => "special_defense",
            Stat::Speed => "speed",
        }
    }

    /// Human-readable label for axes and cards.
    pub fn label(self) -> &'static str {
        match self {
            Stat::Total => "Total",
            Stat::Hp => "HP",
            Stat::Attack => "Attack",
            Stat::Defense => "Defense",
            Stat::SpecialAttack => "Sp. Atk",
            Stat::SpecialDefense => "Sp. Def",
            Stat::Speed => "Speed",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Numeric stats of one record. `None` marks a cell that was missing or
/// failed to parse; it is never treated as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats([Option<f64>; 7]);

impl Stats {
    pub fn get(&self, stat: Stat) -> Option<f64> {
        self.0[stat.index()]
    }

    pub fn set(&mut self, stat: Stat, value: Option<f64>) {
        self.0[stat.index()] = value;
    }
}

// ---------------------------------------------------------------------------
// Creature – one row of the source table
// ---------------------------------------------------------------------------

/// A single creature (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    pub id: Option<i64>,
    pub name: String,
    /// Raw slash-delimited category tag, e.g. `"Fire/Flying"`.
    pub category_tag: Option<String>,
    pub region: Option<String>,
    pub stats: Stats,
    /// `category_tag` split on `/`, trimmed, without empty fragments.
    pub category_list: Vec<String>,
}

impl Creature {
    pub fn stat(&self, stat: Stat) -> Option<f64> {
        self.stats.get(stat)
    }

    /// Category tag as displayed, empty when missing.
    pub fn tag(&self) -> &str {
        self.category_tag.as_deref().unwrap_or("")
    }
}

/// Split a slash-delimited category tag into trimmed, non-empty labels.
///
/// `"Fire/ Flying"` → `["Fire", "Flying"]`, `""` → `[]`.
pub fn split_category_tag(tag: &str) -> Vec<String> {
    tag.split('/')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// RawTable – untyped cells as read from disk
// ---------------------------------------------------------------------------

/// A parsed but untyped table: header names plus one `Option<String>` per
/// cell (`None` = empty / null in the source).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full validated dataset with option sets computed once at load.
/// Immutable for the lifetime of a session; filtering never changes it.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub creatures: Vec<Creature>,
    /// Sorted distinct non-missing regions.
    pub regions: BTreeSet<String>,
    /// Sorted distinct category labels.
    pub categories: BTreeSet<String>,
    /// `(floor(min total), ceil(max total))`, `None` when no total is present.
    pub total_bounds: Option<(f64, f64)>,
    /// Cells that failed numeric coercion.
    pub warnings: Vec<CoercionWarning>,
}

impl Dataset {
    /// Build option sets and bounds from the coerced records.
    pub fn from_creatures(creatures: Vec<Creature>, warnings: Vec<CoercionWarning>) -> Self {
        let mut regions = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut bounds: Option<(f64, f64)> = None;
        let mut seen_ids: BTreeMap<i64, usize> = BTreeMap::new();

        for (row, c) in creatures.iter().enumerate() {
            if let Some(region) = &c.region {
                regions.insert(region.clone());
            }
            categories.extend(c.category_list.iter().cloned());
            if let Some(total) = c.stat(Stat::Total) {
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(total), hi.max(total)),
                    None => (total, total),
                });
            }
            if let Some(id) = c.id {
                if let Some(first) = seen_ids.insert(id, row) {
                    log::warn!("Duplicate id {id} in rows {first} and {row}");
                }
            }
        }

        Dataset {
            creatures,
            regions,
            categories,
            total_bounds: bounds.map(|(lo, hi)| (lo.floor(), hi.ceil())),
            warnings,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A creature with the given tag, region and total; other stats absent.
    pub fn creature(name: &str, tag: Option<&str>, region: Option<&str>, total: Option<f64>) -> Creature {
        let mut stats = Stats::default();
        stats.set(Stat::Total, total);
        Creature {
            id: None,
            name: name.to_string(),
            category_tag: tag.map(str::to_string),
            region: region.map(str::to_string),
            stats,
            category_list: tag.map(split_category_tag).unwrap_or_default(),
        }
    }

    pub fn with_stat(mut c: Creature, stat: Stat, value: f64) -> Creature {
        c.stats.set(stat, Some(value));
        c
    }

    pub fn dataset(creatures: Vec<Creature>) -> Dataset {
        let creatures = creatures
            .into_iter()
            .enumerate()
            .map(|(i, mut c)| {
                c.id = Some(i as i64 + 1);
                c
            })
            .collect();
        Dataset::from_creatures(creatures, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn split_trims_and_drops_empty_fragments() {
        assert_eq!(split_category_tag("Fire/ Flying"), vec!["Fire", "Flying"]);
        assert_eq!(split_category_tag("Fire//"), vec!["Fire"]);
        assert!(split_category_tag("").is_empty());
    }

    #[test]
    fn option_sets_come_from_full_table() {
        let ds = dataset(vec![
            creature("A", Some("Fire/Flying"), Some("Japan"), Some(500.0)),
            creature("B", None, None, Some(309.5)),
            creature("C", Some("Water"), Some("Chile"), None),
        ]);
        assert_eq!(ds.regions.iter().collect::<Vec<_>>(), ["Chile", "Japan"]);
        assert_eq!(ds.categories.iter().collect::<Vec<_>>(), ["Fire", "Flying", "Water"]);
        assert_eq!(ds.total_bounds, Some((309.0, 500.0)));
    }

    #[test]
    fn no_totals_means_no_bounds() {
        let ds = dataset(vec![creature("A", None, None, None)]);
        assert_eq!(ds.total_bounds, None);
    }
}
