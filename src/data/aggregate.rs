//! Derived tables feeding the three dashboard views.
//!
//! Every function takes the filtered subset as `&[&Creature]` and is total:
//! an empty subset yields `None`, an empty `Vec` or [`Metric::NotAvailable`].
//! Missing stat values are skipped, never read as zero.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::model::{split_category_tag, Creature, Stat};

/// Number of records in the "top" group of [`top_rest_global`].
pub const TOP_GROUP_SIZE: usize = 10;

/// Stats averaged per category in [`category_stat_means`].
pub const GROUPED_STATS: [Stat; 3] = [Stat::Attack, Stat::Defense, Stat::Speed];

// ---------------------------------------------------------------------------
// Metric – a mean that may not exist
// ---------------------------------------------------------------------------

/// An aggregate value, or the explicit "not available" marker for an empty group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Available(f64),
    NotAvailable,
}

impl Metric {
    /// Arithmetic mean; `NotAvailable` when there are no values.
    pub fn mean(values: impl IntoIterator<Item = f64>) -> Self {
        let (sum, count) = values
            .into_iter()
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        if count == 0 {
            Metric::NotAvailable
        } else {
            Metric::Available(sum / count as f64)
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Metric::Available(v) => Some(v),
            Metric::NotAvailable => None,
        }
    }

    /// `self - baseline`, unavailable if either side is.
    pub fn gap(self, baseline: Metric) -> Metric {
        match (self, baseline) {
            (Metric::Available(a), Metric::Available(b)) => Metric::Available(a - b),
            _ => Metric::NotAvailable,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Available(v) => write!(f, "{v:.1}"),
            Metric::NotAvailable => write!(f, "n/a"),
        }
    }
}

// ---------------------------------------------------------------------------
// Extremum / ranking
// ---------------------------------------------------------------------------

/// Maximum of a stat and the record holding it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extremum {
    pub stat: Stat,
    pub value: f64,
    pub name: String,
}

/// Maximum of `stat` over `rows`. Ties go to the first record in `rows`.
pub fn extremum(rows: &[&Creature], stat: Stat) -> Option<Extremum> {
    let mut best: Option<Extremum> = None;
    for c in rows {
        let Some(v) = c.stat(stat) else {
            continue;
        };
        if best.as_ref().map_or(true, |b| v > b.value) {
            best = Some(Extremum {
                stat,
                value: v,
                name: c.name.clone(),
            });
        }
    }
    best
}

/// Descending by `stat`, missing values last; stable, so exact ties keep
/// their input order.
fn rank<'a>(rows: &[&'a Creature], stat: Stat) -> Vec<&'a Creature> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| match (a.stat(stat), b.stat(stat)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ranked
}

/// The `n` records with the largest `stat`, descending. Records missing the
/// stat are never ranked.
pub fn top_n<'a>(rows: &[&'a Creature], stat: Stat, n: usize) -> Vec<&'a Creature> {
    let mut ranked = rank(rows, stat);
    ranked.retain(|c| c.stat(stat).is_some());
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Region averages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionAverage {
    pub region: String,
    pub mean_total: f64,
    pub count: usize,
}

/// Mean `total` per region, sorted by mean descending (ties alphabetical).
/// Records without a region or a total are left out.
pub fn average_total_by_region(rows: &[&Creature]) -> Vec<RegionAverage> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for c in rows {
        let (Some(region), Some(total)) = (c.region.as_deref(), c.stat(Stat::Total)) else {
            continue;
        };
        let entry = groups.entry(region).or_default();
        entry.0 += total;
        entry.1 += 1;
    }

    let mut out: Vec<RegionAverage> = groups
        .into_iter()
        .map(|(region, (sum, count))| RegionAverage {
            region: region.to_string(),
            mean_total: sum / count as f64,
            count,
        })
        .collect();
    out.sort_by(|a, b| b.mean_total.total_cmp(&a.mean_total));
    out
}

// ---------------------------------------------------------------------------
// Category explode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Count category labels across `rows`, splitting the raw tag. Sorted by
/// count descending, ties alphabetical. Missing tags contribute nothing.
pub fn category_counts(rows: &[&Creature]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for c in rows {
        let Some(tag) = c.category_tag.as_deref() else {
            continue;
        };
        for label in split_category_tag(tag) {
            *counts.entry(label).or_default() += 1;
        }
    }

    let mut out: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// One (category, stat, mean) triple of the long-format grouped table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStatMean {
    pub category: String,
    pub stat: Stat,
    pub mean: Metric,
}

/// Mean of each of `stats` per category label. A record with several labels
/// counts towards each of them. Output is ordered by category, then by the
/// order of `stats`.
pub fn category_stat_means(rows: &[&Creature], stats: &[Stat]) -> Vec<CategoryStatMean> {
    let mut groups: BTreeMap<&str, Vec<&Creature>> = BTreeMap::new();
    for c in rows {
        for label in &c.category_list {
            groups.entry(label.as_str()).or_default().push(*c);
        }
    }

    groups
        .into_iter()
        .flat_map(|(category, members)| {
            stats.iter().map(move |&stat| CategoryStatMean {
                category: category.to_string(),
                stat,
                mean: Metric::mean(members.iter().filter_map(|c| c.stat(stat))),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Group comparisons
// ---------------------------------------------------------------------------

/// Mean `total` of one group and its distance to the subset-wide mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupComparison {
    pub group: String,
    pub count: usize,
    pub mean_total: Metric,
    pub gap_vs_global: Metric,
}

fn compare_group(group: impl Into<String>, members: &[&Creature], global: Metric) -> GroupComparison {
    let mean_total = Metric::mean(members.iter().filter_map(|c| c.stat(Stat::Total)));
    GroupComparison {
        group: group.into(),
        count: members.len(),
        mean_total,
        gap_vs_global: mean_total.gap(global),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRestComparison {
    pub top: GroupComparison,
    pub rest: GroupComparison,
    pub global: GroupComparison,
}

/// Split `rows` into the `top` records by total and everyone else and
/// compare each group's mean total with the whole subset's.
pub fn top_rest_global(rows: &[&Creature], top: usize) -> TopRestComparison {
    let ranked = rank(rows, Stat::Total);
    let (head, tail) = ranked.split_at(top.min(ranked.len()));
    let global = compare_group("Global", rows, Metric::NotAvailable);
    let global_mean = global.mean_total;

    TopRestComparison {
        top: compare_group(format!("Top {top}"), head, global_mean),
        rest: compare_group("Rest", tail, global_mean),
        global: GroupComparison {
            gap_vs_global: global_mean.gap(global_mean),
            ..global
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubstringComparison {
    pub groups: Vec<GroupComparison>,
    pub global: GroupComparison,
}

fn matching<'a>(rows: &[&'a Creature], needle: &str) -> Vec<&'a Creature> {
    rows.iter()
        .copied()
        .filter(|c| c.category_tag.as_deref().is_some_and(|t| t.contains(needle)))
        .collect()
}

/// Mean `total` of records whose raw category tag contains each literal,
/// case-sensitive substring, next to the subset-wide mean.
pub fn substring_comparison(rows: &[&Creature], needles: &[&str]) -> SubstringComparison {
    let global_mean = Metric::mean(rows.iter().filter_map(|c| c.stat(Stat::Total)));
    SubstringComparison {
        groups: needles
            .iter()
            .map(|n| compare_group(*n, &matching(rows, n), global_mean))
            .collect(),
        global: compare_group("Global", rows, global_mean),
    }
}

// ---------------------------------------------------------------------------
// Chart helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram of `stat`. All-equal values land in a single bin.
pub fn histogram(rows: &[&Creature], stat: Stat, bins: usize) -> Vec<HistogramBin> {
    let values: Vec<f64> = rows.iter().filter_map(|c| c.stat(stat)).collect();
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;

    if width <= 0.0 {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for v in values {
        let i = (((v - min) / width).floor() as usize).min(bins - 1);
        out[i].count += 1;
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub name: String,
    pub category_tag: String,
    pub x: f64,
    pub y: f64,
}

/// Points for records where both stats are present.
pub fn scatter_points(rows: &[&Creature], x: Stat, y: Stat) -> Vec<ScatterPoint> {
    rows.iter()
        .filter_map(|c| {
            Some(ScatterPoint {
                name: c.name.clone(),
                category_tag: c.tag().to_string(),
                x: c.stat(x)?,
                y: c.stat(y)?,
            })
        })
        .collect()
}

/// Five-number summary for a box plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub count: usize,
}

fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Quartiles with linear interpolation; whiskers reach the furthest values
/// within 1.5 IQR of the box.
pub fn box_summary(values: impl IntoIterator<Item = f64>) -> Option<BoxSummary> {
    let mut sorted: Vec<f64> = values.into_iter().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let fence = 1.5 * (q3 - q1);
    let lower_whisker = sorted.iter().copied().find(|v| *v >= q1 - fence).unwrap_or(q1);
    let upper_whisker = sorted.iter().rev().copied().find(|v| *v <= q3 + fence).unwrap_or(q3);

    Some(BoxSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        count: sorted.len(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubstringBox {
    pub substring: String,
    pub summary: Option<BoxSummary>,
}

/// Box summary of `total` for each substring group of [`substring_comparison`].
pub fn substring_box_summaries(rows: &[&Creature], needles: &[&str]) -> Vec<SubstringBox> {
    needles
        .iter()
        .map(|n| SubstringBox {
            substring: n.to_string(),
            summary: box_summary(matching(rows, n).iter().filter_map(|c| c.stat(Stat::Total))),
        })
        .collect()
}
