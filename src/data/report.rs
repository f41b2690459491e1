use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::aggregate::{
    average_total_by_region, category_counts, category_stat_means, extremum, histogram,
    scatter_points, substring_box_summaries, substring_comparison, top_n, top_rest_global,
    CategoryCount, CategoryStatMean, Extremum, HistogramBin, RegionAverage, ScatterPoint,
    SubstringBox, SubstringComparison, TopRestComparison, GROUPED_STATS, TOP_GROUP_SIZE,
};
use super::model::{Creature, Stat};

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// The three dashboard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Battle,
    Geography,
    Comparison,
}

impl View {
    pub const ALL: [View; 3] = [View::Battle, View::Geography, View::Comparison];

    pub fn title(self) -> &'static str {
        match self {
            View::Battle => "Battle explorer",
            View::Geography => "Geography",
            View::Comparison => "Comparison",
        }
    }
}

/// Knobs the reports depend on.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub hp_bins: usize,
    /// The two substrings compared in the comparison view.
    pub compare: [String; 2],
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            hp_bins: 30,
            compare: ["Fire".to_string(), "Water".to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// Per-view reports
// ---------------------------------------------------------------------------

/// A ranked row of the top-N chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub name: String,
    pub total: f64,
    pub category_tag: String,
    pub region: String,
}

impl RankedEntry {
    fn from_creature(c: &Creature) -> Self {
        RankedEntry {
            name: c.name.clone(),
            total: c.stat(Stat::Total).unwrap_or_default(),
            category_tag: c.tag().to_string(),
            region: c.region.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleReport {
    pub rows: usize,
    /// Maximum total, speed, attack and defense, `None` when no value exists.
    pub extrema: Vec<(Stat, Option<Extremum>)>,
    pub attack_vs_defense: Vec<ScatterPoint>,
    pub hp_distribution: Vec<HistogramBin>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeographyReport {
    pub rows: usize,
    pub region_averages: Vec<RegionAverage>,
    pub top_by_total: Vec<RankedEntry>,
    pub category_counts: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub rows: usize,
    pub top_rest_global: TopRestComparison,
    pub substring: SubstringComparison,
    pub substring_boxes: Vec<SubstringBox>,
    pub category_means: Vec<CategoryStatMean>,
}

/// Everything one view displays, computed from the filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewReport {
    Battle(BattleReport),
    Geography(GeographyReport),
    Comparison(ComparisonReport),
}

pub const EXTREMA_STATS: [Stat; 4] = [Stat::Total, Stat::Speed, Stat::Attack, Stat::Defense];

pub fn battle_report(rows: &[&Creature], opts: &ReportOptions) -> BattleReport {
    BattleReport {
        rows: rows.len(),
        extrema: EXTREMA_STATS
            .iter()
            .map(|&s| (s, extremum(rows, s)))
            .collect(),
        attack_vs_defense: scatter_points(rows, Stat::Attack, Stat::Defense),
        hp_distribution: histogram(rows, Stat::Hp, opts.hp_bins),
    }
}

pub fn geography_report(rows: &[&Creature]) -> GeographyReport {
    GeographyReport {
        rows: rows.len(),
        region_averages: average_total_by_region(rows),
        top_by_total: top_n(rows, Stat::Total, TOP_GROUP_SIZE)
            .into_iter()
            .map(RankedEntry::from_creature)
            .collect(),
        category_counts: category_counts(rows),
    }
}

pub fn comparison_report(rows: &[&Creature], opts: &ReportOptions) -> ComparisonReport {
    let needles: Vec<&str> = opts.compare.iter().map(String::as_str).collect();
    ComparisonReport {
        rows: rows.len(),
        top_rest_global: top_rest_global(rows, TOP_GROUP_SIZE),
        substring: substring_comparison(rows, &needles),
        substring_boxes: substring_box_summaries(rows, &needles),
        category_means: category_stat_means(rows, &GROUPED_STATS),
    }
}

/// Build the report for `view`.
pub fn build_report(view: View, rows: &[&Creature], opts: &ReportOptions) -> ViewReport {
    match view {
        View::Battle => ViewReport::Battle(battle_report(rows, opts)),
        View::Geography => ViewReport::Geography(geography_report(rows)),
        View::Comparison => ViewReport::Comparison(comparison_report(rows, opts)),
    }
}

/// Write a report as pretty-printed JSON.
pub fn write_json(path: &Path, report: &ViewReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).context("writing report JSON")?;
    writer.flush().context("flushing report JSON")?;
    log::info!("Exported report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::Value as JsonValue;

    use super::*;
    use crate::data::model::fixtures::*;

    fn sample() -> Vec<Creature> {
        vec![
            with_stat(creature("Charizard", Some("Fire/Flying"), Some("Japan"), Some(534.0)), Stat::Hp, 78.0),
            with_stat(creature("Squirtle", Some("Water"), Some("Chile"), Some(314.0)), Stat::Hp, 44.0),
        ]
    }

    #[test]
    fn empty_subset_builds_every_report() {
        let opts = ReportOptions::default();
        for view in View::ALL {
            match build_report(view, &[], &opts) {
                ViewReport::Battle(r) => {
                    assert_eq!(r.rows, 0);
                    assert!(r.extrema.iter().all(|(_, e)| e.is_none()));
                    assert!(r.hp_distribution.is_empty());
                }
                ViewReport::Geography(r) => {
                    assert!(r.region_averages.is_empty());
                    assert!(r.top_by_total.is_empty());
                    assert!(r.category_counts.is_empty());
                }
                ViewReport::Comparison(r) => {
                    assert_eq!(r.substring.groups.len(), 2);
                    assert!(r.substring_boxes.iter().all(|b| b.summary.is_none()));
                    assert!(r.category_means.is_empty());
                }
            }
        }
    }

    #[test]
    fn geography_report_ranks_by_total() {
        let cs = sample();
        let rows: Vec<&Creature> = cs.iter().collect();
        let r = geography_report(&rows);
        assert_eq!(r.top_by_total[0].name, "Charizard");
        assert_eq!(r.top_by_total[0].region, "Japan");
        assert_eq!(r.region_averages[0].region, "Japan");
    }

    #[test]
    fn export_writes_tagged_json() {
        let cs = sample();
        let rows: Vec<&Creature> = cs.iter().collect();
        let report = build_report(View::Comparison, &rows, &ReportOptions::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json(&path, &report).unwrap();

        let json: JsonValue =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["view"], "comparison");
        assert_eq!(json["rows"], 2);
        assert_eq!(json["substring"]["groups"][0]["group"], "Fire");
        assert_eq!(json["substring"]["groups"][0]["mean_total"]["available"], 534.0);
        assert_eq!(json["top_rest_global"]["rest"]["mean_total"], "not_available");
    }
}
