use std::path::PathBuf;

use clap::Parser;

use crate::data::report::{ReportOptions, View};

/// Interactive dashboard over a creature stats table.
#[derive(Debug, Clone, Parser)]
#[command(name = "dexboard", version, about)]
pub struct Args {
    /// Stats table to load (.csv, .json or .parquet)
    #[arg(default_value = "pokedex.csv")]
    pub data: PathBuf,

    /// View shown at start-up
    #[arg(long, value_enum, default_value_t = View::Battle)]
    pub view: View,

    /// Number of regions pre-selected in the sidebar
    #[arg(long, default_value_t = 10)]
    pub default_regions: usize,

    /// First category substring of the comparison view (case-sensitive)
    #[arg(long, default_value = "Fire")]
    pub compare_left: String,

    /// Second category substring of the comparison view (case-sensitive)
    #[arg(long, default_value = "Water")]
    pub compare_right: String,

    /// Bin count of the HP histogram
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u16).range(1..))]
    pub hp_bins: u16,
}

impl Args {
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            hp_bins: usize::from(self.hp_bins),
            compare: [self.compare_left.clone(), self.compare_right.clone()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["dexboard"]);
        assert_eq!(args.data, PathBuf::from("pokedex.csv"));
        assert_eq!(args.view, View::Battle);
        assert_eq!(args.default_regions, 10);
        assert_eq!(args.report_options(), ReportOptions::default());
    }

    #[test]
    fn overrides() {
        let args = Args::parse_from([
            "dexboard",
            "stats.parquet",
            "--view",
            "comparison",
            "--compare-left",
            "Grass",
            "--hp-bins",
            "12",
        ]);
        assert_eq!(args.view, View::Comparison);
        let opts = args.report_options();
        assert_eq!(opts.compare[0], "Grass");
        assert_eq!(opts.hp_bins, 12);
    }

    #[test]
    fn rejects_zero_bins() {
        assert!(Args::try_parse_from(["dexboard", "--hp-bins", "0"]).is_err());
    }
}
