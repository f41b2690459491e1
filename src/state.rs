use std::path::Path;

use crate::color::ColorMap;
use crate::config::Args;
use crate::data::filter::{filtered_indices, init_filter_state, FilterCriteria, FilteredTable};
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::data::report::{build_report, ReportOptions, View, ViewReport};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Dataset>,

    /// Sidebar selections.
    pub filters: FilterCriteria,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Page shown in the central panel.
    pub view: View,

    /// Colours per raw category tag, for the scatter plot.
    pub color_map: Option<ColorMap>,

    pub report_options: ReportOptions,

    /// Regions pre-selected whenever a dataset is (re)loaded.
    pub default_regions: usize,

    /// Blocking load error; nothing renders while set.
    pub load_error: Option<String>,

    /// Non-blocking status line (export results and the like).
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(args: &Args) -> Self {
        let mut state = AppState {
            dataset: None,
            filters: FilterCriteria {
                regions: Default::default(),
                categories: Default::default(),
                total_range: (0.0, 0.0),
            },
            visible_indices: Vec::new(),
            view: args.view,
            color_map: None,
            report_options: args.report_options(),
            default_regions: args.default_regions,
            load_error: None,
            status_message: None,
        };
        state.load(&args.data);
        state
    }

    /// Load a file, replacing the current dataset on success.
    pub fn load(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.dataset = None;
                self.visible_indices.clear();
                self.load_error = Some(format!("{e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, initialise filters and colours.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filters = init_filter_state(&dataset, self.default_regions);
        self.color_map = Some(ColorMap::new(dataset.creatures.iter().map(|c| c.tag())));
        self.dataset = Some(dataset);
        self.load_error = None;
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filters);
        }
    }

    /// The current filtered subset.
    pub fn filtered(&self) -> Option<FilteredTable<'_>> {
        self.dataset
            .as_ref()
            .map(|ds| FilteredTable::from_indices(ds, &self.visible_indices))
    }

    /// Report for the active view over the current subset.
    pub fn report(&self) -> Option<ViewReport> {
        self.filtered()
            .map(|t| build_report(self.view, t.rows(), &self.report_options))
    }

    /// Toggle a region in the selection.
    pub fn toggle_region(&mut self, region: &str) {
        toggle(&mut self.filters.regions, region);
        self.refilter();
    }

    /// Toggle a category label in the selection.
    pub fn toggle_category(&mut self, category: &str) {
        toggle(&mut self.filters.categories, category);
        self.refilter();
    }

    /// Clear both multiselects and reset the total range.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters = FilterCriteria::allow_all(ds);
        }
        self.refilter();
    }
}

fn toggle(set: &mut std::collections::BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}
