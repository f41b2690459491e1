use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::report::{write_json, View};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    ui.strong("View");
    egui::ComboBox::from_id_salt("view")
        .selected_text(state.view.title())
        .show_ui(ui, |ui: &mut Ui| {
            for view in View::ALL {
                ui.selectable_value(&mut state.view, view, view.title());
            }
        });
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone the option sets so we can mutate state inside the widgets.
    let regions: Vec<String> = dataset.regions.iter().cloned().collect();
    let categories: Vec<String> = dataset.categories.iter().cloned().collect();
    let bounds = dataset.total_bounds.unwrap_or((0.0, 0.0));

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            multiselect(ui, state, "Region", &regions, Field::Region);
            multiselect(ui, state, "Category", &categories, Field::Category);
            ui.separator();

            // ---- Total range ----
            ui.strong("Total range");
            let (mut lo, mut hi) = state.filters.total_range;
            let lo_changed = ui
                .add(egui::Slider::new(&mut lo, bounds.0..=bounds.1).step_by(1.0).text("min"))
                .changed();
            let hi_changed = ui
                .add(egui::Slider::new(&mut hi, bounds.0..=bounds.1).step_by(1.0).text("max"))
                .changed();
            if lo_changed || hi_changed {
                if lo > hi {
                    if lo_changed {
                        hi = lo;
                    } else {
                        lo = hi;
                    }
                }
                state.filters.total_range = (lo, hi);
                state.refilter();
            }

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

#[derive(Clone, Copy)]
enum Field {
    Region,
    Category,
}

/// Collapsible checkbox list. An empty selection shows every record.
fn multiselect(ui: &mut Ui, state: &mut AppState, title: &str, options: &[String], field: Field) {
    let selected = match field {
        Field::Region => &state.filters.regions,
        Field::Category => &state.filters.categories,
    };
    let header = if selected.is_empty() {
        format!("{title}  (all)")
    } else {
        format!("{title}  ({}/{})", selected.len(), options.len())
    };

    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    let set = match field {
                        Field::Region => &mut state.filters.regions,
                        Field::Category => &mut state.filters.categories,
                    };
                    set.extend(options.iter().cloned());
                    state.refilter();
                }
                if ui.small_button("Clear").clicked() {
                    match field {
                        Field::Region => state.filters.regions.clear(),
                        Field::Category => state.filters.categories.clear(),
                    }
                    state.refilter();
                }
            });

            for opt in options {
                let mut checked = match field {
                    Field::Region => state.filters.regions.contains(opt),
                    Field::Category => state.filters.categories.contains(opt),
                };
                if ui.checkbox(&mut checked, opt.as_str()).changed() {
                    match field {
                        Field::Region => state.toggle_region(opt),
                        Field::Category => state.toggle_category(opt),
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.dataset.is_some();
            if ui.add_enabled(can_export, egui::Button::new("Export view…")).clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
            if !ds.warnings.is_empty() {
                ui.separator();
                ui.label(
                    RichText::new(format!("{} unreadable cell(s) left empty", ds.warnings.len()))
                        .color(Color32::YELLOW),
                );
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(msg);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open stats table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let Some(report) = state.report() else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export view")
        .set_file_name("report.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        state.status_message = Some(match write_json(&path, &report) {
            Ok(()) => format!("Exported to {}", path.display()),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                format!("Export failed: {e:#}")
            }
        });
    }
}
