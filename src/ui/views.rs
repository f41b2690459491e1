use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use super::plot::{self, LabeledBar, LabeledBox};
use crate::color::{generate_palette, ColorScale};
use crate::data::aggregate::{GroupComparison, Metric, GROUPED_STATS};
use crate::data::filter::FilteredTable;
use crate::data::model::{Creature, Stat};
use crate::data::report::{BattleReport, ComparisonReport, GeographyReport, ViewReport};
use crate::state::AppState;

const NO_DATA: &str = "No data for the current filters.";

/// Render the active view in the central panel.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    if let Some(err) = &state.load_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(
                RichText::new(format!("Could not load data:\n{err}\n\nUse File → Open… to pick another file."))
                    .color(Color32::RED)
                    .heading(),
            );
        });
        return;
    }

    let (Some(table), Some(report)) = (state.filtered(), state.report()) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a stats table to begin  (File → Open…)");
        });
        return;
    };

    ui.heading(state.view.title());
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match &report {
            ViewReport::Battle(r) => battle_view(ui, state, r, &table),
            ViewReport::Geography(r) => geography_view(ui, r),
            ViewReport::Comparison(r) => comparison_view(ui, r),
        });
}

fn no_data(ui: &mut Ui) {
    ui.label(RichText::new(NO_DATA).italics());
}

// ---------------------------------------------------------------------------
// Battle explorer
// ---------------------------------------------------------------------------

fn battle_view(ui: &mut Ui, state: &AppState, report: &BattleReport, table: &FilteredTable<'_>) {
    ui.columns(report.extrema.len(), |cols: &mut [Ui]| {
        for (col, (stat, ext)) in cols.iter_mut().zip(&report.extrema) {
            col.group(|ui: &mut Ui| {
                ui.label(format!("Max {stat}"));
                match ext {
                    Some(e) => {
                        ui.heading(format!("{:.0}", e.value))
                            .on_hover_text(format!("Creature: {}", e.name));
                    }
                    None => no_data(ui),
                }
            });
        }
    });

    ui.add_space(8.0);
    ui.strong("Attack vs Defense");
    if report.attack_vs_defense.is_empty() {
        no_data(ui);
    } else {
        plot::scatter(
            ui,
            "attack_vs_defense",
            (Stat::Attack.label(), Stat::Defense.label()),
            &report.attack_vs_defense,
            state.color_map.as_ref(),
        );
    }

    ui.add_space(8.0);
    ui.strong("HP distribution");
    if report.hp_distribution.is_empty() {
        no_data(ui);
    } else {
        plot::histogram(ui, "hp_histogram", Stat::Hp.label(), &report.hp_distribution);
    }

    ui.add_space(8.0);
    ui.strong(format!("Filtered table ({} rows)", table.len()));
    if table.is_empty() {
        no_data(ui);
    } else {
        filtered_table(ui, table.rows());
    }
}

const TABLE_HEADERS: [&str; 11] = [
    "ID", "Name", "Category", "Region", "Total", "HP", "Attack", "Defense", "Sp. Atk", "Sp. Def",
    "Speed",
];

fn fmt_stat(value: Option<f64>) -> String {
    value.map(|v| format!("{v}")).unwrap_or_default()
}

fn filtered_table(ui: &mut Ui, rows: &[&Creature]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(360.0)
        .columns(Column::auto().at_least(48.0), TABLE_HEADERS.len())
        .header(20.0, |mut header| {
            for h in TABLE_HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(h);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let c = rows[row.index()];
                let id = c.id.map(|i| i.to_string()).unwrap_or_default();
                let text = [
                    id.as_str(),
                    c.name.as_str(),
                    c.tag(),
                    c.region.as_deref().unwrap_or(""),
                ];
                for t in text {
                    row.col(|ui: &mut Ui| {
                        ui.label(t);
                    });
                }
                for stat in Stat::ALL {
                    row.col(|ui: &mut Ui| {
                        ui.label(fmt_stat(c.stat(stat)));
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

fn geography_view(ui: &mut Ui, report: &GeographyReport) {
    ui.strong("Average total by region");
    if report.region_averages.is_empty() {
        no_data(ui);
    } else {
        let (lo, hi) = report
            .region_averages
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                (lo.min(r.mean_total), hi.max(r.mean_total))
            });
        let scale = ColorScale::new(lo, hi);
        let bars: Vec<LabeledBar> = report
            .region_averages
            .iter()
            .map(|r| LabeledBar {
                label: r.region.clone(),
                value: r.mean_total,
                color: scale.color_for(r.mean_total),
            })
            .collect();
        plot::horizontal_bars(ui, "region_averages", "Mean total", &bars);
    }

    ui.add_space(8.0);
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Top 10 by total");
        if report.top_by_total.is_empty() {
            no_data(&mut cols[0]);
        } else {
            let bars: Vec<LabeledBar> = report
                .top_by_total
                .iter()
                .map(|e| LabeledBar {
                    label: e.name.clone(),
                    value: e.total,
                    color: Color32::LIGHT_BLUE,
                })
                .collect();
            plot::horizontal_bars(&mut cols[0], "top_by_total", "Total", &bars);
        }

        cols[1].strong("Category distribution");
        if report.category_counts.is_empty() {
            no_data(&mut cols[1]);
        } else {
            let bars: Vec<LabeledBar> = report
                .category_counts
                .iter()
                .map(|c| LabeledBar {
                    label: c.category.clone(),
                    value: c.count as f64,
                    color: Color32::LIGHT_GREEN,
                })
                .collect();
            plot::horizontal_bars(&mut cols[1], "category_counts", "Count", &bars);
        }
    });
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

fn comparison_table(ui: &mut Ui, id: &str, groups: &[&GroupComparison]) {
    egui::Grid::new(id).striped(true).show(ui, |ui: &mut Ui| {
        for h in ["Group", "Count", "Mean total", "Gap vs global"] {
            ui.strong(h);
        }
        ui.end_row();
        for g in groups {
            ui.label(&g.group);
            ui.label(g.count.to_string());
            ui.label(g.mean_total.to_string());
            ui.label(match g.gap_vs_global {
                Metric::Available(v) => format!("{v:+.1}"),
                Metric::NotAvailable => Metric::NotAvailable.to_string(),
            });
            ui.end_row();
        }
    });
}

fn metric_bars(groups: &[&GroupComparison]) -> Vec<LabeledBar> {
    let palette = generate_palette(groups.len());
    groups
        .iter()
        .zip(palette)
        .filter_map(|(g, color)| {
            Some(LabeledBar {
                label: g.group.clone(),
                value: g.mean_total.value()?,
                color,
            })
        })
        .collect()
}

fn comparison_view(ui: &mut Ui, report: &ComparisonReport) {
    if report.rows == 0 {
        no_data(ui);
        return;
    }

    let trg = &report.top_rest_global;
    let groups = [&trg.top, &trg.rest, &trg.global];
    ui.strong("Top vs rest vs global");
    comparison_table(ui, "top_rest_global", &groups);
    plot::horizontal_bars(ui, "top_rest_global_bars", "Mean total", &metric_bars(&groups));

    ui.add_space(8.0);
    let mut groups: Vec<&GroupComparison> = report.substring.groups.iter().collect();
    groups.push(&report.substring.global);
    ui.strong("Category comparison");
    comparison_table(ui, "substring_comparison", &groups);

    let palette = generate_palette(report.substring_boxes.len());
    let boxes: Vec<LabeledBox> = report
        .substring_boxes
        .iter()
        .zip(palette)
        .filter_map(|(b, color)| {
            let s = b.summary?;
            Some(LabeledBox {
                label: b.substring.clone(),
                spread: (s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
                color,
            })
        })
        .collect();
    if boxes.is_empty() {
        no_data(ui);
    } else {
        plot::box_plot(ui, "substring_boxes", "Total", &boxes);
    }

    ui.add_space(8.0);
    ui.strong("Mean attack, defense and speed by category");
    let categories: Vec<String> = {
        let mut seen: Vec<String> = Vec::new();
        for m in &report.category_means {
            if seen.last() != Some(&m.category) {
                seen.push(m.category.clone());
            }
        }
        seen
    };
    let series: Vec<(String, Vec<Option<f64>>)> = GROUPED_STATS
        .iter()
        .map(|&stat| {
            let values = categories
                .iter()
                .map(|cat| {
                    report
                        .category_means
                        .iter()
                        .find(|m| &m.category == cat && m.stat == stat)
                        .and_then(|m| m.mean.value())
                })
                .collect();
            (stat.label().to_string(), values)
        })
        .collect();
    if categories.is_empty() {
        no_data(ui);
    } else {
        plot::grouped_bars(ui, "category_means", &categories, &series);
    }
}
