use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot, Points};

use crate::color::ColorMap;
use crate::data::aggregate::{HistogramBin, ScatterPoint};

const PLOT_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// Formatter that prints `labels[i]` at integer position `i`.
fn label_axis(labels: Vec<String>) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

/// One bar of a horizontal ranking chart.
pub struct LabeledBar {
    pub label: String,
    pub value: f64,
    pub color: Color32,
}

/// Horizontal bar chart, first entry on top.
pub fn horizontal_bars(ui: &mut Ui, id: &str, value_label: &str, entries: &[LabeledBar]) {
    let n = entries.len();
    // egui_plot grows y upwards; flip so the first entry is drawn at the top.
    let labels: Vec<String> = entries.iter().rev().map(|e| e.label.clone()).collect();
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            Bar::new((n - 1 - i) as f64, e.value)
                .name(&e.label)
                .fill(e.color)
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(value_label)
        .y_axis_formatter(label_axis(labels))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

/// Vertical bars grouped by category: one series per metric.
pub fn grouped_bars(ui: &mut Ui, id: &str, groups: &[String], series: &[(String, Vec<Option<f64>>)]) {
    let n_series = series.len().max(1) as f64;
    let width = 0.8 / n_series;
    let colors = ColorMap::new(series.iter().map(|(name, _)| name.as_str()));

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_formatter(label_axis(groups.to_vec()))
        .show(ui, |plot_ui| {
            for (s, (name, values)) in series.iter().enumerate() {
                let offset = (s as f64 - (n_series - 1.0) / 2.0) * width;
                let bars: Vec<Bar> = values
                    .iter()
                    .enumerate()
                    .filter_map(|(g, v)| {
                        v.map(|v| {
                            Bar::new(g as f64 + offset, v)
                                .name(format!("{} {name}", groups[g]))
                                .width(width)
                        })
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(name).color(colors.color_for(name)));
            }
        });
}

/// Histogram from precomputed bins.
pub fn histogram(ui: &mut Ui, id: &str, value_label: &str, bins: &[HistogramBin]) {
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            let width = (b.end - b.start).max(1.0);
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(width)
                .name(format!("{:.0}–{:.0}", b.start, b.end))
        })
        .collect();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(value_label)
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
        });
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

/// Scatter plot, one legend entry per category tag.
pub fn scatter(ui: &mut Ui, id: &str, axes: (&str, &str), points: &[ScatterPoint], colors: Option<&ColorMap>) {
    let mut series: std::collections::BTreeMap<&str, Vec<[f64; 2]>> = Default::default();
    for p in points {
        series.entry(p.category_tag.as_str()).or_default().push([p.x, p.y]);
    }

    Plot::new(id)
        .height(PLOT_HEIGHT + 80.0)
        .legend(Legend::default())
        .x_axis_label(axes.0)
        .y_axis_label(axes.1)
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for (tag, coords) in series {
                let color = colors.map_or(Color32::LIGHT_BLUE, |c| c.color_for(tag));
                let name = if tag.is_empty() { "(none)" } else { tag };
                plot_ui.points(Points::new(coords).name(name).color(color).radius(3.0));
            }
        });
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

/// A box to draw; `spread` is `(lower whisker, q1, median, q3, upper whisker)`.
pub struct LabeledBox {
    pub label: String,
    pub spread: (f64, f64, f64, f64, f64),
    pub color: Color32,
}

pub fn box_plot(ui: &mut Ui, id: &str, value_label: &str, boxes: &[LabeledBox]) {
    let labels: Vec<String> = boxes.iter().map(|b| b.label.clone()).collect();
    let elems: Vec<BoxElem> = boxes
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let (lw, q1, med, q3, uw) = b.spread;
            BoxElem::new(i as f64, BoxSpread::new(lw, q1, med, q3, uw))
                .name(&b.label)
                .fill(b.color.gamma_multiply(0.4))
                .box_width(0.5)
        })
        .collect();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .y_axis_label(value_label)
        .x_axis_formatter(label_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(elems));
        });
}
