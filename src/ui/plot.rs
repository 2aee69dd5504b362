use eframe::egui::{self, Color32, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Plot};

use crate::color::YearColorMap;
use crate::data::aggregate::{BarChartSpec, HistogramSpec};
use crate::state::{AppState, SummaryText};

// ---------------------------------------------------------------------------
// Central panel – summary tiles and charts
// ---------------------------------------------------------------------------

/// Render the dashboard column: tiles on top, then the three charts.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            summary_row(ui, &state.summary);
            ui.add_space(10.0);

            loss_ratio_chart(ui, &state.loss_ratio, &state.year_colors);
            ui.add_space(10.0);

            histogram(ui, "severity_plot", &state.severity);
            ui.add_space(10.0);

            histogram(ui, "sum_insured_plot", &state.sum_insured);
        });
}

// ---------------------------------------------------------------------------
// Summary tiles
// ---------------------------------------------------------------------------

fn summary_row(ui: &mut Ui, summary: &SummaryText) {
    ui.horizontal(|ui: &mut Ui| {
        summary_tile(ui, &summary.premium, "Aggregate Premium");
        summary_tile(ui, &summary.claims, "Aggregate Claims");
        summary_tile(ui, &summary.sum_insured, "Aggregate Sum Insured");
    });
}

fn summary_tile(ui: &mut Ui, value: &str, caption: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(190.0);
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading(value);
            ui.label(caption);
        });
    });
}

// ---------------------------------------------------------------------------
// Loss ratio bar chart
// ---------------------------------------------------------------------------

/// Bars in selection order, one colour per year. Non-finite ratios (years
/// with no written premium in the window) are skipped, leaving a gap. The
/// x axis ticks are pinned to the full year list and never follow the
/// selection.
fn loss_ratio_chart(ui: &mut Ui, spec: &BarChartSpec, colors: &YearColorMap) {
    ui.heading(&spec.title);

    let bars: Vec<Bar> = spec
        .categories
        .iter()
        .zip(spec.values.iter())
        .filter(|(_, value)| value.is_finite())
        .map(|(&year, &value)| {
            Bar::new(year as f64, value)
                .width(0.7)
                .fill(colors.color_for(year))
                .name(year.to_string())
        })
        .collect();

    let ticks: Vec<f64> = spec.ticks.iter().map(|&y| y as f64).collect();
    let (first_tick, last_tick) = (ticks.first().copied(), ticks.last().copied());

    let mut plot = Plot::new("loss_ratio_plot")
        .height(280.0)
        .x_axis_label(spec.x_label.clone())
        .y_axis_label(spec.y_label.clone())
        .x_grid_spacer(move |_input| {
            ticks
                .iter()
                .map(|&value| GridMark {
                    value,
                    step_size: 1.0,
                })
                .collect()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    // Keep the axis span stable across selections.
    if let (Some(first), Some(last)) = (first_tick, last_tick) {
        plot = plot.include_x(first - 0.6).include_x(last + 0.6);
    }

    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars));
    });
}

// ---------------------------------------------------------------------------
// Distribution histograms
// ---------------------------------------------------------------------------

/// Histogram bars plus, when the marginal flag is set, a horizontal box-plot
/// strip floating above them as the marginal distribution.
fn histogram(ui: &mut Ui, id: &str, spec: &HistogramSpec) {
    ui.heading(&spec.title);

    let Some(binned) = spec.binned() else {
        ui.label("No matching records for the selected years.");
        return;
    };

    let max_count = binned.counts.iter().copied().max().unwrap_or(0) as f64;

    // Empty bins are dropped from the draw list: at 10 000 bins most are
    // zero-height and would only cost paint time.
    let bars: Vec<Bar> = binned
        .counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(i, &count)| {
            let center = binned.start + (i as f64 + 0.5) * binned.bin_width;
            Bar::new(center, count as f64).width(binned.bin_width)
        })
        .collect();

    Plot::new(id.to_owned())
        .height(260.0)
        .x_axis_label(spec.x_label.clone())
        .y_axis_label(spec.y_label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));

            if spec.marginal {
                if let Some(s) = spec.marginal_summary() {
                    let strip_y = max_count * 1.08;
                    let strip = BoxElem::new(
                        strip_y,
                        BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max),
                    )
                    .box_width(max_count * 0.05);
                    plot_ui.box_plot(
                        BoxPlot::new(vec![strip])
                            .horizontal()
                            .color(Color32::LIGHT_GREEN),
                    );
                }
            }
        });
}
