use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::color::YearColorMap;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter controls
// ---------------------------------------------------------------------------

/// Render the left filter panel: one control group per chart.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Clone what the widgets iterate over so the loop can call mutators.
    let years = state.dataset.unique_years.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Aggregate summary year(s)");
            if let Some(year) = year_checklist(ui, "summary", &years, state, |s, y| {
                s.selections.summary_years.contains(&y)
            }) {
                state.toggle_summary_year(year);
            }
            ui.separator();

            ui.strong("Loss ratio year(s)");
            if let Some(year) = year_checklist(ui, "loss_ratio", &years, state, |s, y| {
                s.selections.loss_ratio_years.contains(&y)
            }) {
                state.toggle_loss_ratio_year(year);
            }
            ui.add_space(4.0);
            month_range_sliders(ui, state);
            ui.separator();

            ui.strong("Claims severity year(s)");
            if let Some(year) = year_checklist(ui, "severity", &years, state, |s, y| {
                s.selections.severity_years.contains(&y)
            }) {
                state.toggle_severity_year(year);
            }
            ui.separator();

            ui.strong("Sum insured year(s)");
            if let Some(year) = year_checklist(ui, "sum_insured", &years, state, |s, y| {
                s.selections.sum_insured_years.contains(&y)
            }) {
                state.toggle_sum_insured_year(year);
            }
        });
}

/// One checkbox per portfolio year, coloured like the charts. Returns the
/// year the user toggled this frame, if any.
fn year_checklist(
    ui: &mut Ui,
    id: &str,
    years: &[i32],
    state: &AppState,
    selected: impl Fn(&AppState, i32) -> bool,
) -> Option<i32> {
    let mut toggled = None;
    ui.push_id(id, |ui: &mut Ui| {
        for &year in years {
            let mut checked = selected(state, year);
            let label = year_label(year, &state.year_colors);
            if ui.checkbox(&mut checked, label).changed() {
                toggled = Some(year);
            }
        }
    });
    toggled
}

fn year_label(year: i32, colors: &YearColorMap) -> RichText {
    RichText::new(year.to_string()).color(colors.color_for(year))
}

/// Two sliders spanning the observed month range. The "to" bound is
/// exclusive, matching the chart's month window.
fn month_range_sliders(ui: &mut Ui, state: &mut AppState) {
    let (lo, hi) = match state.dataset.month_span() {
        Some(span) => span,
        None => return,
    };

    let mut start = state.selections.loss_ratio_months.start;
    let mut end = state.selections.loss_ratio_months.end;

    ui.label("Loss ratio month range");
    let mut changed = false;
    changed |= ui
        .add(
            Slider::new(&mut start, lo..=hi)
                .text("from")
                .custom_formatter(|v, _| month_name(v as u32).to_string()),
        )
        .changed();
    changed |= ui
        .add(
            Slider::new(&mut end, lo..=hi)
                .text("to (excl.)")
                .custom_formatter(|v, _| month_name(v as u32).to_string()),
        )
        .changed();

    if changed {
        state.set_month_range(start, end);
    }
}

/// Short month label for the sliders (1 → "Jan").
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "?",
    }
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
        });

        ui.separator();

        ui.label(format!("{} policies", state.dataset.len()));
        if let Some((first, last)) = state.dataset.date_span() {
            ui.label(format!(
                "{} – {}",
                first.format("%b %Y"),
                last.format("%b %Y")
            ));
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Open a different portfolio file. On failure the previous dataset and
/// every cached output stay untouched; the error only reaches the status
/// line and the log.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open portfolio data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_portfolio(&path) {
            Ok(dataset) => {
                log::info!(
                    "loaded {} policies across years {:?}",
                    dataset.len(),
                    dataset.unique_years
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("failed to load portfolio: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
