use crate::color::YearColorMap;
use crate::data::aggregate::{
    aggregate_sum, claim_severity_histogram, format_amount, format_whole, loss_ratio_chart,
    sum_insured_histogram, BarChartSpec, HistogramSpec, SummaryField,
};
use crate::data::filter::{MonthRange, YearSet};
use crate::data::model::PortfolioDataset;

// ---------------------------------------------------------------------------
// Controls and selections
// ---------------------------------------------------------------------------

/// UI control identifiers. Each change notification names the control that
/// moved, and [`AppState::control_changed`] recomputes exactly the outputs
/// that read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    SummaryYears,
    LossRatioYears,
    LossRatioMonths,
    SeverityYears,
    SumInsuredYears,
}

/// Current state of every filter control. The controls are independent: no
/// selection influences another chart's filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Selections {
    pub summary_years: YearSet,
    /// Kept in toggle order; the bar order of the loss-ratio chart follows it.
    pub loss_ratio_years: Vec<i32>,
    pub loss_ratio_months: MonthRange,
    pub severity_years: YearSet,
    pub sum_insured_years: YearSet,
}

impl Selections {
    /// Control defaults for a freshly loaded portfolio: no summary years,
    /// every year for the loss-ratio chart, the latest year for both
    /// distribution charts.
    pub fn defaults(dataset: &PortfolioDataset) -> Self {
        let latest: YearSet = dataset.latest_year().into_iter().collect();
        Selections {
            summary_years: YearSet::new(),
            loss_ratio_years: dataset.unique_years.clone(),
            loss_ratio_months: MonthRange::default_for(dataset.month_span().unwrap_or((1, 12))),
            severity_years: latest.clone(),
            sum_insured_years: latest,
        }
    }
}

/// The three formatted summary tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryText {
    pub premium: String,
    pub claims: String,
    pub sum_insured: String,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state: the loaded portfolio, current selections, and the
/// cached outputs the panels render each frame. The dataset is never
/// mutated; changing a control only rewrites the affected cache entries.
pub struct AppState {
    pub dataset: PortfolioDataset,
    pub selections: Selections,

    pub summary: SummaryText,
    pub loss_ratio: BarChartSpec,
    pub severity: HistogramSpec,
    pub sum_insured: HistogramSpec,

    pub year_colors: YearColorMap,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Install default selections and compute every output once.
    pub fn new(dataset: PortfolioDataset) -> Self {
        let selections = Selections::defaults(&dataset);
        let summary = compute_summary(&dataset, &selections.summary_years);
        let loss_ratio = loss_ratio_chart(
            &dataset,
            &selections.loss_ratio_years,
            selections.loss_ratio_months,
        );
        let severity = claim_severity_histogram(&dataset, &selections.severity_years);
        let sum_insured = sum_insured_histogram(&dataset, &selections.sum_insured_years);
        let year_colors = YearColorMap::new(&dataset.unique_years);

        AppState {
            dataset,
            selections,
            summary,
            loss_ratio,
            severity,
            sum_insured,
            year_colors,
            status_message: None,
        }
    }

    /// Replace the portfolio (File → Open), resetting selections and outputs.
    pub fn set_dataset(&mut self, dataset: PortfolioDataset) {
        *self = AppState::new(dataset);
    }

    /// Recompute the outputs that depend on `control`.
    pub fn control_changed(&mut self, control: Control) {
        match control {
            Control::SummaryYears => {
                self.summary = compute_summary(&self.dataset, &self.selections.summary_years);
            }
            Control::LossRatioYears | Control::LossRatioMonths => {
                self.loss_ratio = loss_ratio_chart(
                    &self.dataset,
                    &self.selections.loss_ratio_years,
                    self.selections.loss_ratio_months,
                );
            }
            Control::SeverityYears => {
                self.severity =
                    claim_severity_histogram(&self.dataset, &self.selections.severity_years);
            }
            Control::SumInsuredYears => {
                self.sum_insured =
                    sum_insured_histogram(&self.dataset, &self.selections.sum_insured_years);
            }
        }
    }

    // ---- Typed mutators used by the panels --------------------------------

    pub fn toggle_summary_year(&mut self, year: i32) {
        toggle(&mut self.selections.summary_years, year);
        self.control_changed(Control::SummaryYears);
    }

    /// Toggle order is preserved: a re-added year moves to the end of the
    /// bar order.
    pub fn toggle_loss_ratio_year(&mut self, year: i32) {
        let selected = &mut self.selections.loss_ratio_years;
        match selected.iter().position(|&y| y == year) {
            Some(idx) => {
                selected.remove(idx);
            }
            None => selected.push(year),
        }
        self.control_changed(Control::LossRatioYears);
    }

    /// Clamp the window to the observed month span and keep `start ≤ end`.
    pub fn set_month_range(&mut self, start: u32, end: u32) {
        let (lo, hi) = self.dataset.month_span().unwrap_or((1, 12));
        let start = start.clamp(lo, hi);
        let end = end.clamp(start, hi);
        self.selections.loss_ratio_months = MonthRange::new(start, end);
        self.control_changed(Control::LossRatioMonths);
    }

    pub fn toggle_severity_year(&mut self, year: i32) {
        toggle(&mut self.selections.severity_years, year);
        self.control_changed(Control::SeverityYears);
    }

    pub fn toggle_sum_insured_year(&mut self, year: i32) {
        toggle(&mut self.selections.sum_insured_years, year);
        self.control_changed(Control::SumInsuredYears);
    }
}

fn toggle(set: &mut YearSet, year: i32) {
    if !set.remove(&year) {
        set.insert(year);
    }
}

fn compute_summary(dataset: &PortfolioDataset, years: &YearSet) -> SummaryText {
    SummaryText {
        premium: format_amount(aggregate_sum(dataset, years, SummaryField::WrittenPremium)),
        claims: format_amount(aggregate_sum(dataset, years, SummaryField::ClaimIncurred)),
        sum_insured: format_whole(aggregate_sum(dataset, years, SummaryField::SumInsured)),
    }
}
