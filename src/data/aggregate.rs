//! The aggregation functions behind the dashboard widgets.
//!
//! Each one is a pure function of `(dataset, selection)`: nothing is held
//! between invocations, so any selection change can re-run any of them
//! independently. Chart output is renderer-agnostic — the UI layer only
//! draws what these structs describe.

use super::filter::{rows_in_years, rows_in_window, MonthRange, YearSet};
use super::model::{PolicyRecord, PortfolioDataset};

/// Bin resolution shared by both distribution charts.
pub const DIST_BIN_COUNT: usize = 10_000;

// ---------------------------------------------------------------------------
// Aggregate summary
// ---------------------------------------------------------------------------

/// Numeric column selector for the summary tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryField {
    WrittenPremium,
    ClaimIncurred,
    SumInsured,
}

impl SummaryField {
    fn value(&self, record: &PolicyRecord) -> f64 {
        match self {
            SummaryField::WrittenPremium => record.written_premium,
            SummaryField::ClaimIncurred => record.claim_incurred,
            SummaryField::SumInsured => record.sum_insured,
        }
    }
}

/// Sum `field` over the records whose inception year is selected.
///
/// An empty selection (or one matching no rows) sums over zero rows and
/// yields 0.0 — never an error.
pub fn aggregate_sum(dataset: &PortfolioDataset, years: &YearSet, field: SummaryField) -> f64 {
    rows_in_years(dataset, years).map(|r| field.value(r)).sum()
}

// ---------------------------------------------------------------------------
// Display formatting
// ---------------------------------------------------------------------------

/// `1234567.891` → `"1,234,567.89"`.
pub fn format_amount(value: f64) -> String {
    group_thousands(&format!("{value:.2}"))
}

/// `1234567.9` → `"1,234,567"`. Truncated toward zero, not rounded; the sum
/// insured tile intentionally shows whole units while the premium and claims
/// tiles keep cents.
pub fn format_whole(value: f64) -> String {
    group_thousands(&format!("{}", value.trunc() as i64))
}

/// Insert `,` separators into the integer part of a plain decimal string.
fn group_thousands(plain: &str) -> String {
    let (sign, rest) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

// ---------------------------------------------------------------------------
// Loss ratio chart
// ---------------------------------------------------------------------------

/// A bar chart description: one bar per category, plus the fixed tick
/// positions that keep the x axis stable while selections change.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Bar positions, in selection order.
    pub categories: Vec<i32>,
    /// One value per category. NaN marks a bar the renderer must skip.
    pub values: Vec<f64>,
    /// Tick positions for the x axis, independent of the current selection.
    pub ticks: Vec<i32>,
}

/// Loss ratio (incurred claims over written premium) per selected year,
/// restricted to inception months inside `months`.
///
/// Years appear in the order they were selected. A year with no written
/// premium in the window has an undefined ratio and is emitted as NaN rather
/// than zero, so the chart shows a gap instead of a misleading zero bar.
pub fn loss_ratio_chart(
    dataset: &PortfolioDataset,
    years: &[i32],
    months: MonthRange,
) -> BarChartSpec {
    let mut values = Vec::with_capacity(years.len());

    for &year in years {
        let mut premium = 0.0;
        let mut claims = 0.0;
        for record in rows_in_window(dataset, std::slice::from_ref(&year), months) {
            premium += record.written_premium;
            claims += record.claim_incurred;
        }
        let ratio = if premium == 0.0 {
            f64::NAN
        } else {
            claims / premium
        };
        values.push(ratio);
    }

    BarChartSpec {
        title: "Loss Ratio Graph".to_string(),
        x_label: "Year".to_string(),
        y_label: "Loss Ratio".to_string(),
        categories: years.to_vec(),
        values,
        ticks: dataset.unique_years.clone(),
    }
}

// ---------------------------------------------------------------------------
// Distribution charts
// ---------------------------------------------------------------------------

/// A histogram description: raw observations plus the binning resolution.
/// Binning and the marginal summary are computed on demand for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub values: Vec<f64>,
    /// Number of uniform-width bins across the observed range.
    pub bin_count: usize,
    /// Whether the renderer should draw a marginal distribution strip.
    pub marginal: bool,
}

/// Uniform binning of a histogram's values.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedHistogram {
    /// Left edge of the first bin.
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<u32>,
}

/// Five-number summary backing the marginal box strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl HistogramSpec {
    /// Bin the values into `bin_count` uniform bins over `[min, max]`.
    /// Values at the top edge land in the last bin, so every value is
    /// counted exactly once. `None` when there is nothing to bin.
    pub fn binned(&self) -> Option<BinnedHistogram> {
        if self.values.is_empty() || self.bin_count == 0 {
            return None;
        }

        let min = self.values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self
            .values
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);

        // A single distinct value still gets a visible bar: widen the range
        // around it so the spike lands mid-histogram.
        let (lo, hi) = if max > min {
            (min, max)
        } else {
            (min - 0.5, max + 0.5)
        };

        let bin_width = (hi - lo) / self.bin_count as f64;
        let mut counts = vec![0u32; self.bin_count];
        for &v in &self.values {
            let idx = (((v - lo) / bin_width) as usize).min(self.bin_count - 1);
            counts[idx] += 1;
        }

        Some(BinnedHistogram {
            start: lo,
            bin_width,
            counts,
        })
    }

    /// Quartile summary for the marginal strip, with linear-interpolated
    /// percentiles. `None` when there are no values.
    pub fn marginal_summary(&self) -> Option<FiveNumberSummary> {
        if self.values.is_empty() {
            return None;
        }
        let mut sorted = self.values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Some(FiveNumberSummary {
            min: sorted[0],
            q1: percentile(&sorted, 0.25),
            median: percentile(&sorted, 0.50),
            q3: percentile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    let h = p * (sorted.len() - 1) as f64;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = h - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}

/// Severity distribution of incurred claims for the selected years.
///
/// Rows with zero or negative incurred amounts (no-loss policies and
/// recoveries) are excluded: they carry no severity information.
pub fn claim_severity_histogram(dataset: &PortfolioDataset, years: &YearSet) -> HistogramSpec {
    let values = rows_in_years(dataset, years)
        .filter(|r| r.claim_incurred > 0.0)
        .map(|r| r.claim_incurred)
        .collect();

    HistogramSpec {
        title: "Incurred Claims Distribution".to_string(),
        x_label: "Claim Amount".to_string(),
        y_label: "Count".to_string(),
        values,
        bin_count: DIST_BIN_COUNT,
        marginal: true,
    }
}

/// Sum-insured distribution for the selected years. No sign filter: every
/// row in the selected years counts.
pub fn sum_insured_histogram(dataset: &PortfolioDataset, years: &YearSet) -> HistogramSpec {
    let values = rows_in_years(dataset, years)
        .map(|r| r.sum_insured)
        .collect();

    HistogramSpec {
        title: "Sum Insured Distribution".to_string(),
        x_label: "Sum Insured".to_string(),
        y_label: "Count".to_string(),
        values,
        bin_count: DIST_BIN_COUNT,
        marginal: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(date: &str, premium: f64, claim: f64, sum_insured: f64) -> PolicyRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        PolicyRecord::new(date, premium, claim, sum_insured)
    }

    /// Years {2019, 2020}: 2019 has premium 1000 / claims 200, 2020 has
    /// premium 0 / claims 50.
    fn two_year_portfolio() -> PortfolioDataset {
        PortfolioDataset::from_records(vec![
            record("2019-01-10", 600.0, 200.0, 250_000.0),
            record("2019-05-20", 400.0, 0.0, 310_000.0),
            record("2020-02-14", 0.0, 50.0, 280_000.0),
        ])
    }

    fn years(list: &[i32]) -> YearSet {
        list.iter().copied().collect()
    }

    // ── aggregate_sum ─────────────────────────────────────────────────────

    #[test]
    fn sums_exactly_the_selected_years() {
        let ds = two_year_portfolio();
        let total = aggregate_sum(&ds, &years(&[2019, 2020]), SummaryField::WrittenPremium);
        assert!((total - 1000.0).abs() < 1e-10);

        let total_2019 = aggregate_sum(&ds, &years(&[2019]), SummaryField::ClaimIncurred);
        assert!((total_2019 - 200.0).abs() < 1e-10);
    }

    #[test]
    fn empty_selection_sums_to_zero() {
        let ds = two_year_portfolio();
        let total = aggregate_sum(&ds, &YearSet::new(), SummaryField::WrittenPremium);
        assert_eq!(total, 0.0);
    }

    #[test]
    fn selection_order_does_not_change_the_sum() {
        let ds = two_year_portfolio();
        let forward: YearSet = [2019, 2020].into_iter().collect();
        let backward: YearSet = [2020, 2019].into_iter().collect();
        assert_eq!(
            aggregate_sum(&ds, &forward, SummaryField::SumInsured),
            aggregate_sum(&ds, &backward, SummaryField::SumInsured),
        );
    }

    #[test]
    fn absent_year_is_excluded_not_an_error() {
        let ds = two_year_portfolio();
        let total = aggregate_sum(&ds, &years(&[2019, 1999]), SummaryField::WrittenPremium);
        assert!((total - 1000.0).abs() < 1e-10);
    }

    #[test]
    fn negative_claims_reduce_the_total() {
        let ds = PortfolioDataset::from_records(vec![
            record("2021-01-01", 100.0, 500.0, 1_000.0),
            record("2021-06-01", 100.0, -120.0, 1_000.0),
        ]);
        let total = aggregate_sum(&ds, &years(&[2021]), SummaryField::ClaimIncurred);
        assert!((total - 380.0).abs() < 1e-10);
    }

    // ── formatting ────────────────────────────────────────────────────────

    #[test]
    fn amount_formatting_groups_and_keeps_cents() {
        assert_eq!(format_amount(1_234_567.891), "1,234,567.89");
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.5), "999.50");
        assert_eq!(format_amount(-12_345.6), "-12,345.60");
    }

    #[test]
    fn whole_formatting_truncates_before_grouping() {
        assert_eq!(format_whole(1_234_567.9), "1,234,567");
        assert_eq!(format_whole(0.0), "0");
        assert_eq!(format_whole(-2_500.7), "-2,500");
    }

    // ── loss ratio ────────────────────────────────────────────────────────

    #[test]
    fn loss_ratio_per_year_in_selection_order() {
        let ds = two_year_portfolio();
        let spec = loss_ratio_chart(&ds, &[2020, 2019], MonthRange::new(1, 13));

        assert_eq!(spec.categories, vec![2020, 2019]);
        assert!(spec.values[0].is_nan(), "zero-premium year must be NaN");
        assert!((spec.values[1] - 0.2).abs() < 1e-10);
        // Ticks cover the whole portfolio regardless of selection.
        assert_eq!(spec.ticks, vec![2019, 2020]);
    }

    #[test]
    fn zero_premium_year_is_nan_not_zero() {
        let ds = two_year_portfolio();
        let spec = loss_ratio_chart(&ds, &[2020], MonthRange::new(1, 13));
        assert!(spec.values[0].is_nan());
    }

    #[test]
    fn month_window_excludes_out_of_range_rows() {
        let ds = PortfolioDataset::from_records(vec![
            record("2020-01-01", 100.0, 10.0, 1_000.0),
            record("2020-12-01", 100.0, 90.0, 1_000.0),
        ]);
        // December is outside [1, 12): only January contributes.
        let spec = loss_ratio_chart(&ds, &[2020], MonthRange::new(1, 12));
        assert!((spec.values[0] - 0.1).abs() < 1e-10);

        // [1, 13) admits both rows.
        let spec = loss_ratio_chart(&ds, &[2020], MonthRange::new(1, 13));
        assert!((spec.values[0] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn empty_year_list_yields_empty_chart() {
        let ds = two_year_portfolio();
        let spec = loss_ratio_chart(&ds, &[], MonthRange::new(1, 13));
        assert!(spec.categories.is_empty());
        assert!(spec.values.is_empty());
        assert_eq!(spec.ticks, vec![2019, 2020]);
    }

    // ── severity distribution ─────────────────────────────────────────────

    #[test]
    fn severity_excludes_zero_and_negative_claims() {
        let ds = PortfolioDataset::from_records(vec![
            record("2020-01-01", 100.0, 1_500.0, 1_000.0),
            record("2020-02-01", 100.0, 0.0, 1_000.0),
            record("2020-03-01", 100.0, -300.0, 1_000.0),
            record("2020-04-01", 100.0, 80.0, 1_000.0),
        ]);
        let spec = claim_severity_histogram(&ds, &years(&[2020]));
        assert_eq!(spec.values.len(), 2);
        assert!(spec.values.iter().all(|&v| v > 0.0));

        // Bin totals equal the number of positive-claim rows.
        let binned = spec.binned().unwrap();
        let total: u32 = binned.counts.iter().sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn severity_with_no_claims_is_empty_not_an_error() {
        let ds = PortfolioDataset::from_records(vec![record("2020-01-01", 100.0, 0.0, 1_000.0)]);
        let spec = claim_severity_histogram(&ds, &years(&[2020]));
        assert!(spec.values.is_empty());
        assert!(spec.binned().is_none());
        assert!(spec.marginal_summary().is_none());
    }

    // ── sum-insured distribution ──────────────────────────────────────────

    #[test]
    fn sum_insured_counts_every_selected_row() {
        let ds = PortfolioDataset::from_records(vec![
            record("2020-01-01", 100.0, 0.0, 250_000.0),
            record("2020-02-01", 100.0, 0.0, -5_000.0),
            record("2021-03-01", 100.0, 0.0, 400_000.0),
        ]);
        let spec = sum_insured_histogram(&ds, &years(&[2020]));
        assert_eq!(spec.values.len(), 2);

        let binned = spec.binned().unwrap();
        let total: u32 = binned.counts.iter().sum();
        assert_eq!(total, 2);
        assert_eq!(spec.bin_count, DIST_BIN_COUNT);
    }

    // ── binning ───────────────────────────────────────────────────────────

    #[test]
    fn binning_counts_every_value_once() {
        let spec = HistogramSpec {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            values: vec![1.0, 2.0, 3.0, 4.0, 10.0],
            bin_count: 4,
            marginal: false,
        };
        let binned = spec.binned().unwrap();
        assert_eq!(binned.counts.len(), 4);
        assert_eq!(binned.counts.iter().sum::<u32>(), 5);
        // Top-edge value lands in the last bin.
        assert!(binned.counts[3] >= 1);
    }

    #[test]
    fn binning_single_distinct_value_still_renders() {
        let spec = HistogramSpec {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            values: vec![7.0, 7.0, 7.0],
            bin_count: 10,
            marginal: false,
        };
        let binned = spec.binned().unwrap();
        assert_eq!(binned.counts.iter().sum::<u32>(), 3);
        assert!(binned.bin_width > 0.0);
    }

    // ── marginal summary ──────────────────────────────────────────────────

    #[test]
    fn marginal_summary_known_quartiles() {
        let spec = HistogramSpec {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            values: vec![5.0, 1.0, 3.0, 2.0, 4.0],
            bin_count: 10,
            marginal: true,
        };
        let s = spec.marginal_summary().unwrap();
        assert!((s.min - 1.0).abs() < 1e-10);
        assert!((s.q1 - 2.0).abs() < 1e-10);
        assert!((s.median - 3.0).abs() < 1e-10);
        assert!((s.q3 - 4.0).abs() < 1e-10);
        assert!((s.max - 5.0).abs() < 1e-10);
    }
}
