use std::collections::BTreeSet;

use super::model::{PolicyRecord, PortfolioDataset};

// ---------------------------------------------------------------------------
// Selection types
// ---------------------------------------------------------------------------

/// Years selected in a set-valued control. An empty set selects no rows.
pub type YearSet = BTreeSet<i32>;

/// Inception-month window for the loss-ratio chart.
///
/// The upper bound is EXCLUSIVE: `[1, 13)` covers the full year, `[1, 12)`
/// stops at November. `start == end` selects no months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: u32,
    pub end: u32,
}

impl MonthRange {
    pub fn new(start: u32, end: u32) -> Self {
        MonthRange { start, end }
    }

    /// Default window for a freshly loaded portfolio: eleven months up from
    /// the first observed month, clamped to the last observed month.
    ///
    /// TODO: confirm with product whether the default window should include
    /// the final observed month; the exclusive upper bound currently leaves
    /// it out for a portfolio spanning a full calendar year.
    pub fn default_for(month_span: (u32, u32)) -> Self {
        let (min, max) = month_span;
        MonthRange {
            start: min,
            end: (min + 11).min(max),
        }
    }

    /// Expand to the concrete month sequence `start, start+1, …, end-1`.
    pub fn expand(&self) -> Vec<u32> {
        (self.start..self.end).collect()
    }
}

// ---------------------------------------------------------------------------
// Row predicates
// ---------------------------------------------------------------------------

/// Rows whose inception year is in `years`.
pub fn rows_in_years<'a>(
    dataset: &'a PortfolioDataset,
    years: &'a YearSet,
) -> impl Iterator<Item = &'a PolicyRecord> {
    dataset
        .records
        .iter()
        .filter(move |r| years.contains(&r.inception_year))
}

/// Rows whose inception year is in `years` AND whose inception month is in
/// the expanded `months` sequence.
pub fn rows_in_window<'a>(
    dataset: &'a PortfolioDataset,
    years: &'a [i32],
    months: MonthRange,
) -> impl Iterator<Item = &'a PolicyRecord> + 'a {
    let month_seq = months.expand();
    dataset.records.iter().filter(move |r| {
        years.contains(&r.inception_year) && month_seq.contains(&r.inception_month)
    })
}
