use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// PolicyRecord – one row of the portfolio file
// ---------------------------------------------------------------------------

/// A single home-insurance policy (one row of the source file).
///
/// The calendar fields are derived from `inception_date` at construction so
/// no downstream code ever re-parses dates or can observe an inconsistent
/// year/month pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRecord {
    pub inception_date: NaiveDate,
    /// Calendar year of `inception_date`.
    pub inception_year: i32,
    /// Calendar month of `inception_date` (1–12).
    pub inception_month: u32,
    pub written_premium: f64,
    /// Incurred claim amount. Zero for no-loss policies; negative values are
    /// recoveries.
    pub claim_incurred: f64,
    pub sum_insured: f64,
}

impl PolicyRecord {
    pub fn new(
        inception_date: NaiveDate,
        written_premium: f64,
        claim_incurred: f64,
        sum_insured: f64,
    ) -> Self {
        PolicyRecord {
            inception_date,
            inception_year: inception_date.year(),
            inception_month: inception_date.month(),
            written_premium,
            claim_incurred,
            sum_insured,
        }
    }
}

// ---------------------------------------------------------------------------
// PortfolioDataset – the complete loaded portfolio
// ---------------------------------------------------------------------------

/// The full parsed portfolio with pre-computed calendar metadata.
///
/// Built once at load time and read-only afterwards; every aggregation takes
/// it by shared reference.
#[derive(Debug, Clone)]
pub struct PortfolioDataset {
    /// All policies (rows), in file order.
    pub records: Vec<PolicyRecord>,
    /// Ascending distinct inception years. Drives the year controls and the
    /// loss-ratio axis tick positions.
    pub unique_years: Vec<i32>,
    /// Ascending distinct inception months (1–12) observed in the portfolio.
    pub unique_months: Vec<u32>,
}

impl PortfolioDataset {
    /// Build calendar indices from the loaded records.
    pub fn from_records(records: Vec<PolicyRecord>) -> Self {
        let mut years: BTreeSet<i32> = BTreeSet::new();
        let mut months: BTreeSet<u32> = BTreeSet::new();

        for record in &records {
            years.insert(record.inception_year);
            months.insert(record.inception_month);
        }

        PortfolioDataset {
            records,
            unique_years: years.into_iter().collect(),
            unique_months: months.into_iter().collect(),
        }
    }

    /// Most recent inception year, if any records were loaded.
    pub fn latest_year(&self) -> Option<i32> {
        self.unique_years.last().copied()
    }

    /// Earliest and latest observed inception month.
    pub fn month_span(&self) -> Option<(u32, u32)> {
        match (self.unique_months.first(), self.unique_months.last()) {
            (Some(&min), Some(&max)) => Some((min, max)),
            _ => None,
        }
    }

    /// Earliest and latest inception dates across the portfolio.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.inception_date).min()?;
        let last = self.records.iter().map(|r| r.inception_date).max()?;
        Some((first, last))
    }

    /// Number of policies.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the portfolio is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
