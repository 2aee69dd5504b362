use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use super::model::{PolicyRecord, PortfolioDataset};

/// The only accepted date layout in portfolio files.
const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// A portfolio file could not be loaded.
///
/// Loading is all-or-nothing: the first bad row aborts the load, so the
/// dashboard never runs on a partially parsed portfolio.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to open '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("row {row}: invalid inception_date '{value}' (expected YYYY-MM-DD)")]
    Date { row: usize, value: String },
}

// ---------------------------------------------------------------------------
// Raw row
// ---------------------------------------------------------------------------

/// A row exactly as it appears in the file; dates still text.
#[derive(Debug, Deserialize)]
struct RawRow {
    inception_date: String,
    written_premium: f64,
    claim_incurred: f64,
    sum_insured: f64,
}

impl RawRow {
    fn into_record(self, row: usize) -> Result<PolicyRecord, DataLoadError> {
        let date = NaiveDate::parse_from_str(&self.inception_date, DATE_FORMAT).map_err(|_| {
            DataLoadError::Date {
                row,
                value: self.inception_date.clone(),
            }
        })?;
        Ok(PolicyRecord::new(
            date,
            self.written_premium,
            self.claim_incurred,
            self.sum_insured,
        ))
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a portfolio from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row `inception_date,written_premium,claim_incurred,sum_insured`
/// * `.json` – records-oriented array of objects with the same four fields
pub fn load_portfolio(path: &Path) -> Result<PortfolioDataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv_from_reader(open(path)?),
        "json" => load_json_from_reader(BufReader::new(open(path)?)),
        other => Err(DataLoadError::UnsupportedExtension(other.to_string())),
    }
}

fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV variant over any reader (tests, in-memory buffers).
pub fn load_csv_from_reader<R: Read>(reader: R) -> Result<PortfolioDataset, DataLoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (idx, result) in csv_reader.deserialize::<RawRow>().enumerate() {
        // +2: one for the header line, one for 1-based numbering.
        let row = idx + 2;
        records.push(result?.into_record(row)?);
    }

    Ok(PortfolioDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "inception_date": "2020-03-14",
///     "written_premium": 812.50,
///     "claim_incurred": 0.0,
///     "sum_insured": 340000.0
///   },
///   ...
/// ]
/// ```
pub fn load_json_from_reader<R: Read>(reader: R) -> Result<PortfolioDataset, DataLoadError> {
    let raw_rows: Vec<RawRow> = serde_json::from_reader(reader)?;

    let mut records = Vec::with_capacity(raw_rows.len());
    for (idx, raw) in raw_rows.into_iter().enumerate() {
        records.push(raw.into_record(idx + 1)?);
    }

    Ok(PortfolioDataset::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_CSV: &str = "\
inception_date,written_premium,claim_incurred,sum_insured
2019-01-15,800.00,0.00,320000.00
2019-07-02,650.50,1200.00,275000.00
2020-03-30,910.25,-150.00,410000.00
";

    #[test]
    fn loads_well_formed_csv() {
        let ds = load_csv_from_reader(GOOD_CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.unique_years, vec![2019, 2020]);

        let first = &ds.records[0];
        assert_eq!(first.inception_year, 2019);
        assert_eq!(first.inception_month, 1);
        assert!((first.written_premium - 800.0).abs() < 1e-10);

        // Negative claims (recoveries) load as-is.
        assert!((ds.records[2].claim_incurred + 150.0).abs() < 1e-10);
    }

    #[test]
    fn bad_date_fails_with_row_number() {
        let csv = "\
inception_date,written_premium,claim_incurred,sum_insured
2019-01-15,800.00,0.00,320000.00
15/07/2019,650.50,1200.00,275000.00
";
        let err = load_csv_from_reader(csv.as_bytes()).unwrap_err();
        match err {
            DataLoadError::Date { row, value } => {
                assert_eq!(row, 3);
                assert_eq!(value, "15/07/2019");
            }
            other => panic!("expected Date error, got: {other}"),
        }
    }

    #[test]
    fn malformed_numeric_fails() {
        let csv = "\
inception_date,written_premium,claim_incurred,sum_insured
2019-01-15,not-a-number,0.00,320000.00
";
        assert!(matches!(
            load_csv_from_reader(csv.as_bytes()),
            Err(DataLoadError::Csv(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_portfolio(Path::new("data/does_not_exist.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
    }

    #[test]
    fn unknown_extension_rejected() {
        let err = load_portfolio(Path::new("portfolio.parquet")).unwrap_err();
        match err {
            DataLoadError::UnsupportedExtension(ext) => assert_eq!(ext, "parquet"),
            other => panic!("expected UnsupportedExtension, got: {other}"),
        }
    }

    #[test]
    fn loads_records_oriented_json() {
        let json = r#"[
            {"inception_date": "2021-05-01", "written_premium": 700.0,
             "claim_incurred": 0.0, "sum_insured": 300000.0},
            {"inception_date": "2021-11-20", "written_premium": 820.0,
             "claim_incurred": 450.0, "sum_insured": 365000.0}
        ]"#;
        let ds = load_json_from_reader(json.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.unique_years, vec![2021]);
        assert_eq!(ds.unique_months, vec![5, 11]);
    }
}
