//! Automatic table cleaning
//!
//! A deterministic, fixed-order pipeline: prune → date/time/money transforms
//! → text normalization → re-prune → impute → drop zero-information columns.
//! Data content never fails the pipeline; malformed values become missing and
//! flow into imputation. Only structural problems (an empty input table) are
//! errors, raised before any stage runs.

pub mod impute;
pub mod patterns;
pub mod transforms;

pub use impute::{Imputer, ImputeStrategy};
pub use transforms::SplitColumn;

use polars::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

use crate::error::{Result, WorkbenchError};
use crate::schema::{self, is_string_dtype};
use crate::value::CellValue;

/// Thresholds and switches for one cleaning run.
///
/// The detector thresholds default to the named constants in
/// [`patterns`]; they are configurable so tests can probe the exact
/// boundary behavior.
#[derive(Debug, Clone, Serialize)]
pub struct CleanerConfig {
    /// Drop exact duplicate rows in the first pruning pass.
    /// Duplicates are never re-checked after the transforms.
    pub drop_duplicates: bool,
    pub money_threshold: f64,
    pub date_threshold: f64,
    pub time_threshold: f64,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            drop_duplicates: true,
            money_threshold: patterns::MONEY_THRESHOLD,
            date_threshold: patterns::DATE_THRESHOLD,
            time_threshold: patterns::TIME_THRESHOLD,
        }
    }
}

impl CleanerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_drop_duplicates(mut self, drop: bool) -> Self {
        self.drop_duplicates = drop;
        self
    }

    pub fn with_money_threshold(mut self, threshold: f64) -> Self {
        self.money_threshold = threshold;
        self
    }

    pub fn with_date_threshold(mut self, threshold: f64) -> Self {
        self.date_threshold = threshold;
        self
    }

    pub fn with_time_threshold(mut self, threshold: f64) -> Self {
        self.time_threshold = threshold;
        self
    }
}

/// Why a column was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DropReason {
    /// Every value was missing
    AllMissing,
    /// Exactly one distinct value: zero information
    Constant,
}

#[derive(Debug, Clone, Serialize)]
pub struct DroppedColumn {
    pub name: String,
    pub reason: DropReason,
}

/// What one cleaning run did to the table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningReport {
    pub duplicate_rows_dropped: usize,
    pub empty_rows_dropped: usize,
    pub dropped_columns: Vec<DroppedColumn>,
    pub date_columns_split: Vec<SplitColumn>,
    pub time_columns_split: Vec<SplitColumn>,
    pub money_columns_coerced: Vec<String>,
}

/// The automatic cleaning pipeline.
#[derive(Debug, Clone, Default)]
pub struct TableCleaner {
    config: CleanerConfig,
}

impl TableCleaner {
    pub fn new() -> Self {
        Self::with_config(CleanerConfig::default())
    }

    pub fn with_config(config: CleanerConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline, returning the cleaned table and a report of
    /// every column dropped, split, or coerced.
    pub fn clean(&self, df: &DataFrame) -> Result<(DataFrame, CleaningReport)> {
        if df.width() == 0 {
            return Err(WorkbenchError::EmptyInput("table has no columns".to_string()));
        }
        if df.height() == 0 {
            return Err(WorkbenchError::EmptyInput("table has no rows".to_string()));
        }

        let mut report = CleaningReport::default();
        let mut table = df.clone();

        // First pruning pass, the only one that removes duplicate rows
        table = self.prune(table, &mut report, self.config.drop_duplicates)?;

        // Date decomposition runs before time and money so a date-like value
        // is never reinterpreted by a later detector
        for name in patterns::date_columns(&table, self.config.date_threshold) {
            let (next, split) = transforms::decompose_date(&table, &name)?;
            table = next;
            report.date_columns_split.push(split);
        }

        for name in patterns::time_columns(&table, self.config.time_threshold) {
            let (next, split) = transforms::decompose_time(&table, &name)?;
            table = next;
            report.time_columns_split.push(split);
        }

        for name in patterns::money_columns(&table, self.config.money_threshold) {
            let series = table.column(&name)?.as_materialized_series().clone();
            let coerced = transforms::normalize_money(&series)?;
            table.with_column(coerced)?;
            report.money_columns_coerced.push(name);
        }

        // Text normalization runs last among the transforms, after the
        // date/time/money formats it would corrupt are gone
        table = transforms::clean_text_columns(&table)?;

        // Catch columns/rows that became entirely missing through failed
        // parsing above; duplicates are deliberately not re-checked
        table = self.prune(table, &mut report, false)?;

        table = impute_table(&table)?;

        table = drop_low_information_columns(table, &mut report)?;

        Ok((table, report))
    }

    fn prune(
        &self,
        mut table: DataFrame,
        report: &mut CleaningReport,
        dedupe: bool,
    ) -> Result<DataFrame> {
        if dedupe && table.height() > 0 {
            let keep = first_occurrence_mask(&table)?;
            let kept = table.filter(&keep)?;
            report.duplicate_rows_dropped += table.height() - kept.height();
            table = kept;
        }

        // Columns that are entirely missing
        if table.height() > 0 {
            let all_missing: Vec<String> = table
                .get_columns()
                .iter()
                .filter(|c| c.null_count() == table.height())
                .map(|c| c.name().to_string())
                .collect();
            for name in all_missing {
                table = table.drop(&name)?;
                report.dropped_columns.push(DroppedColumn {
                    name,
                    reason: DropReason::AllMissing,
                });
            }
        }

        // Rows that are entirely missing
        if table.width() > 0 && table.height() > 0 {
            let mut all_null: Option<BooleanChunked> = None;
            for col in table.get_columns() {
                let m = col.as_materialized_series().is_null();
                all_null = Some(match all_null {
                    Some(acc) => &acc & &m,
                    None => m,
                });
            }
            if let Some(mask) = all_null {
                let keep = !&mask;
                let kept = table.filter(&keep)?;
                report.empty_rows_dropped += table.height() - kept.height();
                table = kept;
            }
        }

        // Columns with exactly one distinct value
        let constant: Vec<String> = table
            .get_columns()
            .iter()
            .filter(|c| {
                schema::distinct_count(c.as_materialized_series())
                    .map(|n| n == 1)
                    .unwrap_or(false)
            })
            .map(|c| c.name().to_string())
            .collect();
        for name in constant {
            table = table.drop(&name)?;
            report.dropped_columns.push(DroppedColumn {
                name,
                reason: DropReason::Constant,
            });
        }

        Ok(table)
    }
}

/// Boolean keep-mask marking the first occurrence of each distinct row.
fn first_occurrence_mask(df: &DataFrame) -> Result<BooleanChunked> {
    let series: Vec<&Series> = df
        .get_columns()
        .iter()
        .map(|c| c.as_materialized_series())
        .collect();

    let mut seen = HashSet::with_capacity(df.height());
    let mut keep = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let mut fingerprint = String::new();
        for s in &series {
            let av = s.get(i)?;
            let cell = CellValue::from_any(&av);
            if cell.is_missing() {
                fingerprint.push('\u{1e}');
            } else {
                fingerprint.push_str(&cell.to_string());
            }
            fingerprint.push('\u{1f}');
        }
        keep.push(seen.insert(fingerprint));
    }
    Ok(BooleanChunked::from_slice("keep".into(), &keep))
}

/// Count of rows that are exact duplicates of an earlier row.
pub(crate) fn duplicate_row_count(df: &DataFrame) -> Result<usize> {
    if df.height() == 0 {
        return Ok(0);
    }
    let keep = first_occurrence_mask(df)?;
    Ok(keep.into_iter().filter(|k| *k == Some(false)).count())
}

/// Mean-impute numeric columns, mode-impute everything else.
fn impute_table(df: &DataFrame) -> Result<DataFrame> {
    let numeric: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype().is_primitive_numeric())
        .map(|c| c.name().to_string())
        .collect();
    let text: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| is_string_dtype(c.dtype()))
        .map(|c| c.name().to_string())
        .collect();

    let mut result = df.clone();
    if !numeric.is_empty() && result.height() > 0 {
        let cols: Vec<&str> = numeric.iter().map(|s| s.as_str()).collect();
        result = Imputer::new(ImputeStrategy::Mean).fit_transform(&result, &cols)?;
    }
    if !text.is_empty() && result.height() > 0 {
        let cols: Vec<&str> = text.iter().map(|s| s.as_str()).collect();
        result = Imputer::new(ImputeStrategy::MostFrequent).fit_transform(&result, &cols)?;
    }
    Ok(result)
}

/// Drop any column that still has at most one distinct value after
/// imputation.
fn drop_low_information_columns(
    mut table: DataFrame,
    report: &mut CleaningReport,
) -> Result<DataFrame> {
    if table.height() == 0 {
        return Ok(table);
    }
    let constant: Vec<String> = table
        .get_columns()
        .iter()
        .filter(|c| {
            schema::distinct_count(c.as_materialized_series())
                .map(|n| n <= 1)
                .unwrap_or(false)
        })
        .map(|c| c.name().to_string())
        .collect();
    for name in constant {
        table = table.drop(&name)?;
        report.dropped_columns.push(DroppedColumn {
            name,
            reason: DropReason::Constant,
        });
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_is_structural_error() {
        let df = DataFrame::empty();
        let cleaner = TableCleaner::new();
        assert!(matches!(
            cleaner.clean(&df),
            Err(WorkbenchError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_duplicate_rows_dropped_once() {
        let df = df!(
            "a" => &[1.0, 1.0, 2.0],
            "b" => &["x", "x", "y"],
        )
        .unwrap();
        let (cleaned, report) = TableCleaner::new().clean(&df).unwrap();
        assert_eq!(cleaned.height(), 2);
        assert_eq!(report.duplicate_rows_dropped, 1);
    }

    #[test]
    fn test_constant_and_all_missing_columns_dropped() {
        let df = df!(
            "keep" => &[Some(1.0), Some(2.0), Some(3.0)],
            "constant" => &[Some(7.0), Some(7.0), Some(7.0)],
            "empty" => &[None::<f64>, None, None],
        )
        .unwrap();
        let (cleaned, report) = TableCleaner::new().clean(&df).unwrap();
        assert!(cleaned.column("keep").is_ok());
        assert!(cleaned.column("constant").is_err());
        assert!(cleaned.column("empty").is_err());
        assert_eq!(report.dropped_columns.len(), 2);
    }

    #[test]
    fn test_date_column_split_and_untouched_below_threshold() {
        let dates: Vec<String> = (1..=10).map(|d| format!("2021-{:02}-{:02}", d, d + 3)).collect();
        let mut mixed: Vec<&str> = vec!["2021-05-04"; 7];
        mixed.extend(["aa", "bb", "cc"]);
        let df = df!(
            "when" => &dates,
            "not_dates" => &mixed,
            "x" => &(0..10).map(|i| i as f64).collect::<Vec<_>>(),
        )
        .unwrap();

        let (cleaned, report) = TableCleaner::new().clean(&df).unwrap();

        assert_eq!(report.date_columns_split.len(), 1);
        assert_eq!(report.date_columns_split[0].source, "when");
        assert!(cleaned.column("when").is_err());
        assert!(cleaned.column("when_dd").is_ok());
        assert!(cleaned.column("when_mm").is_ok());
        assert!(cleaned.column("when_yyyy").is_err()); // constant year, dropped

        // 70% parseable is under the 80% bar, so the column survives as text
        assert!(cleaned.column("not_dates").is_ok());
    }

    #[test]
    fn test_money_column_coerced_and_imputed() {
        let df = df!(
            "price" => &["$10", "$30", "garbage", "$50"],
            "label" => &["a", "b", "c", "d"],
        )
        .unwrap();
        let (cleaned, report) = TableCleaner::new().clean(&df).unwrap();

        assert_eq!(report.money_columns_coerced, vec!["price"]);
        let price = cleaned.column("price").unwrap().f64().unwrap();
        assert_eq!(price.get(0), Some(10.0));
        // the unparsable cell was imputed with the mean of 10, 30, 50
        assert!((price.get(2).unwrap() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_imputation_fills_numeric_mean_and_text_mode() {
        let df = df!(
            "n" => &[Some(1.0), Some(2.0), None, Some(4.0)],
            "c" => &[Some("x"), Some("x"), Some("y"), None],
        )
        .unwrap();
        let (cleaned, _) = TableCleaner::new().clean(&df).unwrap();

        let n = cleaned.column("n").unwrap().f64().unwrap();
        assert!((n.get(2).unwrap() - 7.0 / 3.0).abs() < 1e-9);
        let c = cleaned.column("c").unwrap().str().unwrap();
        assert_eq!(c.get(3), Some("x"));
    }

    #[test]
    fn test_cleaning_is_a_fixed_point() {
        let df = df!(
            "n" => &[Some(1.0), Some(2.0), None, Some(4.0), Some(5.0)],
            "c" => &[Some("alpha"), Some("beta"), Some("alpha"), None, Some("gamma")],
            "price" => &[Some("$10"), Some("$20"), Some("$30"), Some("bad"), Some("$50")],
        )
        .unwrap();
        let cleaner = TableCleaner::new();
        let (once, _) = cleaner.clean(&df).unwrap();
        let (twice, report) = cleaner.clean(&once).unwrap();

        assert_eq!(once.shape(), twice.shape());
        assert!(once.equals(&twice));
        assert!(report.dropped_columns.is_empty());
        assert_eq!(report.duplicate_rows_dropped, 0);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Exactly 50% money-like must not trigger coercion
        let df = df!(
            "maybe" => &["$10", "$20", "aa", "bb"],
            "other" => &["p", "q", "r", "s"],
        )
        .unwrap();
        let config = CleanerConfig::new().with_money_threshold(0.5);
        let (cleaned, report) = TableCleaner::with_config(config).clean(&df).unwrap();
        assert!(report.money_columns_coerced.is_empty());
        assert!(cleaned.column("maybe").is_ok());
    }
}
