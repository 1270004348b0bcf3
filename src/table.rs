use crate::error::{AnalysisError, AnalysisResult};
use crate::record::{ensure_columns, table_schema, TaskRecord};
use polars::prelude::*;
use std::collections::HashSet;

/// Required columns, checked before any row is converted so a malformed
/// schema fails with the missing column's name rather than a row error.
const REQUIRED_COLUMNS: [&str; 11] = [
    "id",
    "source",
    "task",
    "external_owner",
    "internal_owner",
    "start_date",
    "forecast_date",
    "accomplished_date",
    "pct_progress",
    "days",
    "depends_on_raw",
];

/// Immutable snapshot of the source table. Construction is the validation
/// boundary: schema presence, per-row conversion, and identifier
/// uniqueness are checked once here; afterwards every component reads the
/// same frame without re-checking.
#[derive(Debug)]
pub struct TaskTable {
    df: DataFrame,
}

impl TaskTable {
    pub fn from_records(records: &[TaskRecord]) -> AnalysisResult<Self> {
        let mut df = DataFrame::empty_with_schema(&table_schema());
        for record in records {
            df.vstack_mut(&record.to_dataframe_row().map_err(AnalysisError::Frame)?)?;
        }
        Self::from_dataframe(df)
    }

    pub fn from_dataframe(df: DataFrame) -> AnalysisResult<Self> {
        ensure_columns(&df, &REQUIRED_COLUMNS)?;

        let mut seen_ids: HashSet<String> = HashSet::with_capacity(df.height());
        for row_idx in 0..df.height() {
            let record = TaskRecord::from_dataframe_row(&df, row_idx)?;
            if !seen_ids.insert(record.id.clone()) {
                return Err(AnalysisError::DuplicateId { id: record.id });
            }
        }

        Ok(Self { df })
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn records(&self) -> AnalysisResult<Vec<TaskRecord>> {
        let mut records = Vec::with_capacity(self.df.height());
        for row_idx in 0..self.df.height() {
            records.push(TaskRecord::from_dataframe_row(&self.df, row_idx)?);
        }
        Ok(records)
    }

    /// Distinct `source` values in first-appearance order. Grouping and
    /// hierarchy assembly both iterate this order.
    pub fn distinct_sources(&self) -> AnalysisResult<Vec<String>> {
        self.distinct_strings("source")
    }

    /// Distinct `external_owner` values in first-appearance order, for the
    /// rendering collaborator's resource registry.
    pub fn distinct_external_owners(&self) -> AnalysisResult<Vec<String>> {
        self.distinct_strings("external_owner")
    }

    fn distinct_strings(&self, column: &str) -> AnalysisResult<Vec<String>> {
        let chunked = self.df.column(column)?.str()?;
        let mut seen: HashSet<&str> = HashSet::new();
        let mut values = Vec::new();
        for value in chunked.into_iter().flatten() {
            if seen.insert(value) {
                values.push(value.to_string());
            }
        }
        Ok(values)
    }

    /// Rows whose `source` equals the given group name, as an independent
    /// frame.
    pub fn source_subset(&self, source: &str) -> AnalysisResult<DataFrame> {
        let subset = self
            .df
            .clone()
            .lazy()
            .filter(col("source").eq(lit(source.to_string())))
            .collect()?;
        Ok(subset)
    }
}
