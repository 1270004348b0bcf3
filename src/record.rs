use crate::error::{AnalysisError, AnalysisResult};
use chrono::{Duration, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One row of the source table. Loaded once per run and never mutated;
/// derived columns live in annotated copies, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub source: String,
    pub task: String,
    #[serde(default)]
    pub external_owner: String,
    #[serde(default)]
    pub internal_owner: String,
    pub start_date: NaiveDate,
    pub forecast_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accomplished_date: Option<NaiveDate>,
    pub pct_progress: i64,
    pub days: i64,
    #[serde(default)]
    pub depends_on_raw: String,
}

impl TaskRecord {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        task: impl Into<String>,
        start_date: NaiveDate,
        forecast_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            task: task.into(),
            external_owner: String::new(),
            internal_owner: String::new(),
            start_date,
            forecast_date,
            accomplished_date: None,
            pct_progress: 0,
            days: 0,
            depends_on_raw: String::new(),
        }
    }

    /// Display identifier used by the chart layer: `id - task`.
    pub fn qualified_name(&self) -> String {
        format!("{} - {}", self.id, self.task)
    }

    /// Per-row invariants beyond what the schema can express.
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(0..=100).contains(&self.pct_progress) {
            return Err(AnalysisError::InvalidPercent {
                record_id: self.id.clone(),
                value: self.pct_progress,
            });
        }
        if self.days < 0 {
            return Err(AnalysisError::InvalidDays {
                record_id: self.id.clone(),
                value: self.days,
            });
        }
        Ok(())
    }

    pub fn to_dataframe_row(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(11);

        let id_data: [&str; 1] = [self.id.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("id"), id_data).into_column());

        let source_data: [&str; 1] = [self.source.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("source"), source_data).into_column());

        let task_data: [&str; 1] = [self.task.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("task"), task_data).into_column());

        let external_data: [&str; 1] = [self.external_owner.as_str()];
        columns.push(
            Series::new(PlSmallStr::from_static("external_owner"), external_data).into_column(),
        );

        let internal_data: [&str; 1] = [self.internal_owner.as_str()];
        columns.push(
            Series::new(PlSmallStr::from_static("internal_owner"), internal_data).into_column(),
        );

        columns.push(Self::series_from_date("start_date", Some(self.start_date))?.into_column());
        columns.push(
            Self::series_from_date("forecast_date", Some(self.forecast_date))?.into_column(),
        );
        columns.push(
            Self::series_from_date("accomplished_date", self.accomplished_date)?.into_column(),
        );

        let pct_data: [i64; 1] = [self.pct_progress];
        columns.push(Series::new(PlSmallStr::from_static("pct_progress"), pct_data).into_column());

        let days_data: [i64; 1] = [self.days];
        columns.push(Series::new(PlSmallStr::from_static("days"), days_data).into_column());

        let depends_data: [&str; 1] = [self.depends_on_raw.as_str()];
        columns.push(
            Series::new(PlSmallStr::from_static("depends_on_raw"), depends_data).into_column(),
        );

        DataFrame::new(columns)
    }

    pub fn from_dataframe_row(df: &DataFrame, row_idx: usize) -> AnalysisResult<Self> {
        let id = df
            .column("id")?
            .str()?
            .get(row_idx)
            .ok_or_else(|| {
                AnalysisError::Frame(PolarsError::ComputeError(
                    format!("row {row_idx} has no id").into(),
                ))
            })?
            .to_string();

        let start_date = Self::date_from_series(df.column("start_date")?.date()?, row_idx)
            .ok_or_else(|| AnalysisError::InvalidDate {
                record_id: id.clone(),
                field: "start_date".into(),
            })?;
        let forecast_date = Self::date_from_series(df.column("forecast_date")?.date()?, row_idx)
            .ok_or_else(|| AnalysisError::InvalidDate {
                record_id: id.clone(),
                field: "forecast_date".into(),
            })?;
        let accomplished_date =
            Self::date_from_series(df.column("accomplished_date")?.date()?, row_idx);

        let pct_progress = df
            .column("pct_progress")?
            .i64()?
            .get(row_idx)
            .ok_or_else(|| {
                AnalysisError::Frame(PolarsError::ComputeError(
                    format!("record '{id}' has no pct_progress").into(),
                ))
            })?;

        let record = Self {
            id,
            source: Self::str_or_empty(df.column("source")?.str()?, row_idx),
            task: Self::str_or_empty(df.column("task")?.str()?, row_idx),
            external_owner: Self::str_or_empty(df.column("external_owner")?.str()?, row_idx),
            internal_owner: Self::str_or_empty(df.column("internal_owner")?.str()?, row_idx),
            start_date,
            forecast_date,
            accomplished_date,
            pct_progress,
            days: df.column("days")?.i64()?.get(row_idx).unwrap_or(0),
            depends_on_raw: Self::str_or_empty(df.column("depends_on_raw")?.str()?, row_idx),
        };
        record.validate()?;
        Ok(record)
    }

    fn str_or_empty(chunked: &StringChunked, row_idx: usize) -> String {
        chunked.get(row_idx).unwrap_or("").to_string()
    }

    fn series_from_date(name: &str, date: Option<NaiveDate>) -> PolarsResult<Series> {
        let data: [Option<i32>; 1] = [date.map(date_to_i32)];
        Series::new(name.into(), data).cast(&DataType::Date)
    }

    fn date_from_series(chunked: &DateChunked, row_idx: usize) -> Option<NaiveDate> {
        chunked.get(row_idx).map(date_from_i32)
    }
}

/// Canonical column layout of the source table.
pub fn table_schema() -> Schema {
    Schema::from_iter(vec![
        Field::new("id".into(), DataType::String),
        Field::new("source".into(), DataType::String),
        Field::new("task".into(), DataType::String),
        Field::new("external_owner".into(), DataType::String),
        Field::new("internal_owner".into(), DataType::String),
        Field::new("start_date".into(), DataType::Date),
        Field::new("forecast_date".into(), DataType::Date),
        Field::new("accomplished_date".into(), DataType::Date),
        Field::new("pct_progress".into(), DataType::Int64),
        Field::new("days".into(), DataType::Int64),
        Field::new("depends_on_raw".into(), DataType::String),
    ])
}

/// Fail with the first absent column so schema errors name the field.
pub(crate) fn ensure_columns(df: &DataFrame, columns: &[&str]) -> AnalysisResult<()> {
    for name in columns {
        if df.column(name).is_err() {
            return Err(AnalysisError::MissingField {
                column: (*name).to_string(),
            });
        }
    }
    Ok(())
}

pub(crate) fn date_to_i32(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    (date - epoch).num_days() as i32
}

pub(crate) fn date_from_i32(days: i32) -> NaiveDate {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    epoch + Duration::days(days as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_schema_contains_expected_columns() {
        let schema = table_schema();
        let expected = vec![
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
        for name in expected {
            assert!(schema.contains(name.into()), "missing column {name}");
        }
    }

    #[test]
    fn negative_planned_days_are_rejected() {
        let mut record = TaskRecord::new(
            "T9",
            "core",
            "Cleanup",
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
        );
        record.days = -2;
        let err = record.validate().unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidDays { record_id, value } if record_id == "T9" && value == -2
        ));
    }

    #[test]
    fn row_round_trip_preserves_fields() {
        let mut record = TaskRecord::new(
            "T1",
            "core",
            "Design review",
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
        );
        record.external_owner = "Acme".into();
        record.internal_owner = "mt".into();
        record.pct_progress = 40;
        record.days = 4;
        record.depends_on_raw = "T0;T2".into();

        let df = record.to_dataframe_row().unwrap();
        let back = TaskRecord::from_dataframe_row(&df, 0).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.qualified_name(), "T1 - Design review");
    }
}
