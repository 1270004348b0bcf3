use crate::error::AnalysisError;
use crate::record::TaskRecord;
use crate::table::TaskTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Csv(csv::Error),
    Serialization(SerdeJsonError),
    Analysis(AnalysisError),
    InvalidData(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "io error: {err}"),
            LoadError::Csv(err) => write!(f, "csv error: {err}"),
            LoadError::Serialization(err) => write!(f, "serialization error: {err}"),
            LoadError::Analysis(err) => write!(f, "validation error: {err}"),
            LoadError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<io::Error> for LoadError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for LoadError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<SerdeJsonError> for LoadError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<AnalysisError> for LoadError {
    fn from(value: AnalysisError) -> Self {
        Self::Analysis(value)
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Serialize, Deserialize)]
struct TaskCsvRow {
    id: String,
    source: String,
    task: String,
    external_owner: String,
    internal_owner: String,
    start_date: String,
    forecast_date: String,
    accomplished_date: String,
    pct_progress: i64,
    days: i64,
    depends_on: String,
}

impl From<&TaskRecord> for TaskCsvRow {
    fn from(record: &TaskRecord) -> Self {
        Self {
            id: record.id.clone(),
            source: record.source.clone(),
            task: record.task.clone(),
            external_owner: record.external_owner.clone(),
            internal_owner: record.internal_owner.clone(),
            start_date: format_date(Some(record.start_date)),
            forecast_date: format_date(Some(record.forecast_date)),
            accomplished_date: format_date(record.accomplished_date),
            pct_progress: record.pct_progress,
            days: record.days,
            depends_on: record.depends_on_raw.clone(),
        }
    }
}

impl TaskCsvRow {
    fn into_record(self) -> LoadResult<TaskRecord> {
        let start_date = parse_date(&self.start_date)?.ok_or_else(|| {
            LoadError::InvalidData(format!("row '{}' has no start_date", self.id))
        })?;
        let forecast_date = parse_date(&self.forecast_date)?.ok_or_else(|| {
            LoadError::InvalidData(format!("row '{}' has no forecast_date", self.id))
        })?;

        let mut record = TaskRecord::new(self.id, self.source, self.task, start_date, forecast_date);
        record.external_owner = self.external_owner;
        record.internal_owner = self.internal_owner;
        record.accomplished_date = parse_date(&self.accomplished_date)?;
        record.pct_progress = self.pct_progress;
        record.days = self.days;
        record.depends_on_raw = self.depends_on;
        Ok(record)
    }
}

pub fn load_tasks_from_csv<P: AsRef<Path>>(path: P) -> LoadResult<TaskTable> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for row in reader.deserialize::<TaskCsvRow>() {
        records.push(row?.into_record()?);
    }

    if records.is_empty() {
        return Err(LoadError::InvalidData("CSV file contained no tasks".into()));
    }

    Ok(TaskTable::from_records(&records)?)
}

pub fn save_tasks_to_csv<P: AsRef<Path>>(table: &TaskTable, path: P) -> LoadResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for record in table.records()? {
        writer.serialize(TaskCsvRow::from(&record))?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize, Deserialize)]
struct HolidayCsvRow {
    day: String,
}

pub fn load_holidays_from_csv<P: AsRef<Path>>(path: P) -> LoadResult<Vec<NaiveDate>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut holidays = Vec::new();
    for row in reader.deserialize::<HolidayCsvRow>() {
        let row = row?;
        let date = parse_date(&row.day)?.ok_or_else(|| {
            LoadError::InvalidData("holiday row with an empty day".to_string())
        })?;
        holidays.push(date);
    }
    Ok(holidays)
}

/// Tasks and holidays in one document; the single-file exchange format.
#[derive(Serialize, Deserialize)]
struct AnalysisSnapshot {
    tasks: Vec<TaskRecord>,
    holidays: Vec<NaiveDate>,
}

pub fn save_snapshot_to_json<P: AsRef<Path>>(
    table: &TaskTable,
    holidays: &[NaiveDate],
    path: P,
) -> LoadResult<()> {
    let snapshot = AnalysisSnapshot {
        tasks: table.records()?,
        holidays: holidays.to_vec(),
    };
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_snapshot_from_json<P: AsRef<Path>>(path: P) -> LoadResult<(TaskTable, Vec<NaiveDate>)> {
    let file = File::open(path)?;
    let snapshot: AnalysisSnapshot = serde_json::from_reader(file)?;
    let table = TaskTable::from_records(&snapshot.tasks)?;
    Ok((table, snapshot.holidays))
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn parse_date(input: &str) -> LoadResult<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|e| LoadError::InvalidData(format!("invalid date '{input}': {e}")))
}
