use crate::context::AnalysisContext;
use crate::error::{AnalysisError, AnalysisResult};
use crate::table::TaskTable;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Coarse percent-complete bucket. Boundaries follow the reporting
/// convention: 0-30 starting out, 31-70 underway, 71-100 winding down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    InitialPhase,
    InProgress,
    Accomplished,
}

impl ProgressPhase {
    pub fn from_pct(pct: i64) -> Option<Self> {
        match pct {
            0..=30 => Some(ProgressPhase::InitialPhase),
            31..=70 => Some(ProgressPhase::InProgress),
            71..=100 => Some(ProgressPhase::Accomplished),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressPhase::InitialPhase => "Initial Phase",
            ProgressPhase::InProgress => "In progress",
            ProgressPhase::Accomplished => "Accomplished",
        }
    }
}

/// Ordered size class of a task's planned business-day span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SpanClass {
    Short,
    Medium,
    Long,
    ExtraLong,
    LongTerm,
}

impl SpanClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanClass::Short => "Short",
            SpanClass::Medium => "Medium",
            SpanClass::Long => "Long",
            SpanClass::ExtraLong => "Extra Long",
            SpanClass::LongTerm => "Long Term",
        }
    }
}

/// Inclusive upper bounds of the span classes, a configuration surface
/// rather than hardcoded constants. A diff below zero or above
/// `long_term_max` falls outside every class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanThresholds {
    pub short_max: i64,
    pub medium_max: i64,
    pub long_max: i64,
    pub extra_long_max: i64,
    pub long_term_max: i64,
}

impl Default for SpanThresholds {
    fn default() -> Self {
        Self {
            short_max: 3,
            medium_max: 7,
            long_max: 15,
            extra_long_max: 25,
            long_term_max: 100,
        }
    }
}

impl SpanThresholds {
    /// Bounds must ascend strictly, otherwise classes would overlap or
    /// vanish.
    pub fn validate(&self) -> Result<(), String> {
        let bounds = [
            self.short_max,
            self.medium_max,
            self.long_max,
            self.extra_long_max,
            self.long_term_max,
        ];
        if self.short_max < 0 {
            return Err(format!("short_max {} must be non-negative", self.short_max));
        }
        for pair in bounds.windows(2) {
            if pair[0] >= pair[1] {
                return Err(format!(
                    "span thresholds must ascend strictly, got {} before {}",
                    pair[0], pair[1]
                ));
            }
        }
        Ok(())
    }

    pub fn classify(&self, diff: i64) -> Option<SpanClass> {
        if diff < 0 {
            return None;
        }
        if diff <= self.short_max {
            Some(SpanClass::Short)
        } else if diff <= self.medium_max {
            Some(SpanClass::Medium)
        } else if diff <= self.long_max {
            Some(SpanClass::Long)
        } else if diff <= self.extra_long_max {
            Some(SpanClass::ExtraLong)
        } else if diff <= self.long_term_max {
            Some(SpanClass::LongTerm)
        } else {
            None
        }
    }
}

/// Per-record business-day metrics. `annotate` produces a derived copy of
/// the table frame with `diff`, `delay`, `progress` and `wip` columns;
/// the source table is never touched.
pub struct ScheduleMetrics<'a> {
    ctx: &'a AnalysisContext,
    thresholds: SpanThresholds,
}

impl<'a> ScheduleMetrics<'a> {
    pub fn new(ctx: &'a AnalysisContext) -> Self {
        Self {
            ctx,
            thresholds: SpanThresholds::default(),
        }
    }

    pub fn with_thresholds(
        ctx: &'a AnalysisContext,
        thresholds: SpanThresholds,
    ) -> AnalysisResult<Self> {
        thresholds
            .validate()
            .map_err(|message| AnalysisError::InvalidConfig { message })?;
        Ok(Self { ctx, thresholds })
    }

    pub fn thresholds(&self) -> &SpanThresholds {
        &self.thresholds
    }

    /// Diff is the business-day span from start to forecast; delay from
    /// forecast to actual completion, left null while the task is open.
    pub fn annotate(&self, table: &TaskTable) -> AnalysisResult<DataFrame> {
        let records = table.records()?;
        let calendar = &self.ctx.calendar;

        let mut diffs: Vec<i64> = Vec::with_capacity(records.len());
        let mut delays: Vec<Option<i64>> = Vec::with_capacity(records.len());
        let mut phases: Vec<Option<&'static str>> = Vec::with_capacity(records.len());
        let mut spans: Vec<Option<&'static str>> = Vec::with_capacity(records.len());

        for record in &records {
            let diff = calendar.business_days_between(record.start_date, record.forecast_date);
            let delay = record
                .accomplished_date
                .map(|done| calendar.business_days_between(record.forecast_date, done));

            diffs.push(diff);
            delays.push(delay);
            phases.push(ProgressPhase::from_pct(record.pct_progress).map(|p| p.as_str()));
            spans.push(self.thresholds.classify(diff).map(|c| c.as_str()));
        }

        let annotated = table.dataframe().hstack(&[
            Series::new(PlSmallStr::from_static("diff"), diffs).into_column(),
            Series::new(PlSmallStr::from_static("delay"), delays).into_column(),
            Series::new(PlSmallStr::from_static("progress"), phases).into_column(),
            Series::new(PlSmallStr::from_static("wip"), spans).into_column(),
        ])?;
        Ok(annotated)
    }
}
