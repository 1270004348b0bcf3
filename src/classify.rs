use crate::context::AnalysisContext;
use crate::error::AnalysisResult;
use crate::record::ensure_columns;
use polars::prelude::*;

/// Date columns the before/after partitions can be keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    Forecast,
    Accomplished,
}

impl DateField {
    pub fn column(&self) -> &'static str {
        match self {
            DateField::Start => "start_date",
            DateField::Forecast => "forecast_date",
            DateField::Accomplished => "accomplished_date",
        }
    }
}

/// Predicate-based partitions over the record set, all evaluated against
/// the context's single "today". Each call returns an independent frame;
/// partitions overlap by construction (a record can be both delayed and
/// inconsistent) and no exhaustiveness is claimed.
///
/// Works over the raw table frame or the metrics-annotated copy — the
/// predicates only touch the base columns.
#[derive(Debug)]
pub struct Classifier<'a> {
    df: &'a DataFrame,
    ctx: &'a AnalysisContext,
}

impl<'a> Classifier<'a> {
    /// Fails with `MissingField` when the frame lacks a predicate column;
    /// a malformed table is fatal for the whole run.
    pub fn new(df: &'a DataFrame, ctx: &'a AnalysisContext) -> AnalysisResult<Self> {
        ensure_columns(
            df,
            &[
                "start_date",
                "forecast_date",
                "accomplished_date",
                "pct_progress",
            ],
        )?;
        Ok(Self { df, ctx })
    }

    fn today(&self) -> Expr {
        lit(self.ctx.today).cast(DataType::Date)
    }

    fn filter(&self, predicate: Expr) -> AnalysisResult<DataFrame> {
        let subset = self.df.clone().lazy().filter(predicate).collect()?;
        Ok(subset)
    }

    /// Records whose `field` value is strictly before today. A null date
    /// never matches.
    pub fn before(&self, field: DateField) -> AnalysisResult<DataFrame> {
        self.filter(col(field.column()).lt(self.today()))
    }

    /// Records whose `field` value is on or after today.
    pub fn after(&self, field: DateField) -> AnalysisResult<DataFrame> {
        self.filter(col(field.column()).gt_eq(self.today()))
    }

    /// Forecast already past while the task is not done.
    pub fn delayed(&self) -> AnalysisResult<DataFrame> {
        self.filter(
            col("forecast_date")
                .lt(self.today())
                .and(col("pct_progress").lt(lit(100))),
        )
    }

    /// Completion date recorded and percent-complete at 100.
    pub fn accomplished(&self) -> AnalysisResult<DataFrame> {
        self.filter(
            col("accomplished_date")
                .is_not_null()
                .and(col("pct_progress").eq(lit(100))),
        )
    }

    /// Started but not finished, with a last-activity date no later than
    /// today. `accomplished_date` doubles as the activity marker here;
    /// the predicate is kept exactly as the source system wrote it.
    pub fn in_progress(&self) -> AnalysisResult<DataFrame> {
        self.filter(
            col("pct_progress")
                .gt(lit(0))
                .and(col("pct_progress").lt(lit(100)))
                .and(col("accomplished_date").lt_eq(self.today())),
        )
    }

    /// Start date after forecast date: the row contradicts itself.
    pub fn inconsistent(&self) -> AnalysisResult<DataFrame> {
        self.filter(col("start_date").gt(col("forecast_date")))
    }

    /// Data-quality check for the completion invariant: percent at 100
    /// without a completion date, or a completion date without percent at
    /// 100. Flagged, never rejected.
    pub fn completion_mismatches(&self) -> AnalysisResult<DataFrame> {
        self.filter(
            col("pct_progress")
                .eq(lit(100))
                .and(col("accomplished_date").is_null())
                .or(col("accomplished_date")
                    .is_not_null()
                    .and(col("pct_progress").lt(lit(100)))),
        )
    }
}
