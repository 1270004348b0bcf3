use crate::error::AnalysisResult;
use crate::record::ensure_columns;
use polars::prelude::*;

/// Aggregate tables for the plotting collaborator, computed over the
/// metrics-annotated frame. Group order is made deterministic by sorting
/// each result. A frame missing one of the aggregated columns fails with
/// `MissingField` naming it.

/// Mean percent-progress per value of `group`, highest first.
pub fn mean_progress_by(df: &DataFrame, group: &str) -> AnalysisResult<DataFrame> {
    ensure_columns(df, &[group, "pct_progress"])?;
    let out = df
        .clone()
        .lazy()
        .group_by([col(group)])
        .agg([col("pct_progress").mean().alias("mean_progress")])
        .sort(
            ["mean_progress"],
            SortMultipleOptions::default().with_order_descending(true),
        )
        .collect()?;
    Ok(out)
}

/// Task counts per progress phase. Rows whose phase is null (out-of-range
/// percent) are dropped.
pub fn counts_by_progress_phase(df: &DataFrame) -> AnalysisResult<DataFrame> {
    ensure_columns(df, &["progress", "id"])?;
    let out = df
        .clone()
        .lazy()
        .filter(col("progress").is_not_null())
        .group_by([col("progress")])
        .agg([col("id").count().alias("tasks")])
        .sort(["progress"], SortMultipleOptions::default())
        .collect()?;
    Ok(out)
}

/// Span-class counts over tasks that are not finished yet, the "tasks by
/// size" pie feed.
pub fn pending_counts_by_span(df: &DataFrame) -> AnalysisResult<DataFrame> {
    ensure_columns(df, &["wip", "pct_progress", "id"])?;
    let out = df
        .clone()
        .lazy()
        .filter(col("pct_progress").neq(lit(100)))
        .filter(col("wip").is_not_null())
        .group_by([col("wip")])
        .agg([col("id").count().alias("tasks")])
        .sort(["wip"], SortMultipleOptions::default())
        .collect()?;
    Ok(out)
}

/// Task count and mean percent-progress per internal owner.
pub fn task_counts_by_internal_owner(df: &DataFrame) -> AnalysisResult<DataFrame> {
    ensure_columns(df, &["internal_owner", "id", "pct_progress"])?;
    let out = df
        .clone()
        .lazy()
        .group_by([col("internal_owner")])
        .agg([
            col("id").count().alias("tasks"),
            col("pct_progress").mean().alias("mean_progress"),
        ])
        .sort(["internal_owner"], SortMultipleOptions::default())
        .collect()?;
    Ok(out)
}
