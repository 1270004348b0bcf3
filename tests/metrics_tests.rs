use chrono::NaiveDate;
use gantt_analyzer::{
    AnalysisContext, ScheduleMetrics, SpanThresholds, TaskRecord, TaskTable,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn task(
    id: &str,
    start: NaiveDate,
    forecast: NaiveDate,
    accomplished: Option<NaiveDate>,
    pct: i64,
) -> TaskRecord {
    let mut record = TaskRecord::new(id, "core", "task", start, forecast);
    record.accomplished_date = accomplished;
    record.pct_progress = pct;
    record
}

#[test]
fn diff_skips_the_holiday() {
    // 2024-01-01 is a Monday holiday; business days to Friday the 5th are
    // Jan 2, 3 and 4.
    let ctx = AnalysisContext::new(d(2024, 6, 12), vec![d(2024, 1, 1)]);
    let table =
        TaskTable::from_records(&[task("A", d(2024, 1, 1), d(2024, 1, 5), None, 0)]).unwrap();
    let annotated = ScheduleMetrics::new(&ctx).annotate(&table).unwrap();

    assert_eq!(annotated.column("diff").unwrap().i64().unwrap().get(0), Some(3));
}

#[test]
fn delay_is_null_until_the_task_completes() {
    let ctx = AnalysisContext::new(d(2024, 6, 12), Vec::new());
    let table = TaskTable::from_records(&[
        task("OPEN", d(2024, 1, 8), d(2024, 1, 12), None, 40),
        task("DONE", d(2024, 1, 8), d(2024, 1, 12), Some(d(2024, 1, 17)), 100),
    ])
    .unwrap();
    let annotated = ScheduleMetrics::new(&ctx).annotate(&table).unwrap();

    let delays = annotated.column("delay").unwrap().i64().unwrap();
    assert_eq!(delays.get(0), None);
    // Friday the 12th to Wednesday the 17th: Fri, Mon, Tue.
    assert_eq!(delays.get(1), Some(3));
}

#[test]
fn delay_is_negative_when_finished_early() {
    let ctx = AnalysisContext::new(d(2024, 6, 12), Vec::new());
    let table = TaskTable::from_records(&[task(
        "EARLY",
        d(2024, 1, 8),
        d(2024, 1, 12),
        Some(d(2024, 1, 10)),
        100,
    )])
    .unwrap();
    let annotated = ScheduleMetrics::new(&ctx).annotate(&table).unwrap();

    assert_eq!(
        annotated.column("delay").unwrap().i64().unwrap().get(0),
        Some(-2)
    );
}

#[test]
fn progress_and_wip_columns_carry_category_labels() {
    let ctx = AnalysisContext::new(d(2024, 6, 12), Vec::new());
    let table = TaskTable::from_records(&[
        // diff = 4 business days (Mon..Fri), pct 20.
        task("A", d(2024, 1, 8), d(2024, 1, 12), None, 20),
        // diff = 0, inconsistent row: forecast before start.
        task("B", d(2024, 1, 12), d(2024, 1, 8), None, 50),
        // diff = 20 business days, pct 90.
        task("C", d(2024, 1, 8), d(2024, 2, 5), None, 90),
    ])
    .unwrap();
    let annotated = ScheduleMetrics::new(&ctx).annotate(&table).unwrap();

    let progress = annotated.column("progress").unwrap().str().unwrap();
    assert_eq!(progress.get(0), Some("Initial Phase"));
    assert_eq!(progress.get(1), Some("In progress"));
    assert_eq!(progress.get(2), Some("Accomplished"));

    let wip = annotated.column("wip").unwrap().str().unwrap();
    assert_eq!(wip.get(0), Some("Medium"));
    // Negative diff has no span class.
    assert_eq!(wip.get(1), None);
    assert_eq!(wip.get(2), Some("Extra Long"));
}

#[test]
fn custom_thresholds_shift_the_buckets() {
    let ctx = AnalysisContext::new(d(2024, 6, 12), Vec::new());
    let thresholds = SpanThresholds {
        short_max: 1,
        medium_max: 2,
        long_max: 3,
        extra_long_max: 4,
        long_term_max: 50,
    };
    let metrics = ScheduleMetrics::with_thresholds(&ctx, thresholds).unwrap();
    let table =
        TaskTable::from_records(&[task("A", d(2024, 1, 8), d(2024, 1, 12), None, 0)]).unwrap();
    let annotated = metrics.annotate(&table).unwrap();

    // diff = 4 lands in ExtraLong under the tightened bounds.
    assert_eq!(
        annotated.column("wip").unwrap().str().unwrap().get(0),
        Some("Extra Long")
    );
}

#[test]
fn invalid_thresholds_are_rejected() {
    let ctx = AnalysisContext::new(d(2024, 6, 12), Vec::new());
    let thresholds = SpanThresholds {
        short_max: 10,
        medium_max: 5,
        ..SpanThresholds::default()
    };
    assert!(ScheduleMetrics::with_thresholds(&ctx, thresholds).is_err());
}

#[test]
fn annotate_leaves_the_source_table_untouched() {
    let ctx = AnalysisContext::new(d(2024, 6, 12), Vec::new());
    let table =
        TaskTable::from_records(&[task("A", d(2024, 1, 8), d(2024, 1, 12), None, 20)]).unwrap();
    let before = table.dataframe().clone();

    let annotated = ScheduleMetrics::new(&ctx).annotate(&table).unwrap();

    assert!(table.dataframe().equals_missing(&before));
    assert_eq!(annotated.width(), before.width() + 4);
}
