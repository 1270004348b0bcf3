use chrono::NaiveDate;
use gantt_analyzer::BusinessCalendar;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn weekends_are_not_business_days() {
    let cal = BusinessCalendar::new();
    // 2025-01-04 is a Saturday, 2025-01-05 is a Sunday
    assert!(!cal.is_business_day(d(2025, 1, 4)));
    assert!(!cal.is_business_day(d(2025, 1, 5)));
    assert!(cal.is_business_day(d(2025, 1, 6)));
}

#[test]
fn holidays_are_not_business_days() {
    let cal = BusinessCalendar::from_holidays([d(2025, 1, 1)]);
    assert!(!cal.is_business_day(d(2025, 1, 1)));
    assert!(cal.is_business_day(d(2025, 1, 2)));
}

#[test]
fn equal_dates_count_zero() {
    let cal = BusinessCalendar::from_holidays([d(2024, 1, 1), d(2024, 12, 25)]);
    for date in [d(2024, 1, 1), d(2024, 6, 15), d(2024, 12, 25)] {
        assert_eq!(cal.business_days_between(date, date), 0);
    }
}

#[test]
fn reversed_span_negates() {
    let cal = BusinessCalendar::from_holidays([d(2024, 1, 1)]);
    let pairs = [
        (d(2024, 1, 1), d(2024, 1, 5)),
        (d(2024, 2, 1), d(2024, 3, 1)),
        (d(2024, 1, 6), d(2024, 1, 7)),
    ];
    for (a, b) in pairs {
        assert_eq!(
            cal.business_days_between(a, b),
            -cal.business_days_between(b, a)
        );
    }
}

#[test]
fn span_excludes_holiday_and_end_date() {
    // 2024-01-01 is a Monday and a holiday; Jan 2, 3, 4 are the only
    // business days counted up to (not including) Friday the 5th.
    let cal = BusinessCalendar::from_holidays([d(2024, 1, 1)]);
    assert_eq!(cal.business_days_between(d(2024, 1, 1), d(2024, 1, 5)), 3);
}

#[test]
fn span_skips_weekends() {
    let cal = BusinessCalendar::new();
    // Friday 2025-01-03 to Tuesday 2025-01-07: Friday and Monday count.
    assert_eq!(cal.business_days_between(d(2025, 1, 3), d(2025, 1, 7)), 2);
    // A full Saturday-to-Saturday week holds five business days.
    assert_eq!(cal.business_days_between(d(2025, 1, 4), d(2025, 1, 11)), 5);
}

#[test]
fn added_holidays_shrink_the_span() {
    let mut cal = BusinessCalendar::new();
    let before = cal.business_days_between(d(2025, 1, 6), d(2025, 1, 10));
    cal.add_holiday(d(2025, 1, 8));
    let after = cal.business_days_between(d(2025, 1, 6), d(2025, 1, 10));
    assert_eq!(before, 4);
    assert_eq!(after, 3);
}
