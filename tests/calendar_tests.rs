use chrono::NaiveDate;
use timetable_tool::{ExcludedDates, TermCalendar, WeekType};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn anchor_week_is_odd_and_parity_alternates() {
    let term = TermCalendar::default();
    assert_eq!(term.week_type_for_date(d(2026, 1, 5)), WeekType::Odd);
    assert_eq!(term.week_type_for_date(d(2026, 1, 12)), WeekType::Even);
    assert_eq!(term.week_type_for_date(d(2026, 1, 19)), WeekType::Odd);
    assert_eq!(term.week_type_for_date(d(2026, 1, 26)), WeekType::Even);
}

#[test]
fn mid_week_dates_share_their_monday_parity() {
    let term = TermCalendar::default();
    // Wednesday and Sunday of the anchor week.
    assert_eq!(term.week_type_for_date(d(2026, 1, 7)), WeekType::Odd);
    assert_eq!(term.week_type_for_date(d(2026, 1, 11)), WeekType::Odd);
    assert_eq!(term.week_type_for_date(d(2026, 1, 14)), WeekType::Even);
}

#[test]
fn break_weeks_are_odd_and_blocks_restart_at_odd() {
    let term = TermCalendar::default();
    // Week 10 of the first block (delta 9) is even.
    assert_eq!(term.week_type_for_date(d(2026, 3, 9)), WeekType::Even);
    // Delta 10 falls in the one-week break.
    assert_eq!(term.week_type_for_date(d(2026, 3, 16)), WeekType::Odd);
    // The second block restarts at position 1.
    assert_eq!(term.week_type_for_date(d(2026, 3, 23)), WeekType::Odd);
    assert_eq!(term.week_type_for_date(d(2026, 3, 30)), WeekType::Even);
}

#[test]
fn second_break_spans_four_weeks() {
    let term = TermCalendar::default();
    // Second block covers deltas 11..=20; deltas 21..=24 are the long break.
    assert_eq!(term.week_type_for_date(d(2026, 6, 1)), WeekType::Odd); // delta 21
    assert_eq!(term.week_type_for_date(d(2026, 6, 22)), WeekType::Odd); // delta 24
    // Third block starts at delta 25.
    assert_eq!(term.week_type_for_date(d(2026, 6, 29)), WeekType::Odd);
    assert_eq!(term.week_type_for_date(d(2026, 7, 6)), WeekType::Even);
}

#[test]
fn dates_before_the_anchor_keep_alternating() {
    let term = TermCalendar::default();
    assert_eq!(term.week_type_for_date(d(2025, 12, 29)), WeekType::Even);
    assert_eq!(term.week_type_for_date(d(2025, 12, 22)), WeekType::Odd);
    assert_eq!(term.week_type_for_date(d(2025, 12, 15)), WeekType::Even);
}

#[test]
fn week_delta_counts_whole_weeks() {
    let term = TermCalendar::default();
    assert_eq!(term.week_delta(d(2026, 1, 5)), 0);
    assert_eq!(term.week_delta(d(2026, 1, 11)), 0);
    assert_eq!(term.week_delta(d(2026, 1, 12)), 1);
    assert_eq!(term.week_delta(d(2025, 12, 29)), -1);
}

#[test]
fn default_exclusions_cover_holidays_and_school_days() {
    let dates = ExcludedDates::default();
    assert!(dates.is_excluded(d(2025, 8, 9)));
    assert_eq!(dates.reason(d(2025, 8, 9)), Some("National Day"));
    assert_eq!(dates.reason(d(2025, 9, 5)), Some("Staff Day"));
    assert!(!dates.is_excluded(d(2025, 8, 10)));
}

#[test]
fn custom_exclusions_can_be_added() {
    let mut dates = ExcludedDates::empty();
    assert!(dates.is_empty());
    dates.add(d(2026, 2, 17), "Chinese New Year");
    assert!(dates.is_excluded(d(2026, 2, 17)));
    assert_eq!(dates.reason(d(2026, 2, 17)), Some("Chinese New Year"));
    assert_eq!(dates.len(), 1);
}
