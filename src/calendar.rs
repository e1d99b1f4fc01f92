use crate::model::WeekType;
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashMap;

/// Term structure used to derive the odd/even parity of any calendar
/// week: instructional blocks of whole weeks, separated by breaks, both
/// cycling past the configured schedule.
pub struct TermCalendar {
    anchor: NaiveDate,
    /// Instructional block lengths, in weeks.
    blocks: Vec<i64>,
    /// Break lengths between consecutive blocks, in weeks. Cycled when
    /// shorter than `blocks`.
    breaks: Vec<i64>,
}

impl Default for TermCalendar {
    fn default() -> Self {
        // Week 1 of the 2026 school year.
        Self::new(
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            vec![10, 10, 10, 10],
            vec![1, 4, 1],
        )
    }
}

impl TermCalendar {
    pub fn new(anchor: NaiveDate, blocks: Vec<i64>, breaks: Vec<i64>) -> Self {
        Self {
            anchor,
            blocks,
            breaks,
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// The ISO Monday of the week containing `date`.
    pub fn monday_of(date: NaiveDate) -> NaiveDate {
        date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
    }

    /// Whole weeks between the anchor's week and `date`'s week. Negative
    /// before the anchor.
    pub fn week_delta(&self, date: NaiveDate) -> i64 {
        let from = Self::monday_of(self.anchor);
        let to = Self::monday_of(date);
        (to - from).num_days().div_euclid(7)
    }

    /// Odd/even parity of the instructional week containing `date`.
    ///
    /// Position within a block is 1-based, so the anchor week is odd.
    /// Break weeks report odd. Before the anchor the delta is negative
    /// and parity keeps alternating backwards (euclidean remainder).
    pub fn week_type_for_date(&self, date: NaiveDate) -> WeekType {
        let mut delta = self.week_delta(date);
        if delta < 0 {
            return if delta.rem_euclid(2) == 0 {
                WeekType::Odd
            } else {
                WeekType::Even
            };
        }
        let mut index = 0usize;
        loop {
            let block = self.blocks[index % self.blocks.len()];
            if delta < block {
                // 1-based position inside the block.
                return if (delta + 1) % 2 == 1 {
                    WeekType::Odd
                } else {
                    WeekType::Even
                };
            }
            delta -= block;
            let pause = self.breaks[index % self.breaks.len()];
            if delta < pause {
                return WeekType::Odd;
            }
            delta -= pause;
            index += 1;
        }
    }
}

/// Dates on which no lessons run, with a human-readable reason.
pub struct ExcludedDates {
    entries: HashMap<NaiveDate, String>,
}

impl Default for ExcludedDates {
    fn default() -> Self {
        let mut dates = Self {
            entries: HashMap::new(),
        };
        for (y, m, d, reason) in DEFAULT_EXCLUSIONS {
            dates.add(NaiveDate::from_ymd_opt(*y, *m, *d).unwrap(), reason);
        }
        dates
    }
}

impl ExcludedDates {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn add(&mut self, date: NaiveDate, reason: &str) {
        self.entries.insert(date, reason.to_string());
    }

    pub fn is_excluded(&self, date: NaiveDate) -> bool {
        self.entries.contains_key(&date)
    }

    pub fn reason(&self, date: NaiveDate) -> Option<&str> {
        self.entries.get(&date).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 2025 Singapore public holidays, term-break markers and special school
/// days.
const DEFAULT_EXCLUSIONS: &[(i32, u32, u32, &str)] = &[
    (2025, 1, 1, "New Year's Day"),
    (2025, 1, 29, "Chinese New Year"),
    (2025, 1, 30, "Chinese New Year"),
    (2025, 3, 30, "Good Friday"),
    (2025, 3, 31, "Hari Raya Puasa"),
    (2025, 5, 1, "Labour Day"),
    (2025, 5, 11, "Vesak Day"),
    (2025, 6, 6, "Hari Raya Haji"),
    (2025, 8, 9, "National Day"),
    (2025, 10, 22, "Deepavali"),
    (2025, 12, 25, "Christmas Day"),
    (2025, 3, 15, "Term 1 Break Start"),
    (2025, 3, 23, "Term 1 Break End"),
    (2025, 5, 31, "Term 2 Break Start"),
    (2025, 6, 29, "Term 2 Break End"),
    (2025, 9, 6, "Term 3 Break Start"),
    (2025, 9, 14, "Term 3 Break End"),
    (2025, 11, 29, "Term 4 Break Start"),
    (2025, 12, 31, "Term 4 Break End"),
    (2025, 1, 28, "CNY Celebrations"),
    (2025, 7, 6, "Youth Day"),
    (2025, 9, 4, "Staff Day Celebrations"),
    (2025, 9, 5, "Staff Day"),
];
