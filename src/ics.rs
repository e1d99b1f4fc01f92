use crate::calendar::TermCalendar;
use crate::model::{WeekPattern, WeekType};
use crate::resolve::resolve_teacher_occurrences;
use crate::snapshot::Snapshot;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

pub const TIMEZONE: &str = "Asia/Singapore";

/// iCalendar weekday codes, indexed by day (0 = Monday).
const BYDAY: &[&str] = &["MO", "TU", "WE", "TH", "FR", "SA", "SU"];

/// First slot starts at 07:30; every slot is 30 minutes.
const FIRST_SLOT_HOUR: u32 = 7;
const FIRST_SLOT_MINUTE: u32 = 30;
const SLOT_MINUTES: u32 = 30;

#[derive(Debug, PartialEq)]
pub enum CalendarError {
    InvalidDateRange,
    NoValidLessons,
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::InvalidDateRange => {
                write!(f, "end date must not be before start date")
            }
            CalendarError::NoValidLessons => {
                write!(f, "teacher has no lessons to export")
            }
        }
    }
}

impl std::error::Error for CalendarError {}

/// Parameters of one calendar export.
#[derive(Debug, Clone)]
pub struct CalendarRequest {
    pub teacher_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Parity of the week containing `start_date`. When absent the term
    /// calendar decides.
    pub start_week_type: Option<WeekType>,
    pub include_odd: bool,
    pub include_even: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rrule {
    /// 1 for every-week blocks, 2 for parity-bound ones.
    pub interval: u32,
    pub byday: &'static str,
    pub until: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IcsEvent {
    pub uid: String,
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub stamp: NaiveDateTime,
    pub rrule: Rrule,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IcsCalendar {
    pub name: String,
    pub events: Vec<IcsEvent>,
}

impl IcsCalendar {
    /// Serialize to RFC 5545 text, CRLF line endings.
    pub fn to_ics_string(&self) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            "PRODID:-//Timetable Calendar//EN".to_string(),
            "CALSCALE:GREGORIAN".to_string(),
            format!("X-WR-CALNAME:Timetable - {}", escape_text(&self.name)),
            format!("X-WR-TIMEZONE:{TIMEZONE}"),
        ];
        for event in &self.events {
            lines.push("BEGIN:VEVENT".to_string());
            lines.push(format!("UID:{}", event.uid));
            lines.push(format!("DTSTAMP:{}", format_dt(event.stamp)));
            lines.push(format!(
                "DTSTART;TZID={TIMEZONE}:{}",
                format_dt(event.start)
            ));
            lines.push(format!("DTEND;TZID={TIMEZONE}:{}", format_dt(event.end)));
            lines.push(format!(
                "RRULE:FREQ=WEEKLY;INTERVAL={};BYDAY={};UNTIL={}",
                event.rrule.interval,
                event.rrule.byday,
                format_dt(event.rrule.until)
            ));
            lines.push(format!("SUMMARY:{}", escape_text(&event.summary)));
            lines.push(format!("LOCATION:{}", escape_text(&event.location)));
            lines.push(format!("DESCRIPTION:{}", escape_text(&event.description)));
            lines.push("STATUS:CONFIRMED".to_string());
            lines.push("END:VEVENT".to_string());
        }
        lines.push("END:VCALENDAR".to_string());
        let mut out = lines.join("\r\n");
        out.push_str("\r\n");
        out
    }
}

fn format_dt(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}

/// RFC 5545 TEXT escaping.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Clock start of a slot under the fixed 30-minute schedule.
fn slot_start(slot: u32) -> Option<NaiveTime> {
    let minutes =
        FIRST_SLOT_HOUR * 60 + FIRST_SLOT_MINUTE + slot.checked_sub(1)? * SLOT_MINUTES;
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Build the weekly-recurring calendar for one teacher.
///
/// Blocks are resolved unfiltered, then the parity visibility flags drop
/// odd/even blocks wholesale. Each surviving block becomes one event
/// anchored on its first occurrence within the date range.
pub fn build_teacher_calendar(
    snapshot: &Snapshot,
    term: &TermCalendar,
    request: &CalendarRequest,
) -> Result<IcsCalendar, CalendarError> {
    if request.end_date < request.start_date {
        return Err(CalendarError::InvalidDateRange);
    }
    if !has_valid_lessons(snapshot, &request.teacher_id) {
        return Err(CalendarError::NoValidLessons);
    }

    let blocks = resolve_teacher_occurrences(snapshot, &request.teacher_id, None);
    // Reproducible output: the stamp comes from the request, not the
    // wall clock.
    let stamp = request.start_date.and_hms_opt(0, 0, 0).ok_or(CalendarError::InvalidDateRange)?;
    let until = request
        .end_date
        .and_hms_opt(23, 59, 59)
        .ok_or(CalendarError::InvalidDateRange)?;

    let mut events = Vec::new();
    for block in &blocks {
        match block.pattern {
            WeekPattern::Odd if !request.include_odd => continue,
            WeekPattern::Even if !request.include_even => continue,
            _ => {}
        }
        let Some(byday) = BYDAY.get(block.day).copied() else {
            continue;
        };
        let first = match first_occurrence(term, request, block.day, block.pattern) {
            Some(date) if date <= request.end_date => date,
            _ => continue,
        };
        let (Some(start_time), Some(end_time)) = (
            slot_start(block.start_period),
            slot_start(block.end_period).map(|t| t + Duration::minutes(i64::from(SLOT_MINUTES))),
        ) else {
            continue;
        };

        events.push(IcsEvent {
            uid: format!(
                "{}-{}-{}-{}-{}-{}",
                block.lesson_id,
                block.day,
                block.pattern.code(),
                block.start_period,
                block.end_period,
                block.room_ids.join("_")
            ),
            summary: format!("{} ({})", block.subject, block.classes),
            location: block.room.clone(),
            description: block.classes.clone(),
            start: first.and_time(start_time),
            end: first.and_time(end_time),
            stamp,
            rrule: Rrule {
                interval: if block.pattern == WeekPattern::Every {
                    1
                } else {
                    2
                },
                byday,
                until,
            },
        });
    }

    Ok(IcsCalendar {
        name: snapshot.mappings.teacher_name(&request.teacher_id),
        events,
    })
}

fn has_valid_lessons(snapshot: &Snapshot, teacher_id: &str) -> bool {
    snapshot.document.lessons.iter().any(|lesson| {
        lesson.teacher_ids.iter().any(|id| id == teacher_id)
            && !snapshot
                .mappings
                .subjects
                .get(&lesson.subject_id)
                .is_some_and(|s| s.is_home_based_learning())
    })
}

/// First date on or after the request start that falls on the block's
/// weekday and, for parity-bound blocks, in a week of the right parity.
/// A parity mismatch pushes forward exactly one week.
fn first_occurrence(
    term: &TermCalendar,
    request: &CalendarRequest,
    day: usize,
    pattern: WeekPattern,
) -> Option<NaiveDate> {
    let wanted = i64::try_from(day).ok()?;
    let offset = (wanted
        - i64::from(request.start_date.weekday().num_days_from_monday()))
    .rem_euclid(7);
    let mut candidate = request.start_date + Duration::days(offset);

    if let Some(bound) = pattern.week_type() {
        let parity = match request.start_week_type {
            Some(start) => {
                let weeks = (TermCalendar::monday_of(candidate)
                    - TermCalendar::monday_of(request.start_date))
                .num_days()
                    / 7;
                if weeks.rem_euclid(2) == 0 {
                    start
                } else {
                    start.flip()
                }
            }
            None => term.week_type_for_date(candidate),
        };
        if parity != bound {
            candidate += Duration::days(7);
        }
    }
    Some(candidate)
}
