use chrono::{NaiveDate, NaiveDateTime};
use timetable_tool::{
    build_teacher_calendar, CalendarError, CalendarRequest, Snapshot, TermCalendar, WeekType,
};

const FIXTURE: &str = r#"<timetable>
    <teacher id="t1" name="Alice Tan" short="ATan [M]"/>
    <teacher id="t2" name="Hua Li" short="HLi [MT]"/>
    <subject id="s1" name="Mathematics" short="MA"/>
    <subject id="s2" name="Chemistry" short="CH"/>
    <subject id="s3" name="Math HBL" short="MH"/>
    <classroom id="r1" name="Room 1" short="R1"/>
    <classroom id="r2" name="Room 2" short="R2"/>
    <class id="c1" name="Class 1A" short="1A"/>
    <period id="p1" period="1" starttime="07:30" endtime="08:00"/>
    <period id="p2" period="2" starttime="08:00" endtime="08:30"/>
    <lesson id="l1" subjectid="s1" teacherids="t1" classids="c1" classroomids="r1" weeksdefid="w9" daysdefid="d1"/>
    <card lessonid="l1" period="1" days="10000" weeks="11" classroomids="r1"/>
    <card lessonid="l1" period="2" days="10000" weeks="11" classroomids="r1"/>
    <lesson id="l2" subjectid="s2" teacherids="t1" classids="c1" classroomids="r2" weeksdefid="w9" daysdefid="d1"/>
    <card lessonid="l2" period="1" days="01000" weeks="01" classroomids="r2"/>
    <lesson id="l3" subjectid="s3" teacherids="t2" classids="c1" classroomids="r1" weeksdefid="w9" daysdefid="d1"/>
    <card lessonid="l3" period="1" days="10000" weeks="11" classroomids="r1"/>
</timetable>"#;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dt(y: i32, m: u32, day: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(h, min, s).unwrap()
}

fn request(teacher_id: &str) -> CalendarRequest {
    CalendarRequest {
        teacher_id: teacher_id.to_string(),
        start_date: d(2026, 1, 5),
        end_date: d(2026, 3, 31),
        start_week_type: None,
        include_odd: true,
        include_even: true,
    }
}

#[test]
fn inverted_date_range_is_rejected_before_any_work() {
    let snapshot = Snapshot::from_xml(FIXTURE).unwrap();
    let term = TermCalendar::default();
    let mut req = request("t1");
    req.end_date = d(2026, 1, 4);
    let err = build_teacher_calendar(&snapshot, &term, &req).unwrap_err();
    assert_eq!(err, CalendarError::InvalidDateRange);
}

#[test]
fn teacher_with_only_hbl_lessons_has_nothing_to_export() {
    let snapshot = Snapshot::from_xml(FIXTURE).unwrap();
    let term = TermCalendar::default();
    let err = build_teacher_calendar(&snapshot, &term, &request("t2")).unwrap_err();
    assert_eq!(err, CalendarError::NoValidLessons);
    let err = build_teacher_calendar(&snapshot, &term, &request("missing")).unwrap_err();
    assert_eq!(err, CalendarError::NoValidLessons);
}

#[test]
fn every_week_block_becomes_a_weekly_event() {
    let snapshot = Snapshot::from_xml(FIXTURE).unwrap();
    let term = TermCalendar::default();
    let calendar = build_teacher_calendar(&snapshot, &term, &request("t1")).unwrap();
    assert_eq!(calendar.name, "Alice Tan");

    let event = calendar
        .events
        .iter()
        .find(|e| e.uid.starts_with("l1-"))
        .unwrap();
    assert_eq!(event.uid, "l1-0-11-1-2-r1");
    assert_eq!(event.summary, "Mathematics (Class 1A)");
    assert_eq!(event.location, "Room 1");
    // Double period: slot 1 start through slot 2 start + 30min.
    assert_eq!(event.start, dt(2026, 1, 5, 7, 30, 0));
    assert_eq!(event.end, dt(2026, 1, 5, 8, 30, 0));
    assert_eq!(event.rrule.interval, 1);
    assert_eq!(event.rrule.byday, "MO");
    assert_eq!(event.rrule.until, dt(2026, 3, 31, 23, 59, 59));
}

#[test]
fn parity_bound_block_starts_in_a_matching_week() {
    let snapshot = Snapshot::from_xml(FIXTURE).unwrap();
    let term = TermCalendar::default();
    let calendar = build_teacher_calendar(&snapshot, &term, &request("t1")).unwrap();

    // l2 runs Tuesdays in even weeks; 2026-01-06 is an odd week, so the
    // event is pushed forward exactly one week.
    let event = calendar
        .events
        .iter()
        .find(|e| e.uid.starts_with("l2-"))
        .unwrap();
    assert_eq!(event.start, dt(2026, 1, 13, 7, 30, 0));
    assert_eq!(event.rrule.interval, 2);
    assert_eq!(event.rrule.byday, "TU");
}

#[test]
fn caller_supplied_start_parity_overrides_the_term_calendar() {
    let snapshot = Snapshot::from_xml(FIXTURE).unwrap();
    let term = TermCalendar::default();
    let mut req = request("t1");
    // Declare the start week even: the even-week lesson now starts
    // immediately.
    req.start_week_type = Some(WeekType::Even);
    let calendar = build_teacher_calendar(&snapshot, &term, &req).unwrap();
    let event = calendar
        .events
        .iter()
        .find(|e| e.uid.starts_with("l2-"))
        .unwrap();
    assert_eq!(event.start, dt(2026, 1, 6, 7, 30, 0));
}

#[test]
fn parity_visibility_flags_drop_whole_blocks() {
    let snapshot = Snapshot::from_xml(FIXTURE).unwrap();
    let term = TermCalendar::default();
    let mut req = request("t1");
    req.include_even = false;
    let calendar = build_teacher_calendar(&snapshot, &term, &req).unwrap();
    assert!(calendar.events.iter().all(|e| !e.uid.starts_with("l2-")));
    assert!(calendar.events.iter().any(|e| e.uid.starts_with("l1-")));
}

#[test]
fn serialized_calendar_carries_the_standard_headers() {
    let snapshot = Snapshot::from_xml(FIXTURE).unwrap();
    let term = TermCalendar::default();
    let calendar = build_teacher_calendar(&snapshot, &term, &request("t1")).unwrap();
    let text = calendar.to_ics_string();

    assert!(text.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(text.ends_with("END:VCALENDAR\r\n"));
    assert!(text.contains("PRODID:-//Timetable Calendar//EN"));
    assert!(text.contains("VERSION:2.0"));
    assert!(text.contains("CALSCALE:GREGORIAN"));
    assert!(text.contains("X-WR-CALNAME:Timetable - Alice Tan"));
    assert!(text.contains("X-WR-TIMEZONE:Asia/Singapore"));
    assert!(text.contains("DTSTART;TZID=Asia/Singapore:20260105T073000"));
    assert!(text.contains("RRULE:FREQ=WEEKLY;INTERVAL=1;BYDAY=MO;UNTIL=20260331T235959"));
    assert!(text.contains("STATUS:CONFIRMED"));
}

#[test]
fn regenerating_the_export_is_byte_identical() {
    let snapshot = Snapshot::from_xml(FIXTURE).unwrap();
    let term = TermCalendar::default();
    let first = build_teacher_calendar(&snapshot, &term, &request("t1")).unwrap();
    let second = build_teacher_calendar(&snapshot, &term, &request("t1")).unwrap();
    assert_eq!(first.to_ics_string(), second.to_ics_string());
}
