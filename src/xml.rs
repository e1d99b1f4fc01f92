use crate::model::{
    Card, DayDef, Lesson, Period, Room, SchoolClass, ScheduleDocument, Subject, Teacher, WeekDef,
};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug)]
pub enum ParseError {
    Xml(quick_xml::Error),
    Attribute(AttrError),
    Encoding(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Xml(err) => write!(f, "invalid XML document: {err}"),
            ParseError::Attribute(err) => write!(f, "invalid XML attribute: {err}"),
            ParseError::Encoding(msg) => write!(f, "invalid attribute encoding: {msg}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<quick_xml::Error> for ParseError {
    fn from(value: quick_xml::Error) -> Self {
        Self::Xml(value)
    }
}

impl From<AttrError> for ParseError {
    fn from(value: AttrError) -> Self {
        Self::Attribute(value)
    }
}

/// Parse a schedule export into a [`ScheduleDocument`].
///
/// A malformed document is a single fatal error; no partial document is
/// returned. Unknown elements are ignored, missing optional attributes
/// default to empty strings.
pub fn parse_document(xml: &str) -> Result<ScheduleDocument, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut document = ScheduleDocument::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(element) | Event::Empty(element) => {
                collect_element(&element, &mut document)?;
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(document)
}

fn collect_element(
    element: &BytesStart<'_>,
    document: &mut ScheduleDocument,
) -> Result<(), ParseError> {
    // Only the record elements carry data; structural wrappers are skipped.
    let name = element.name();
    match name.as_ref() {
        b"teacher" => {
            let attrs = attribute_map(element)?;
            document.teachers.push(Teacher {
                id: field(&attrs, "id"),
                name: field(&attrs, "name"),
                short: field(&attrs, "short"),
            });
        }
        b"subject" => {
            let attrs = attribute_map(element)?;
            document.subjects.push(Subject {
                id: field(&attrs, "id"),
                name: field(&attrs, "name"),
                short: field(&attrs, "short"),
            });
        }
        b"classroom" => {
            let attrs = attribute_map(element)?;
            document.rooms.push(Room {
                id: field(&attrs, "id"),
                name: field(&attrs, "name"),
                short: field(&attrs, "short"),
            });
        }
        b"class" => {
            let attrs = attribute_map(element)?;
            document.classes.push(SchoolClass {
                id: field(&attrs, "id"),
                name: field(&attrs, "name"),
                short: field(&attrs, "short"),
            });
        }
        b"period" => {
            let attrs = attribute_map(element)?;
            // A period without a usable slot number cannot take part in
            // block merging; skip it rather than fail the document.
            if let Ok(slot) = field(&attrs, "period").trim().parse::<u32>() {
                document.periods.push(Period {
                    slot,
                    source_id: field(&attrs, "id"),
                    start: field(&attrs, "starttime"),
                    end: field(&attrs, "endtime"),
                });
            }
        }
        b"daysdef" => {
            let attrs = attribute_map(element)?;
            document.days_defs.push(DayDef {
                id: field(&attrs, "id"),
                days: field(&attrs, "days"),
            });
        }
        b"weeksdef" => {
            let attrs = attribute_map(element)?;
            document.weeks_defs.push(WeekDef {
                id: field(&attrs, "id"),
                name: field(&attrs, "name"),
                weeks: field(&attrs, "weeks"),
            });
        }
        b"lesson" => {
            let attrs = attribute_map(element)?;
            document.lessons.push(Lesson {
                id: field(&attrs, "id"),
                subject_id: field(&attrs, "subjectid"),
                teacher_ids: split_ids(&field(&attrs, "teacherids")),
                class_ids: split_ids(&field(&attrs, "classids")),
                classroom_ids: split_ids(&field(&attrs, "classroomids")),
                weeks_def_id: field(&attrs, "weeksdefid"),
                days_def_id: field(&attrs, "daysdefid"),
            });
        }
        b"card" => {
            let attrs = attribute_map(element)?;
            if let Ok(period) = field(&attrs, "period").trim().parse::<u32>() {
                document.cards.push(Card {
                    lesson_id: field(&attrs, "lessonid"),
                    period,
                    days: field(&attrs, "days"),
                    weeks: field(&attrs, "weeks"),
                    classroom_ids: split_ids(&field(&attrs, "classroomids")),
                });
            }
        }
        _ => {}
    }
    Ok(())
}

fn attribute_map(element: &BytesStart<'_>) -> Result<HashMap<String, String>, ParseError> {
    let mut attrs = HashMap::new();
    for attribute in element.attributes() {
        let attribute = attribute?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|e| ParseError::Encoding(e.to_string()))?
            .to_string();
        let value = attribute
            .unescape_value()
            .map_err(ParseError::Xml)?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn field(attrs: &HashMap<String, String>, key: &str) -> String {
    attrs.get(key).cloned().unwrap_or_default()
}

/// Comma-separated id list; empty segments are dropped.
pub fn split_ids(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
