use super::ExportResult;
use crate::ics::IcsCalendar;
use crate::mappings::Mappings;
use crate::resolve::OccurrenceBlock;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// One resolved block flattened for CSV/JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceRow {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub subject: String,
    pub classes: String,
    pub room: String,
    pub week: String,
}

impl OccurrenceRow {
    pub fn from_block(block: &OccurrenceBlock, mappings: &Mappings) -> Self {
        Self {
            day: block.day_name().to_string(),
            start_time: block.start_time(mappings),
            end_time: block.end_time(mappings),
            subject: block.subject.clone(),
            classes: block.classes.clone(),
            room: block.room.clone(),
            week: block.week_label().to_string(),
        }
    }
}

pub fn save_occurrences_to_csv<P: AsRef<Path>>(
    path: P,
    blocks: &[OccurrenceBlock],
    mappings: &Mappings,
) -> ExportResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for block in blocks {
        writer.serialize(OccurrenceRow::from_block(block, mappings))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_occurrences_from_csv<P: AsRef<Path>>(path: P) -> ExportResult<Vec<OccurrenceRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

pub fn save_occurrences_to_json<P: AsRef<Path>>(
    path: P,
    blocks: &[OccurrenceBlock],
    mappings: &Mappings,
) -> ExportResult<()> {
    let rows: Vec<OccurrenceRow> = blocks
        .iter()
        .map(|b| OccurrenceRow::from_block(b, mappings))
        .collect();
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &rows)?;
    Ok(())
}

pub fn load_occurrences_from_json<P: AsRef<Path>>(path: P) -> ExportResult<Vec<OccurrenceRow>> {
    let file = File::open(path)?;
    let rows = serde_json::from_reader(file)?;
    Ok(rows)
}

pub fn save_calendar_to_ics<P: AsRef<Path>>(path: P, calendar: &IcsCalendar) -> ExportResult<()> {
    std::fs::write(path, calendar.to_ics_string())?;
    Ok(())
}

/// Default export filename for a teacher: the short code with bracket
/// characters dropped.
pub fn ics_file_name(teacher_short: &str) -> String {
    let cleaned: String = teacher_short
        .chars()
        .filter(|c| *c != '[' && *c != ']')
        .collect();
    format!("timetable_{}.ics", cleaned.trim())
}
