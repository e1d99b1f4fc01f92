use crate::model::{
    effective_pattern, Card, DayDef, Lesson, Period, Room, SchoolClass, ScheduleDocument, Subject,
    Teacher, WeekDef, WeekPattern,
};
use std::collections::HashMap;

/// Department short codes and their full names.
pub const DEPARTMENTS: &[(&str, &str)] = &[
    ("AA", "Arts Aesthetics"),
    ("AE", "Arts Economics"),
    ("AG", "Arts Geography"),
    ("AH", "Arts History"),
    ("AM", "Arts Music"),
    ("E", "English"),
    ("M", "Mathematics"),
    ("MT", "Mother Tongue Languages"),
    ("PE", "Physical Education"),
    ("PW", "Project Work"),
    ("SB", "Science Biology"),
    ("SC", "Science Chemistry"),
    ("SP", "Science Physics"),
];

/// Id-keyed lookup tables over one [`ScheduleDocument`].
///
/// Rebuilt in full for every document; building twice from the same
/// document yields the same tables. Periods are keyed by slot number,
/// not by the document's record id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mappings {
    pub teachers: HashMap<String, Teacher>,
    pub subjects: HashMap<String, Subject>,
    pub rooms: HashMap<String, Room>,
    pub classes: HashMap<String, SchoolClass>,
    pub periods: HashMap<u32, Period>,
    pub days_defs: HashMap<String, DayDef>,
    pub weeks_defs: HashMap<String, WeekDef>,
}

impl Mappings {
    pub fn from_document(document: &ScheduleDocument) -> Self {
        let mut mappings = Mappings::default();
        for teacher in &document.teachers {
            mappings
                .teachers
                .insert(teacher.id.clone(), teacher.clone());
        }
        for subject in &document.subjects {
            mappings
                .subjects
                .insert(subject.id.clone(), subject.clone());
        }
        for room in &document.rooms {
            mappings.rooms.insert(room.id.clone(), room.clone());
        }
        for class in &document.classes {
            mappings.classes.insert(class.id.clone(), class.clone());
        }
        for period in &document.periods {
            mappings.periods.insert(period.slot, period.clone());
        }
        for day_def in &document.days_defs {
            mappings
                .days_defs
                .insert(day_def.id.clone(), day_def.clone());
        }
        for week_def in &document.weeks_defs {
            mappings
                .weeks_defs
                .insert(week_def.id.clone(), week_def.clone());
        }
        mappings
    }

    pub fn teacher_name(&self, id: &str) -> String {
        self.teachers
            .get(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn subject_name(&self, id: &str) -> String {
        self.subjects
            .get(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn room_name(&self, id: &str) -> String {
        self.rooms
            .get(id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn class_name(&self, id: &str) -> String {
        self.classes
            .get(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// Effective week pattern of one card: the lesson's well-known
    /// weeksdef id wins; otherwise the card's own code, falling back to
    /// the referenced weeksdef record's code when the card carries none.
    pub fn card_pattern(&self, lesson: &Lesson, card: &Card) -> WeekPattern {
        let code = if matches!(card.weeks.as_str(), "11" | "10" | "01") {
            card.weeks.as_str()
        } else {
            self.weeks_defs
                .get(&lesson.weeks_def_id)
                .map(|d| d.weeks.as_str())
                .unwrap_or(card.weeks.as_str())
        };
        effective_pattern(&lesson.weeks_def_id, code)
    }

    /// Teachers sorted by name, optionally filtered to one department.
    /// An unrecognized or unmatched filter falls back to the full list.
    pub fn teachers_sorted(&self, department: Option<&str>) -> Vec<&Teacher> {
        let mut all: Vec<&Teacher> = self.teachers.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(code) = department {
            let filtered: Vec<&Teacher> = all
                .iter()
                .copied()
                .filter(|t| {
                    extract_department_code(&t.short)
                        .is_some_and(|c| c.eq_ignore_ascii_case(code))
                })
                .collect();
            if !filtered.is_empty() {
                return filtered;
            }
        }
        all
    }
}

/// Full department name for a short code.
pub fn department_name(code: &str) -> Option<&'static str> {
    DEPARTMENTS
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Department code embedded in a teacher's short string.
///
/// Tried in order: `[X]`, `{X}`, `(X)`, then a trailing `-X` where X is
/// one to three ASCII letters.
pub fn extract_department_code(short: &str) -> Option<String> {
    for (open, close) in [('[', ']'), ('{', '}'), ('(', ')')] {
        if let Some(start) = short.find(open) {
            if let Some(len) = short[start + 1..].find(close) {
                let code = short[start + 1..start + 1 + len].trim();
                if !code.is_empty() {
                    return Some(code.to_string());
                }
            }
        }
    }
    trailing_dash_code(short)
}

fn trailing_dash_code(short: &str) -> Option<String> {
    let trimmed = short.trim_end();
    let dash = trimmed.rfind('-')?;
    let code = trimmed[dash + 1..].trim_start();
    let valid = (1..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic());
    if valid { Some(code.to_string()) } else { None }
}
