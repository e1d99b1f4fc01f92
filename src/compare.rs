use crate::mappings::Mappings;
use crate::model::WeekType;
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};

/// One occupied grid cell: what a teacher is doing at one time slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub subject: String,
    pub classes: String,
    pub room: String,
}

/// Side-by-side availability of several teachers for one day and week
/// parity. Rows are the canonical half-hour slots, columns the teachers
/// in request order; `None` means free.
#[derive(Debug, Clone)]
pub struct ComparisonGrid {
    pub time_slots: Vec<String>,
    pub teachers: Vec<String>,
    pub cells: Vec<Vec<Option<GridCell>>>,
}

/// Half-hour slots from 7:30 through 18:00, without leading zeros.
pub fn canonical_time_slots() -> Vec<String> {
    let mut slots = Vec::new();
    let mut hour = 7u32;
    let mut minute = 30u32;
    loop {
        slots.push(format!("{hour}:{minute:02}"));
        if hour == 18 && minute == 0 {
            break;
        }
        minute += 30;
        if minute == 60 {
            minute = 0;
            hour += 1;
        }
    }
    slots
}

fn normalize_time(time: &str) -> &str {
    time.trim().strip_prefix('0').unwrap_or(time.trim())
}

/// Slot number of the period starting at `time`, tolerating a missing
/// leading zero on either side.
pub fn period_slot_for_time(mappings: &Mappings, time: &str) -> Option<u32> {
    let wanted = normalize_time(time);
    mappings
        .periods
        .values()
        .find(|p| normalize_time(&p.start) == wanted)
        .map(|p| p.slot)
}

/// Each teacher is resolved independently through the same card-matching
/// rule as single-teacher resolution.
pub fn build_comparison_grid(
    snapshot: &Snapshot,
    teacher_ids: &[String],
    day: usize,
    week_type: WeekType,
) -> ComparisonGrid {
    let time_slots = canonical_time_slots();
    let teachers = teacher_ids
        .iter()
        .map(|id| snapshot.mappings.teacher_name(id))
        .collect();

    let mut cells = Vec::with_capacity(time_slots.len());
    for time in &time_slots {
        let slot = period_slot_for_time(&snapshot.mappings, time);
        let row = teacher_ids
            .iter()
            .map(|teacher_id| {
                slot.and_then(|s| find_lesson_at(snapshot, teacher_id, day, s, week_type))
            })
            .collect();
        cells.push(row);
    }

    ComparisonGrid {
        time_slots,
        teachers,
        cells,
    }
}

/// First lesson of the teacher with a card at this (day, slot) whose
/// effective week pattern covers the requested parity. Home-based
/// learning is skipped.
fn find_lesson_at(
    snapshot: &Snapshot,
    teacher_id: &str,
    day: usize,
    slot: u32,
    week_type: WeekType,
) -> Option<GridCell> {
    let document = &snapshot.document;
    let mappings = &snapshot.mappings;

    for card in document.cards.iter().filter(|c| c.period == slot) {
        if card.days.chars().nth(day) != Some('1') {
            continue;
        }
        let Some(lesson) = document.lessons.iter().find(|l| l.id == card.lesson_id) else {
            continue;
        };
        if !lesson.teacher_ids.iter().any(|id| id == teacher_id) {
            continue;
        }
        let subject = mappings.subjects.get(&lesson.subject_id);
        if subject.is_some_and(|s| s.is_home_based_learning()) {
            continue;
        }
        if !mappings.card_pattern(lesson, card).matches(week_type) {
            continue;
        }

        let room_ids = if card.classroom_ids.is_empty() {
            &lesson.classroom_ids
        } else {
            &card.classroom_ids
        };
        return Some(GridCell {
            subject: subject
                .map(|s| s.name.clone())
                .unwrap_or_else(|| "Unknown Subject".to_string()),
            classes: grid_class_display(&lesson.class_ids, mappings),
            room: room_ids
                .first()
                .map(|id| mappings.room_name(id))
                .unwrap_or_else(|| "Unknown Room".to_string()),
        });
    }
    None
}

// The grid collapses earlier than the timetable rows: past two classes.
fn grid_class_display(class_ids: &[String], mappings: &Mappings) -> String {
    if class_ids.len() > 2 {
        return "Multiple Classes".to_string();
    }
    class_ids
        .iter()
        .map(|id| mappings.class_name(id))
        .collect::<Vec<_>>()
        .join(", ")
}
