use crate::mappings::Mappings;
use crate::model::{Card, Lesson, WeekPattern, WeekType};
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DAY_NAMES: &[&str] = &["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// One merged run of contiguous periods for a lesson on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceBlock {
    pub lesson_id: String,
    /// 0 = Monday.
    pub day: usize,
    pub start_period: u32,
    pub end_period: u32,
    pub pattern: WeekPattern,
    pub subject: String,
    pub classes: String,
    pub teachers: String,
    pub room: String,
    pub room_ids: Vec<String>,
}

impl OccurrenceBlock {
    pub fn day_name(&self) -> &'static str {
        DAY_NAMES.get(self.day).copied().unwrap_or("Unknown")
    }

    pub fn week_label(&self) -> &'static str {
        self.pattern.label()
    }

    /// Clock start of the first period, `07:30` when the slot is not in
    /// the period table.
    pub fn start_time(&self, mappings: &Mappings) -> String {
        mappings
            .periods
            .get(&self.start_period)
            .map(|p| p.start.clone())
            .unwrap_or_else(|| "07:30".to_string())
    }

    /// Clock end of the last period, `08:00` when the slot is not in the
    /// period table.
    pub fn end_time(&self, mappings: &Mappings) -> String {
        mappings
            .periods
            .get(&self.end_period)
            .map(|p| p.end.clone())
            .unwrap_or_else(|| "08:00".to_string())
    }
}

/// Room list for display. Collapses past two rooms.
pub fn room_display(room_ids: &[String], mappings: &Mappings) -> String {
    if room_ids.is_empty() {
        return "Unknown".to_string();
    }
    if room_ids.len() > 2 {
        return "Multiple Venues".to_string();
    }
    room_ids
        .iter()
        .map(|id| mappings.room_name(id))
        .collect::<Vec<_>>()
        .join(" & ")
}

/// Class list for display. Collapses past three classes.
pub fn class_display(class_ids: &[String], mappings: &Mappings) -> String {
    if class_ids.is_empty() {
        return "Unknown".to_string();
    }
    if class_ids.len() > 3 {
        return "Multiple Classes".to_string();
    }
    class_ids
        .iter()
        .map(|id| mappings.class_name(id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Teacher short codes for display. Collapses past four teachers.
pub fn teacher_display(teacher_ids: &[String], mappings: &Mappings) -> String {
    if teacher_ids.is_empty() {
        return "Unknown".to_string();
    }
    if teacher_ids.len() > 4 {
        return "Multiple Teachers".to_string();
    }
    teacher_ids
        .iter()
        .map(|id| {
            mappings
                .teachers
                .get(id)
                .map(|t| t.short.clone())
                .unwrap_or_else(|| "Unknown".to_string())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// All merged blocks for one teacher, sorted by (day, start slot).
///
/// Home-based-learning lessons are dropped. With a week-type filter,
/// "every week" blocks plus blocks of the requested parity survive.
pub fn resolve_teacher_occurrences(
    snapshot: &Snapshot,
    teacher_id: &str,
    week_type: Option<WeekType>,
) -> Vec<OccurrenceBlock> {
    resolve_occurrences(snapshot, week_type, View::Teacher, |lesson| {
        lesson.teacher_ids.iter().any(|id| id == teacher_id)
    })
}

/// All merged blocks for one class. Grouping ignores the room, so a
/// lesson moving rooms mid-run still merges into one block.
pub fn resolve_class_occurrences(
    snapshot: &Snapshot,
    class_id: &str,
    week_type: Option<WeekType>,
) -> Vec<OccurrenceBlock> {
    resolve_occurrences(snapshot, week_type, View::Class, |lesson| {
        lesson.class_ids.iter().any(|id| id == class_id)
    })
}

#[derive(Clone, Copy, PartialEq)]
enum View {
    Teacher,
    Class,
}

struct Run {
    start: u32,
    end: u32,
    room_ids: Vec<String>,
}

fn resolve_occurrences(
    snapshot: &Snapshot,
    week_type: Option<WeekType>,
    view: View,
    belongs: impl Fn(&Lesson) -> bool,
) -> Vec<OccurrenceBlock> {
    let document = &snapshot.document;
    let mappings = &snapshot.mappings;

    let mut blocks = Vec::new();
    for lesson in document.lessons.iter().filter(|l| belongs(l)) {
        let subject = mappings.subjects.get(&lesson.subject_id);
        if subject.is_some_and(|s| s.is_home_based_learning()) {
            continue;
        }
        let subject_name = subject
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let mut cards: Vec<&Card> = document
            .cards
            .iter()
            .filter(|c| c.lesson_id == lesson.id)
            .collect();
        cards.sort_by_key(|c| c.period);

        // Contiguous runs per (day, pattern[, room]) key; ascending slot
        // order makes the end+1 extension sufficient.
        let mut runs: HashMap<(usize, WeekPattern, String), Vec<Run>> = HashMap::new();
        for card in cards {
            let pattern = mappings.card_pattern(lesson, card);
            if let Some(wt) = week_type {
                if !pattern.matches(wt) {
                    continue;
                }
            }
            let room_ids = if card.classroom_ids.is_empty() {
                lesson.classroom_ids.clone()
            } else {
                card.classroom_ids.clone()
            };
            let room = room_display(&room_ids, mappings);
            for (day, bit) in card.days.chars().enumerate() {
                if bit != '1' {
                    continue;
                }
                let key = match view {
                    View::Teacher => (day, pattern, room.clone()),
                    View::Class => (day, pattern, String::new()),
                };
                let entry = runs.entry(key).or_default();
                let covered = match entry.last_mut() {
                    Some(run) if card.period == run.end + 1 => {
                        run.end = card.period;
                        true
                    }
                    Some(run) if card.period <= run.end => true,
                    _ => false,
                };
                if !covered {
                    entry.push(Run {
                        start: card.period,
                        end: card.period,
                        room_ids: room_ids.clone(),
                    });
                }
            }
        }

        for ((day, pattern, room), lesson_runs) in runs {
            for run in lesson_runs {
                let room = if room.is_empty() {
                    room_display(&run.room_ids, mappings)
                } else {
                    room.clone()
                };
                blocks.push(OccurrenceBlock {
                    lesson_id: lesson.id.clone(),
                    day,
                    start_period: run.start,
                    end_period: run.end,
                    pattern,
                    subject: subject_name.clone(),
                    classes: class_display(&lesson.class_ids, mappings),
                    teachers: teacher_display(&lesson.teacher_ids, mappings),
                    room,
                    room_ids: run.room_ids,
                });
            }
        }
    }

    blocks.sort_by(|a, b| {
        (a.day, a.start_period, parity_rank(a.pattern), &a.lesson_id)
            .cmp(&(b.day, b.start_period, parity_rank(b.pattern), &b.lesson_id))
    });
    blocks
}

fn parity_rank(pattern: WeekPattern) -> u8 {
    match pattern {
        WeekPattern::Odd => 0,
        WeekPattern::Every => 1,
        WeekPattern::Even => 2,
    }
}

/// Odd-week blocks first, then day, then start slot.
pub fn sort_blocks_odd_first(blocks: &mut [OccurrenceBlock]) {
    blocks.sort_by_key(|b| (parity_rank(b.pattern), b.day, b.start_period));
}
