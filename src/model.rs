use serde::{Deserialize, Serialize};

/// Weeksdef id meaning "every week" regardless of the card's own pattern.
pub const EVERY_WEEK_ID: &str = "4CEEF5CAAC1CEE35";
/// Weeksdef id meaning "even week only".
pub const EVEN_WEEK_ID: &str = "F20BB99A3CE4D221";
/// Weeksdef id meaning "odd week only".
pub const ODD_WEEK_ID: &str = "1DE69DF37257B010";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub short: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub short: String,
}

impl Subject {
    /// Home-based-learning subjects are excluded from every resolved view.
    pub fn is_home_based_learning(&self) -> bool {
        self.name.contains("HBL") || self.name.contains("Home Based Learning")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub short: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: String,
    pub name: String,
    pub short: String,
}

/// A teaching period. Keyed by `slot` (1, 2, 3, ...) everywhere; the
/// document's own record id is kept only as `source_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub slot: u32,
    pub source_id: String,
    /// `HH:MM` start time.
    pub start: String,
    /// `HH:MM` end time.
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayDef {
    pub id: String,
    /// Bit-string; position i = '1' means the definition covers day i.
    pub days: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekDef {
    pub id: String,
    pub name: String,
    pub weeks: String,
}

/// A recurring teaching assignment, decoupled from concrete timeslots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub subject_id: String,
    pub teacher_ids: Vec<String>,
    pub class_ids: Vec<String>,
    pub classroom_ids: Vec<String>,
    pub weeks_def_id: String,
    pub days_def_id: String,
}

/// Links a lesson to one (period, day-pattern, week-pattern) placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub lesson_id: String,
    pub period: u32,
    /// Inline day bit-string, same encoding as [`DayDef::days`].
    pub days: String,
    /// Two-character week-pattern code, see [`WeekPattern`].
    pub weeks: String,
    pub classroom_ids: Vec<String>,
}

/// One parsed schedule export. Plain record vectors; all lookup goes
/// through [`crate::Mappings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    pub teachers: Vec<Teacher>,
    pub subjects: Vec<Subject>,
    pub rooms: Vec<Room>,
    pub classes: Vec<SchoolClass>,
    pub periods: Vec<Period>,
    pub days_defs: Vec<DayDef>,
    pub weeks_defs: Vec<WeekDef>,
    pub lessons: Vec<Lesson>,
    pub cards: Vec<Card>,
}

/// Alternating-week parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekType {
    Odd,
    Even,
}

impl WeekType {
    pub fn flip(self) -> Self {
        match self {
            WeekType::Odd => WeekType::Even,
            WeekType::Even => WeekType::Odd,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeekType::Odd => "odd",
            WeekType::Even => "even",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "odd" => Some(WeekType::Odd),
            "even" => Some(WeekType::Even),
            _ => None,
        }
    }
}

/// Which alternating weeks a card applies to.
///
/// Convention (fixed; the source data applied both readings over time):
/// `"11"` = every week, `"10"` = odd week, `"01"` = even week. Anything
/// else degrades to every week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekPattern {
    Every,
    Odd,
    Even,
}

impl WeekPattern {
    pub fn from_code(code: &str) -> Self {
        match code {
            "10" => WeekPattern::Odd,
            "01" => WeekPattern::Even,
            _ => WeekPattern::Every,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            WeekPattern::Every => "11",
            WeekPattern::Odd => "10",
            WeekPattern::Even => "01",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeekPattern::Every => "Every Week",
            WeekPattern::Odd => "Odd Week",
            WeekPattern::Even => "Even Week",
        }
    }

    /// True when a block with this pattern occurs in a week of the given
    /// parity.
    pub fn matches(self, week_type: WeekType) -> bool {
        match self {
            WeekPattern::Every => true,
            WeekPattern::Odd => week_type == WeekType::Odd,
            WeekPattern::Even => week_type == WeekType::Even,
        }
    }

    /// The parity this pattern is bound to, if any.
    pub fn week_type(self) -> Option<WeekType> {
        match self {
            WeekPattern::Every => None,
            WeekPattern::Odd => Some(WeekType::Odd),
            WeekPattern::Even => Some(WeekType::Even),
        }
    }
}

/// Effective week pattern of a card: the lesson's well-known weeksdef id
/// wins over the card's own code.
pub fn effective_pattern(weeks_def_id: &str, card_weeks: &str) -> WeekPattern {
    match weeks_def_id {
        EVERY_WEEK_ID => WeekPattern::Every,
        EVEN_WEEK_ID => WeekPattern::Even,
        ODD_WEEK_ID => WeekPattern::Odd,
        _ => WeekPattern::from_code(card_weeks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_ids_override_card_code() {
        assert_eq!(effective_pattern(EVERY_WEEK_ID, "10"), WeekPattern::Every);
        assert_eq!(effective_pattern(EVEN_WEEK_ID, "10"), WeekPattern::Even);
        assert_eq!(effective_pattern(ODD_WEEK_ID, "01"), WeekPattern::Odd);
    }

    #[test]
    fn unknown_weeksdef_falls_back_to_card_code() {
        assert_eq!(effective_pattern("ABC123", "10"), WeekPattern::Odd);
        assert_eq!(effective_pattern("ABC123", "01"), WeekPattern::Even);
        assert_eq!(effective_pattern("ABC123", "11"), WeekPattern::Every);
        assert_eq!(effective_pattern("ABC123", "xx"), WeekPattern::Every);
    }

    #[test]
    fn hbl_detection_matches_both_spellings() {
        let by_tag = Subject {
            id: "s1".into(),
            name: "Math HBL".into(),
            short: "M".into(),
        };
        let by_name = Subject {
            id: "s2".into(),
            name: "Home Based Learning".into(),
            short: "H".into(),
        };
        let plain = Subject {
            id: "s3".into(),
            name: "Mathematics".into(),
            short: "M".into(),
        };
        assert!(by_tag.is_home_based_learning());
        assert!(by_name.is_home_based_learning());
        assert!(!plain.is_home_based_learning());
    }
}
