pub mod calendar;
pub mod compare;
pub mod export;
pub mod ics;
pub mod mappings;
pub mod model;
pub mod resolve;
pub mod snapshot;
pub mod xml;

pub use calendar::{ExcludedDates, TermCalendar};
pub use compare::{build_comparison_grid, ComparisonGrid, GridCell};
pub use ics::{build_teacher_calendar, CalendarError, CalendarRequest, IcsCalendar};
pub use mappings::Mappings;
pub use model::{ScheduleDocument, WeekPattern, WeekType};
pub use resolve::{
    resolve_class_occurrences, resolve_teacher_occurrences, sort_blocks_odd_first, OccurrenceBlock,
};
pub use snapshot::Snapshot;
