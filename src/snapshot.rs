use crate::mappings::Mappings;
use crate::model::ScheduleDocument;
use crate::xml::{parse_document, ParseError};

/// One loaded schedule: the raw document plus its lookup tables, built
/// together. Resolvers and builders borrow a snapshot and never mutate
/// it; reloading means building a fresh snapshot and swapping it in.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub document: ScheduleDocument,
    pub mappings: Mappings,
}

impl Snapshot {
    /// Parse and map in one step. A parse failure yields no snapshot at
    /// all, so a failed reload leaves the previous one untouched.
    pub fn from_xml(xml: &str) -> Result<Self, ParseError> {
        let document = parse_document(xml)?;
        Ok(Self::from_document(document))
    }

    pub fn from_document(document: ScheduleDocument) -> Self {
        let mappings = Mappings::from_document(&document);
        Self { document, mappings }
    }
}
