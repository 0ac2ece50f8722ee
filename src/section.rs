//! The closed set of dashboard section kinds.
//!
//! The dashboard ships with a fixed panel set; keeping it as an enum avoids
//! string-keyed branching anywhere outside the persistence boundary, where
//! the storage id strings live.

use crate::types::{ContentRef, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Pinned,
    WorkInProgress,
    DocumentSchedule,
}

impl SectionKind {
    /// Default ordering used when no persisted order exists yet.
    pub const DEFAULT_ORDER: [SectionKind; 3] = [
        SectionKind::Pinned,
        SectionKind::WorkInProgress,
        SectionKind::DocumentSchedule,
    ];

    /// Stable id written to the persisted order list.
    pub fn storage_id(self) -> &'static str {
        match self {
            SectionKind::Pinned => "Pinned",
            SectionKind::WorkInProgress => "Work in Progress",
            SectionKind::DocumentSchedule => "Document Schedule",
        }
    }

    /// Display title for the card header.
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Pinned => "Pinned",
            SectionKind::WorkInProgress => "Work in Progress",
            SectionKind::DocumentSchedule => "Document Schedule",
        }
    }

    /// Build the `Section` for this kind with host-supplied content.
    pub fn section(self, content: ContentRef) -> Section {
        Section::new(self.storage_id(), self.title(), content)
    }
}

/// The default section set in default order.
///
/// Content tokens are the kind's position in the default order; hosts that
/// need richer content handles build their own `Section` list instead.
pub fn default_sections() -> Vec<Section> {
    SectionKind::DEFAULT_ORDER
        .iter()
        .enumerate()
        .map(|(i, kind)| kind.section(ContentRef::new(i as u64)))
        .collect()
}
