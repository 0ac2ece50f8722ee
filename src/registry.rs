//! Ordered section registry
//!
//! Owns the ordered section list for one dashboard session. The order is the
//! merge of a persisted id list with the application's default set; stale
//! persisted ids are dropped and newly introduced sections append at the end.

use tracing::debug;

use crate::types::Section;

#[derive(Debug, Clone)]
pub struct SectionRegistry {
    sections: Vec<Section>,
}

impl SectionRegistry {
    /// Merge the default section set with a persisted id order.
    ///
    /// With no persisted order the defaults are used as-is. Otherwise each
    /// persisted id that still matches a default section is appended in the
    /// persisted order, then any remaining defaults follow in their default
    /// relative order. Persisted ids with no matching section are dropped.
    pub fn load(defaults: Vec<Section>, persisted_ids: Option<&[String]>) -> Self {
        let Some(ids) = persisted_ids else {
            return Self { sections: defaults };
        };

        let mut remaining = defaults;
        let mut ordered = Vec::with_capacity(remaining.len());
        for id in ids {
            if let Some(pos) = remaining.iter().position(|s| s.id == *id) {
                ordered.push(remaining.remove(pos));
            } else {
                debug!(id = %id, "Dropping persisted id with no matching section");
            }
        }
        // Sections introduced since the order was saved keep their default
        // relative order at the end of the row.
        ordered.append(&mut remaining);

        Self { sections: ordered }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Current id order, the shape that gets persisted.
    pub fn ids(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.id.clone()).collect()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Relocate `sections[from]` to `to`; returns whether the order changed.
    ///
    /// Remove-then-insert gives "insert-after" semantics when moving forward:
    /// moving index 0 to position 2 places it after the element originally at
    /// index 2, matching drag intuition. Out-of-range indices are a no-op.
    pub fn move_section(&mut self, from: usize, to: usize) -> bool {
        if from >= self.sections.len() || to >= self.sections.len() || from == to {
            return false;
        }
        let section = self.sections.remove(from);
        self.sections.insert(to, section);
        true
    }
}
