//! Element catalog: the set of distinct element type names a process declares.

use std::collections::BTreeSet;

use crate::parse::types::ElementRecord;

/// Entries are keyed by their `type` name only. Two records sharing a name
/// collapse into one, so element type names act as global identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementCatalog {
    names: BTreeSet<String>,
}

impl ElementCatalog {
    pub fn from_records(records: &[ElementRecord]) -> Self {
        ElementCatalog {
            names: records
                .iter()
                .filter_map(|record| record.element_type.clone())
                .collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}
