//! Data Entry Merger
//!
//! Incoming entries are matched to existing ones by key. A matched entry takes
//! the new value and loses its approval; everything else about it (approving
//! institution, visibility state) stays. Unmatched entries are appended as
//! supplied.

use super::entity::{DataEntry, Person};

/// Keys touched by a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub added: Vec<String>,
    pub updated: Vec<String>,
}

impl MergeOutcome {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty()
    }
}

/// Merge `incoming` into `person`.
///
/// The batch must already have distinct keys (see
/// [`validate_entries`](super::codec::validate_entries)); a repeated key would
/// be applied twice.
pub fn merge_entries(person: &mut Person, incoming: Vec<DataEntry>) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for entry in incoming {
        match person.entry_mut(&entry.key) {
            Some(existing) => {
                // Any edit needs re-approval, even an identical value.
                existing.value = entry.value;
                existing.approved = false;
                outcome.updated.push(entry.key);
            }
            None => {
                outcome.added.push(entry.key.clone());
                person.data.push(entry);
            }
        }
    }

    outcome
}
