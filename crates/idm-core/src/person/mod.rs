//! Person Aggregate
//!
//! Identity records keyed by person id: credential digest plus data entries.

pub mod entity;
pub mod codec;
pub mod repository;
pub mod merge;
pub mod registry;
pub mod operations;

pub use entity::{DataEntry, Person};
pub use codec::{decode_entries, validate_entries};
pub use repository::PersonRepository;
pub use merge::{merge_entries, MergeOutcome};
pub use registry::{GetPersonQuery, IdentityRegistry};
pub use operations::*;
