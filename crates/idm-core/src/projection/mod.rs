//! Secure Projector
//!
//! Requestor-specific views of another Person's record.

pub mod entity;
pub mod projector;

pub use entity::{SecureDataEntry, SecurePerson};
pub use projector::{project, ProjectPersonQuery};
