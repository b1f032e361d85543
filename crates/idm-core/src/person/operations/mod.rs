//! Person Operations
//!
//! Use cases that create a Person or edit its data entries.

pub mod register;
pub mod merge_data;

pub use register::{RegisterPersonCommand, RegisterPersonUseCase};
pub use merge_data::{MergeDataCommand, MergeDataUseCase};
