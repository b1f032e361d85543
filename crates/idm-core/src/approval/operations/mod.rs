//! Approval Operations

pub mod approve;
pub mod list_pending;

pub use approve::{ApproveEntryCommand, ApproveEntryUseCase};
pub use list_pending::ListPendingApprovalsQuery;
