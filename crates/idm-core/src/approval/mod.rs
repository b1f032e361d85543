//! Approval Workflow
//!
//! Institutional approval of data entries, and the per-institution view of
//! entries still waiting for approval.

pub mod entity;
pub mod source;
pub mod operations;

pub use entity::PendingApproval;
pub use source::{LedgerScanApprovals, PendingApprovalSource};
pub use operations::*;
