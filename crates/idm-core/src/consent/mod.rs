//! Visibility Consent Manager
//!
//! Per entry, a requestor id is in exactly one of three states: no access,
//! pending request (`visibilityRequests`), or granted (`visibilityList`).
//!
//! ```text
//!            request             grant
//!   none ------------> pending ---------> granted
//!     ^                                      |
//!     +--------------- revoke ---------------+
//! ```
//!
//! Grant is also allowed straight from `none`. Revoke never recreates a
//! pending request.

pub mod visibility;
pub mod operations;

pub use operations::*;
