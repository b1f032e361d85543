//! Consent Operations
//!
//! Request, grant and revoke each touch one entry of one owner. An unknown
//! owner or key is a not-found error.

mod transition;
pub mod request;
pub mod grant;
pub mod revoke;

pub use request::{RequestAccessCommand, RequestAccessUseCase};
pub use grant::{GrantAccessCommand, GrantAccessUseCase};
pub use revoke::{RevokeAccessCommand, RevokeAccessUseCase};
