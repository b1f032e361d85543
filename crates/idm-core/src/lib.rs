//! IDM Core
//!
//! Per-identity data records whose fields are gated by two independent
//! consent mechanisms:
//! - institutional approval (only the field's approving institution may approve it)
//! - peer visibility consent (a value is disclosed only to parties the owner granted)
//!
//! ## Module Organization
//!
//! - `person` - Person aggregate, identity registry, data entry merger
//! - `approval` - approval workflow and pending-approval queries
//! - `consent` - visibility request/grant/revoke transitions
//! - `projection` - requestor-specific redacted views
//! - `dispatch` - function-name command surface and its HTTP API
//! - `usecase` - error taxonomy, unit of work, execution context

pub mod person;
pub mod approval;
pub mod consent;
pub mod projection;
pub mod auth;
pub mod dispatch;
pub mod shared;
pub mod usecase;

pub use shared::error::{IdmError, Result};

pub use usecase::{
    AggregateLocks, DomainEvent, ExecutionContext, LedgerUnitOfWork, PersonChange, PersonEvent,
    UnitOfWork, UseCaseError, UseCaseResult,
};

pub use person::entity::{DataEntry, Person};
pub use person::repository::PersonRepository;
pub use person::registry::IdentityRegistry;
pub use person::merge::{merge_entries, MergeOutcome};
pub use approval::entity::PendingApproval;
pub use approval::source::{LedgerScanApprovals, PendingApprovalSource};
pub use projection::entity::{SecureDataEntry, SecurePerson};
pub use projection::projector::project;
pub use auth::credential_service::{CredentialService, Secret};
pub use dispatch::chaincode::{IdentityChaincode, QueryPayload};
