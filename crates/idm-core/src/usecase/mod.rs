//! Use Case Infrastructure
//!
//! - `UseCaseResult<T>` - sealed result type for mutating use cases
//! - `UseCaseError` - categorized failures (validation, authentication, ...)
//! - `DomainEvent` / `PersonEvent` - what a committed mutation changed
//! - `ExecutionContext` - caller and tracing ids for one command
//! - `UnitOfWork` - whole-aggregate commit to the ledger
//! - `AggregateLocks` - per-owner serialization of read-modify-write cycles

pub mod result;
pub mod error;
pub mod domain_event;
pub mod execution_context;
pub mod locks;
pub mod unit_of_work;

pub use result::UseCaseResult;
pub use error::UseCaseError;
pub use domain_event::{DomainEvent, EventMetadata, PersonChange, PersonEvent};
pub use execution_context::ExecutionContext;
pub use locks::{AggregateGuard, AggregateLocks};
pub use unit_of_work::{LedgerUnitOfWork, UnitOfWork};
