//! Use Case Result Type
//!
//! Success can only be created through the unit of work, so every successful
//! mutation has written its aggregate and produced a domain event.

use super::error::UseCaseError;

/// Result type for mutating use cases.
///
/// ```ignore
/// if entry.approving_institution != command.institution {
///     return UseCaseResult::failure(UseCaseError::authorization("INSTITUTION_MISMATCH", "..."));
/// }
/// self.unit_of_work.commit(&person, event).await
/// ```
pub enum UseCaseResult<T> {
    Success(T),
    Failure(UseCaseError),
}

impl<T> UseCaseResult<T> {
    pub fn failure(error: UseCaseError) -> Self {
        UseCaseResult::Failure(error)
    }

    /// Only the unit of work creates successes.
    pub(crate) fn success(value: T) -> Self {
        UseCaseResult::Success(value)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UseCaseResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, UseCaseResult::Failure(_))
    }

    /// Get the success value, consuming self.
    pub fn unwrap(self) -> T {
        match self {
            UseCaseResult::Success(v) => v,
            UseCaseResult::Failure(e) => panic!("Called unwrap on a Failure: {}", e),
        }
    }

    /// Get the error, consuming self.
    pub fn unwrap_err(self) -> UseCaseError {
        match self {
            UseCaseResult::Success(_) => panic!("Called unwrap_err on a Success"),
            UseCaseResult::Failure(e) => e,
        }
    }

    pub fn map<U, F>(self, f: F) -> UseCaseResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            UseCaseResult::Success(v) => UseCaseResult::Success(f(v)),
            UseCaseResult::Failure(e) => UseCaseResult::Failure(e),
        }
    }

    pub fn into_result(self) -> Result<T, UseCaseError> {
        match self {
            UseCaseResult::Success(v) => Ok(v),
            UseCaseResult::Failure(e) => Err(e),
        }
    }
}

impl<T> From<UseCaseResult<T>> for Result<T, UseCaseError> {
    fn from(result: UseCaseResult<T>) -> Self {
        result.into_result()
    }
}

impl<T> From<UseCaseError> for UseCaseResult<T> {
    fn from(error: UseCaseError) -> Self {
        UseCaseResult::Failure(error)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for UseCaseResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UseCaseResult::Success(v) => f.debug_tuple("Success").field(v).finish(),
            UseCaseResult::Failure(e) => f.debug_tuple("Failure").field(e).finish(),
        }
    }
}
