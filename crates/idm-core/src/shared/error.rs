//! Infrastructure Error Types

use thiserror::Error;

use idm_ledger::LedgerError;

use crate::usecase::UseCaseError;

#[derive(Error, Debug)]
pub enum IdmError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Stored record '{key}' could not be decoded: {source}")]
    CorruptRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record '{key}' could not be encoded: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, IdmError>;

impl From<IdmError> for UseCaseError {
    fn from(err: IdmError) -> Self {
        let message = err.to_string();
        let code = match err {
            IdmError::Ledger(_) => "LEDGER_UNAVAILABLE",
            IdmError::CorruptRecord { .. } => "CORRUPT_RECORD",
            IdmError::Encode { .. } => "ENCODE_FAILED",
        };
        UseCaseError::storage(code, message)
    }
}
