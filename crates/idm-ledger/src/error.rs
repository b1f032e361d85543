use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Ledger backend error: {0}")]
    Backend(String),

    #[error("Invalid ledger key: {0}")]
    InvalidKey(String),

    #[cfg(feature = "sqlite")]
    #[error("SQLite ledger error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_sqlx_error_keeps_source() {
        let err = LedgerError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, LedgerError::Sqlx(sqlx::Error::RowNotFound)));
        assert!(err.source().is_some());
    }
}
