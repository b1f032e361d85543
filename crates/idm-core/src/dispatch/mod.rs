//! Command Dispatch
//!
//! The function-name command surface (`invoke` for mutations, `query` for
//! reads) and its HTTP API.

pub mod chaincode;
pub mod api;

pub use chaincode::{IdentityChaincode, QueryPayload};
pub use api::{chaincode_router, ChaincodeRequest, ChaincodeState, CORRELATION_HEADER};
