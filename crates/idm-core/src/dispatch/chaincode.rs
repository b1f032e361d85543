//! Identity Chaincode
//!
//! Routes a function name plus positional string arguments to the matching
//! use case or query. Function names from earlier deployments are accepted
//! as aliases.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use idm_ledger::LedgerStore;

use crate::approval::{
    ApproveEntryCommand, ApproveEntryUseCase, LedgerScanApprovals, ListPendingApprovalsQuery,
    PendingApprovalSource,
};
use crate::auth::Secret;
use crate::consent::{
    GrantAccessCommand, GrantAccessUseCase, RequestAccessCommand, RequestAccessUseCase,
    RevokeAccessCommand, RevokeAccessUseCase,
};
use crate::details;
use crate::person::{
    decode_entries, GetPersonQuery, IdentityRegistry, MergeDataCommand, MergeDataUseCase,
    PersonRepository, RegisterPersonCommand, RegisterPersonUseCase,
};
use crate::projection::ProjectPersonQuery;
use crate::usecase::{
    AggregateLocks, ExecutionContext, LedgerUnitOfWork, PersonEvent, UseCaseError,
};

/// Result of a read-only query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryPayload {
    Json(serde_json::Value),
    /// The requested Person does not exist
    NotFound,
}

impl QueryPayload {
    fn from_value<T: Serialize>(value: &T) -> Result<Self, UseCaseError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| {
                UseCaseError::storage(
                    "ENCODE_FAILED",
                    format!("Failed to encode query result: {}", e),
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Invoke {
    Register,
    MergeData,
    Approve,
    RequestAccess,
    GrantAccess,
    RevokeAccess,
}

impl Invoke {
    fn parse(function: &str) -> Option<Self> {
        match function {
            "register" | "addPerson" => Some(Self::Register),
            "mergeData" | "updateData" => Some(Self::MergeData),
            "approve" => Some(Self::Approve),
            "requestAccess" | "requestPermissionForData" => Some(Self::RequestAccess),
            "grantAccess" | "grantPermissionForData" => Some(Self::GrantAccess),
            "revokeAccess" | "revokePermissionForData" => Some(Self::RevokeAccess),
            _ => None,
        }
    }

    fn params(self) -> &'static [&'static str] {
        match self {
            Self::Register | Self::MergeData => &["id", "secret", "entries"],
            Self::Approve => &["institution", "ownerId", "dataKey"],
            Self::RequestAccess => &["requestorId", "ownerId", "dataKey"],
            Self::GrantAccess | Self::RevokeAccess => &["ownerId", "requestorId", "dataKey"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Query {
    ListPendingApprovals,
    GetPerson,
    GetPersonForRequestor,
}

impl Query {
    fn parse(function: &str) -> Option<Self> {
        match function {
            "listPendingApprovals" | "getPendingApprovalList" => Some(Self::ListPendingApprovals),
            "getPerson" => Some(Self::GetPerson),
            "getPersonForRequestor" => Some(Self::GetPersonForRequestor),
            _ => None,
        }
    }

    fn params(self) -> &'static [&'static str] {
        match self {
            Self::ListPendingApprovals => &["institution"],
            Self::GetPerson => &["id", "secret"],
            Self::GetPersonForRequestor => &["requestorId", "secret", "ownerId"],
        }
    }
}

fn check_arity<'a>(
    function: &str,
    params: &[&str],
    args: &'a [String],
) -> Result<&'a [String], UseCaseError> {
    if args.len() != params.len() {
        return Err(UseCaseError::validation_with_details(
            "INCORRECT_ARGUMENTS",
            format!(
                "Incorrect number of arguments for '{}'. Expecting {}: {}",
                function,
                params.len(),
                params.join(", ")
            ),
            details! { "function" => function, "expected" => params, "received" => args.len() },
        ));
    }
    Ok(args)
}

fn unsupported(function: &str) -> UseCaseError {
    UseCaseError::validation_with_details(
        "UNSUPPORTED_OPERATION",
        format!("Unsupported operation '{}'", function),
        details! { "function" => function },
    )
}

/// All use cases wired over one ledger.
pub struct IdentityChaincode {
    register: RegisterPersonUseCase<LedgerUnitOfWork>,
    merge_data: MergeDataUseCase<LedgerUnitOfWork>,
    approve: ApproveEntryUseCase<LedgerUnitOfWork>,
    request_access: RequestAccessUseCase<LedgerUnitOfWork>,
    grant_access: GrantAccessUseCase<LedgerUnitOfWork>,
    revoke_access: RevokeAccessUseCase<LedgerUnitOfWork>,
    list_pending: ListPendingApprovalsQuery,
    get_person: GetPersonQuery,
    project_person: ProjectPersonQuery,
}

impl IdentityChaincode {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        let person_repo = Arc::new(PersonRepository::new(ledger));
        let approvals = Arc::new(LedgerScanApprovals::new(person_repo.clone()));
        Self::with_approval_source(person_repo, approvals)
    }

    /// Wire the use cases with a custom pending-approval source.
    pub fn with_approval_source(
        person_repo: Arc<PersonRepository>,
        approvals: Arc<dyn PendingApprovalSource>,
    ) -> Self {
        info!(backend = person_repo.backend_name(), "Wiring identity chaincode");
        let locks = AggregateLocks::new();
        let uow = Arc::new(LedgerUnitOfWork::new(person_repo.clone()));
        let registry = IdentityRegistry::new(person_repo.clone());

        Self {
            register: RegisterPersonUseCase::new(person_repo.clone(), locks.clone(), uow.clone()),
            merge_data: MergeDataUseCase::new(registry.clone(), locks.clone(), uow.clone()),
            approve: ApproveEntryUseCase::new(person_repo.clone(), locks.clone(), uow.clone()),
            request_access: RequestAccessUseCase::new(
                person_repo.clone(),
                locks.clone(),
                uow.clone(),
            ),
            grant_access: GrantAccessUseCase::new(person_repo.clone(), locks.clone(), uow.clone()),
            revoke_access: RevokeAccessUseCase::new(person_repo.clone(), locks, uow),
            list_pending: ListPendingApprovalsQuery::new(approvals),
            get_person: GetPersonQuery::new(registry.clone()),
            project_person: ProjectPersonQuery::new(registry, person_repo),
        }
    }

    /// Run a mutating command.
    pub async fn invoke(&self, function: &str, args: &[String]) -> Result<(), UseCaseError> {
        self.invoke_correlated(function, args, None).await.map(|_| ())
    }

    /// Run a mutating command, continuing an upstream correlation id when one
    /// is given. Returns the committed event.
    pub async fn invoke_correlated(
        &self,
        function: &str,
        args: &[String],
        correlation_id: Option<&str>,
    ) -> Result<PersonEvent, UseCaseError> {
        let op = Invoke::parse(function).ok_or_else(|| unsupported(function))?;
        let args = check_arity(function, op.params(), args)?;
        debug!(function, correlation_id, "Invoke");

        let ctx = match correlation_id {
            Some(correlation_id) => ExecutionContext::with_correlation(&args[0], correlation_id),
            None => ExecutionContext::create(&args[0]),
        };

        let result = match op {
            Invoke::Register => {
                let data = decode_entries(&args[2])?;
                let command = RegisterPersonCommand {
                    person_id: args[0].clone(),
                    secret: Secret::new(args[1].as_str()),
                    data,
                };
                self.register.execute(command, ctx).await
            }
            Invoke::MergeData => {
                let data = decode_entries(&args[2])?;
                let command = MergeDataCommand {
                    person_id: args[0].clone(),
                    secret: Secret::new(args[1].as_str()),
                    data,
                };
                self.merge_data.execute(command, ctx).await
            }
            Invoke::Approve => {
                let command = ApproveEntryCommand {
                    institution: args[0].clone(),
                    owner_id: args[1].clone(),
                    data_key: args[2].clone(),
                };
                self.approve.execute(command, ctx).await
            }
            Invoke::RequestAccess => {
                let command = RequestAccessCommand {
                    requestor_id: args[0].clone(),
                    owner_id: args[1].clone(),
                    data_key: args[2].clone(),
                };
                self.request_access.execute(command, ctx).await
            }
            Invoke::GrantAccess => {
                let command = GrantAccessCommand {
                    owner_id: args[0].clone(),
                    requestor_id: args[1].clone(),
                    data_key: args[2].clone(),
                };
                self.grant_access.execute(command, ctx).await
            }
            Invoke::RevokeAccess => {
                let command = RevokeAccessCommand {
                    owner_id: args[0].clone(),
                    requestor_id: args[1].clone(),
                    data_key: args[2].clone(),
                };
                self.revoke_access.execute(command, ctx).await
            }
        };

        result.into_result()
    }

    /// Run a read-only query.
    pub async fn query(
        &self,
        function: &str,
        args: &[String],
    ) -> Result<QueryPayload, UseCaseError> {
        let op = Query::parse(function).ok_or_else(|| unsupported(function))?;
        let args = check_arity(function, op.params(), args)?;
        debug!(function, "Query");

        match op {
            Query::ListPendingApprovals => {
                let pending = self.list_pending.execute(&args[0]).await?;
                QueryPayload::from_value(&pending)
            }
            Query::GetPerson => {
                let secret = Secret::new(args[1].as_str());
                match self.get_person.execute(&args[0], &secret).await? {
                    Some(person) => QueryPayload::from_value(&person),
                    None => Ok(QueryPayload::NotFound),
                }
            }
            Query::GetPersonForRequestor => {
                let secret = Secret::new(args[1].as_str());
                match self.project_person.execute(&args[0], &secret, &args[2]).await? {
                    Some(view) => QueryPayload::from_value(&view),
                    None => Ok(QueryPayload::NotFound),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::DomainEvent;
    use idm_ledger::MemoryLedger;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn chaincode() -> IdentityChaincode {
        IdentityChaincode::new(Arc::new(MemoryLedger::new()))
    }

    #[tokio::test]
    async fn test_arity_and_unknown_function() {
        let cc = chaincode();

        let err = cc.invoke("register", &args(&["alice", "pw1"])).await.unwrap_err();
        assert_eq!(err.code(), "INCORRECT_ARGUMENTS");
        assert!(err.message().contains("id, secret, entries"));

        let err = cc.invoke("approve", &args(&["alice", "dob"])).await.unwrap_err();
        assert_eq!(err.code(), "INCORRECT_ARGUMENTS");

        let err = cc.invoke("deletePerson", &args(&["alice"])).await.unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_OPERATION");

        let err = cc.query("getPerson", &[]).await.unwrap_err();
        assert_eq!(err.code(), "INCORRECT_ARGUMENTS");

        // queries are not invokable and the other way round
        let err = cc.invoke("getPerson", &args(&["alice", "pw1"])).await.unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_OPERATION");
        let err = cc.query("register", &args(&["a", "b", "[]"])).await.unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_OPERATION");
    }

    #[tokio::test]
    async fn test_malformed_entries_payload() {
        let cc = chaincode();
        let err = cc
            .invoke("register", &args(&["alice", "pw1", "{not json"]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "MALFORMED_ENTRIES");
        assert_eq!(
            cc.query("getPerson", &args(&["alice", "pw1"])).await.unwrap(),
            QueryPayload::NotFound
        );
    }

    #[tokio::test]
    async fn test_legacy_aliases() {
        let cc = chaincode();
        cc.invoke(
            "addPerson",
            &args(&[
                "alice",
                "pw1",
                r#"[{"key":"dob","value":"2000","approvingInstitution":"bank1"}]"#,
            ]),
        )
        .await
        .unwrap();
        cc.invoke("addPerson", &args(&["bob", "pw2", "null"])).await.unwrap();
        cc.invoke("requestPermissionForData", &args(&["bob", "alice", "dob"]))
            .await
            .unwrap();
        cc.invoke("grantPermissionForData", &args(&["alice", "bob", "dob"]))
            .await
            .unwrap();

        let QueryPayload::Json(view) = cc
            .query("getPersonForRequestor", &args(&["bob", "pw2", "alice"]))
            .await
            .unwrap()
        else {
            panic!("expected a projection");
        };
        assert_eq!(view["data"][0]["value"], "2000");
        assert_eq!(view["data"][0]["requestSent"], false);

        cc.invoke("revokePermissionForData", &args(&["alice", "bob", "dob"]))
            .await
            .unwrap();
        cc.invoke("updateData", &args(&["alice", "pw1", r#"[{"key":"dob","value":"2001"}]"#]))
            .await
            .unwrap();

        let QueryPayload::Json(pending) = cc
            .query("getPendingApprovalList", &args(&["bank1"]))
            .await
            .unwrap()
        else {
            panic!("expected a list");
        };
        assert_eq!(pending[0]["id"], "alice");
        assert_eq!(pending[0]["data"]["value"], "2001");
        assert!(pending[0]["data"]["visibilityList"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_correlation_id_reaches_event() {
        let cc = chaincode();

        let event = cc
            .invoke_correlated("register", &args(&["alice", "pw1", "[]"]), Some("corr-123"))
            .await
            .unwrap();
        assert_eq!(event.correlation_id(), "corr-123");
        assert_eq!(event.principal_id(), "alice");

        let event = cc
            .invoke_correlated("register", &args(&["bob", "pw2", "[]"]), None)
            .await
            .unwrap();
        assert!(event.correlation_id().starts_with("exec-"));
    }
}
