//! Cross-subsystem scenarios over the in-memory ledger node.

pub mod gateway;
pub mod issuance;
pub mod submission;
pub mod verification;

#[cfg(test)]
pub(crate) mod fixtures {
    use cc_02_transaction_submission::testing::InMemoryLedger;
    use cc_04_certificate_pipeline::domain::request::IssueRequest;
    use serde_json::json;

    /// A node with the contract already deployed.
    pub fn deployed_ledger() -> InMemoryLedger {
        InMemoryLedger::new().with_contract(InMemoryLedger::CONTRACT)
    }

    /// The flat request used throughout the scenarios.
    pub fn flat_request(fullname: &str) -> IssueRequest {
        serde_json::from_value(json!({
            "fullname": fullname,
            "institution": "B",
            "program": "C",
            "activity": "D",
            "category": "E",
            "issuedAt": "2026-01-01"
        }))
        .unwrap()
    }
}
