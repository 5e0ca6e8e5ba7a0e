//! # Issuance Requests
//!
//! Two accepted shapes:
//!
//! ```json
//! { "metadata": { "name": "…", "attributes": [ … ] } }
//! { "fullname": "…", "institution": "…", "program": "…",
//!   "activity": "…", "category": "…", "issuedAt": "…" }
//! ```
//!
//! A structured record passes through unchanged. Flat fields are mapped
//! onto the fixed attribute schema below. Either shape may add `subject`
//! (address of the credential holder) and `categoryCode` (0..=255).

use crate::config::IssueDefaults;
use crate::errors::PipelineError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{parse_address, Address, Attribute, MetadataRecord};

/// Flat fields in the order they are checked, with their attribute labels.
pub const LEGACY_FIELDS: [(&str, &str); 6] = [
    ("fullname", "Full Name"),
    ("institution", "Institution"),
    ("program", "Program"),
    ("activity", "Activity"),
    ("category", "Category"),
    ("issuedAt", "Issued At"),
];

/// Caller-supplied issuance input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    /// Already structured record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<Value>,
    /// Overrides the default record name for flat requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_name: Option<String>,
    /// Overrides the default record description for flat requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_description: Option<String>,
    /// Credential holder; defaults to the positional subject role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// On-chain category code; defaults to the configured code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_code: Option<u64>,
}

/// Normalized issuance input.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedIssue {
    pub metadata: MetadataRecord,
    /// Explicit subject, if the caller gave one.
    pub subject: Option<Address>,
    pub category_code: u8,
}

/// Falsy values count as missing: absent, null, empty string, false, zero.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    })
}

impl IssueRequest {
    fn legacy_value(&self, field: &str) -> Option<&Value> {
        let value = match field {
            "fullname" => self.fullname.as_ref(),
            "institution" => self.institution.as_ref(),
            "program" => self.program.as_ref(),
            "activity" => self.activity.as_ref(),
            "category" => self.category.as_ref(),
            "issuedAt" => self.issued_at.as_ref(),
            _ => None,
        };
        present(value)
    }

    /// Validates the request and builds the record to publish.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Validation`] naming the first missing flat field,
    /// [`PipelineError::InvalidField`] for an unusable subject or code.
    pub fn normalize(&self, defaults: &IssueDefaults) -> Result<NormalizedIssue, PipelineError> {
        let metadata = match self.metadata.as_ref().and_then(MetadataRecord::from_structured) {
            Some(record) => record,
            None => self.legacy_record(defaults)?,
        };

        let subject = match self.subject.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(
                parse_address(text)
                    .ok_or_else(|| PipelineError::invalid("subject", "not a 20-byte hex address"))?,
            ),
        };

        let category_code = match self.category_code {
            None => defaults.category_code,
            Some(code) => u8::try_from(code)
                .map_err(|_| PipelineError::invalid("categoryCode", "must be between 0 and 255"))?,
        };

        Ok(NormalizedIssue {
            metadata,
            subject,
            category_code,
        })
    }

    fn legacy_record(&self, defaults: &IssueDefaults) -> Result<MetadataRecord, PipelineError> {
        let mut attributes = Vec::with_capacity(LEGACY_FIELDS.len());
        for (field, label) in LEGACY_FIELDS {
            let value = self.legacy_value(field).ok_or_else(|| PipelineError::Validation {
                field: field.to_string(),
            })?;
            attributes.push(Attribute {
                trait_type: label.to_string(),
                value: value.clone(),
            });
        }

        let name = self
            .metadata_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.name.as_str());
        let description = self
            .metadata_description
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.description.as_str());

        Ok(MetadataRecord::new(name, description, attributes))
    }
}
