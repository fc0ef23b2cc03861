use serde::{Deserialize, Serialize};

/// CRM contact record as submitted by the caller. Every field is optional;
/// the payload builder substitutes a documented fallback for anything
/// missing or empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub title: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// CRM opportunity record. Extra fields the caller sends are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityRecord {
    pub name: Option<String>,
    pub stage: Option<String>,
}

impl ContactRecord {
    /// Display name used in responses and the output file name.
    pub fn display_name(&self) -> &str {
        or_fallback(&self.full_name, "Valued Contact")
    }
}

impl OpportunityRecord {
    pub fn display_name(&self) -> &str {
        or_fallback(&self.name, "Business Opportunity")
    }
}

/// Treats both absent and empty-string fields as missing.
pub fn or_fallback<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => fallback,
    }
}
