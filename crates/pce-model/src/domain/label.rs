use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder substituted for a label key a workload does not carry.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Opaque server-side label reference, e.g. `/orgs/1/labels/42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelHref(String);

impl LabelHref {
    pub fn new(href: impl Into<String>) -> Self {
        Self(href.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LabelHref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LabelHref {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A key/value tag as stored on the PCE.
///
/// Fetched once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub href: LabelHref,
    pub key: String,
    pub value: String,
}

impl Label {
    pub fn new(href: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            href: LabelHref::new(href),
            key: key.into(),
            value: value.into(),
        }
    }

    /// The `key=value` form used by query filters.
    pub fn composite(&self) -> String {
        format!("{}={}", self.key, self.value)
    }
}

/// Value-only view of a label record.
///
/// Used where only the value is exported; records without a value do not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelValue {
    pub value: String,
}

/// Reference to a label embedded in other resources (workloads, query filters).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRef {
    pub href: LabelHref,
}

impl LabelRef {
    pub fn new(href: LabelHref) -> Self {
        Self { href }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_joins_key_and_value() {
        let label = Label::new("/orgs/1/labels/7", "app", "billing");
        assert_eq!(label.composite(), "app=billing");
    }

    #[test]
    fn label_parses_from_pce_json() {
        let json = r#"{"href":"/orgs/1/labels/7","key":"env","value":"prod","created_by":{"href":"/users/0"}}"#;
        let label: Label = serde_json::from_str(json).unwrap();
        assert_eq!(label.href.as_str(), "/orgs/1/labels/7");
        assert_eq!(label.key, "env");
        assert_eq!(label.value, "prod");
    }

    #[test]
    fn label_value_requires_value() {
        assert!(serde_json::from_str::<LabelValue>(r#"{"href":"/orgs/1/labels/7"}"#).is_err());
        let v: LabelValue = serde_json::from_str(r#"{"value":"crm"}"#).unwrap();
        assert_eq!(v.value, "crm");
    }
}
