use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LabelRef;

/// One traffic flow as returned by an async traffic query download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub src: Endpoint,
    pub dst: Endpoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<Service>,
    #[serde(default)]
    pub policy_decision: PolicyDecision,
    #[serde(default)]
    pub num_connections: u64,
}

/// Source or destination side of a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload: Option<Workload>,
}

impl Endpoint {
    /// Name shown in the export.
    ///
    /// The workload hostname when the endpoint is a managed workload that reports
    /// one, the raw address otherwise. A workload reporting an empty hostname
    /// yields an empty name.
    pub fn display_name(&self) -> &str {
        match self.workload.as_ref().and_then(|w| w.hostname.as_deref()) {
            Some(hostname) => hostname,
            None => &self.ip,
        }
    }

    /// Label references carried by the workload, empty for unmanaged endpoints.
    pub fn labels(&self) -> &[LabelRef] {
        self.workload
            .as_ref()
            .map(|w| w.labels.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelRef>,
}

/// Protocol number and optional port of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub proto: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Policy outcome reported for a flow, also used as a query filter.
///
/// Deserialization tolerates values this client does not know; `FromStr` does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyDecision {
    Allowed,
    PotentiallyBlocked,
    Blocked,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PolicyDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyDecision::Allowed => "allowed",
            PolicyDecision::PotentiallyBlocked => "potentially_blocked",
            PolicyDecision::Blocked => "blocked",
            PolicyDecision::Unknown => "unknown",
        }
    }
}

impl FromStr for PolicyDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "allowed" => Ok(PolicyDecision::Allowed),
            "potentially_blocked" => Ok(PolicyDecision::PotentiallyBlocked),
            "blocked" => Ok(PolicyDecision::Blocked),
            "unknown" => Ok(PolicyDecision::Unknown),
            other => Err(other.to_string()),
        }
    }
}
