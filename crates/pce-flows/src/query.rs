//! Traffic query definitions loaded from the YAML query file.
//!
//! ```yaml
//! traffic_configs:
//!   default:
//!     start_date: "2024-10-01T00:00:00Z"
//!     end_date: "2024-10-02T00:00:00Z"
//!     include_destinations: ["env=prod"]
//!     exclude_sources: ["app=scanner"]
//!     policy_decisions: [allowed, potentially_blocked]
//! ```
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use pce_model::{FilterSet, LabelHref, PolicyDecision, TrafficQuery};

use crate::error::ExportError;
use crate::labels::LabelIndex;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryFile {
    #[serde(default)]
    pub traffic_configs: HashMap<String, TrafficConfig>,
}

impl QueryFile {
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let text = fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
        serde_yaml::from_str(&text).map_err(|source| ExportError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn take(mut self, name: &str) -> Result<TrafficConfig, ExportError> {
        self.traffic_configs
            .remove(name)
            .ok_or_else(|| ExportError::UnknownTrafficConfig(name.to_string()))
    }
}

/// One named traffic query; label filters are `key=value` strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrafficConfig {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub include_sources: Vec<String>,
    #[serde(default)]
    pub include_destinations: Vec<String>,
    #[serde(default)]
    pub exclude_sources: Vec<String>,
    #[serde(default)]
    pub exclude_destinations: Vec<String>,
    /// Decision names as written; checked when the query is built.
    pub policy_decisions: Vec<String>,
}

/// Read `path` and pick the configuration called `name`.
pub fn load_traffic_config(path: &Path, name: &str) -> Result<TrafficConfig, ExportError> {
    QueryFile::load(path)?.take(name)
}

/// Translate a configuration into a query, resolving every filter through `index`.
///
/// A filter that matches no label, or a policy decision that is not one of the known
/// names, fails the whole query rather than silently changing what it selects.
pub fn build_traffic_query(
    config: &TrafficConfig,
    index: &LabelIndex,
    query_name: &str,
) -> Result<TrafficQuery, ExportError> {
    let sources = FilterSet::from_hrefs(
        resolve_all(index, &config.include_sources)?,
        resolve_all(index, &config.exclude_sources)?,
    );
    let destinations = FilterSet::from_hrefs(
        resolve_all(index, &config.include_destinations)?,
        resolve_all(index, &config.exclude_destinations)?,
    );

    let decisions = config
        .policy_decisions
        .iter()
        .map(|name| name.parse::<PolicyDecision>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(ExportError::UnknownPolicyDecision)?;

    Ok(
        TrafficQuery::new(query_name, &config.start_date, &config.end_date)
            .with_sources(sources)
            .with_destinations(destinations)
            .with_policy_decisions(decisions),
    )
}

fn resolve_all(index: &LabelIndex, filters: &[String]) -> Result<Vec<LabelHref>, ExportError> {
    filters
        .iter()
        .map(|filter| {
            if !filter.contains('=') {
                return Err(ExportError::InvalidLabelFilter(filter.clone()));
            }
            let href = index
                .resolve_filter(filter)
                .cloned()
                .ok_or_else(|| ExportError::UnresolvableLabel(filter.clone()))?;
            debug!(%filter, %href, "label filter resolved");
            Ok(href)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pce_model::Label;

    use super::*;

    const YAML: &str = r#"
traffic_configs:
  default:
    start_date: 2024-10-01
    end_date: "2024-10-02T00:00:00Z"
    include_destinations: ["app=billing", "env=prod"]
    exclude_sources: ["app=scanner"]
    policy_decisions: [allowed, potentially_blocked, blocked]
  narrow:
    start_date: "2024-10-01"
    end_date: "2024-10-02"
    include_sources: ["app=nope"]
    policy_decisions: [blocked]
"#;

    fn index() -> LabelIndex {
        LabelIndex::build(vec![
            Label::new("/orgs/1/labels/1", "app", "billing"),
            Label::new("/orgs/1/labels/2", "env", "prod"),
            Label::new("/orgs/1/labels/3", "app", "scanner"),
        ])
    }

    fn parsed() -> QueryFile {
        serde_yaml::from_str(YAML).unwrap()
    }

    #[test]
    fn loads_named_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let cfg = load_traffic_config(file.path(), "default").unwrap();
        assert_eq!(cfg.start_date, "2024-10-01");
        assert_eq!(cfg.include_destinations, vec!["app=billing", "env=prod"]);
        assert!(cfg.include_sources.is_empty());
        assert_eq!(cfg.policy_decisions.len(), 3);

        let err = load_traffic_config(file.path(), "weekly").unwrap_err();
        assert!(matches!(err, ExportError::UnknownTrafficConfig(name) if name == "weekly"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_traffic_config(Path::new("/nonexistent/traffic-config.yaml"), "default")
            .unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }

    #[test]
    fn builds_query_with_resolved_hrefs() {
        let cfg = parsed().take("default").unwrap();
        let query = build_traffic_query(&cfg, &index(), "daily_traffic").unwrap();

        assert_eq!(query.query_name, "daily_traffic");
        assert_eq!(query.end_date, "2024-10-02T00:00:00Z");
        assert_eq!(query.destinations.include.len(), 2);
        assert_eq!(
            query.destinations.include[1][0].label.href,
            LabelHref::new("/orgs/1/labels/2")
        );
        assert_eq!(query.sources.include, vec![Vec::new()]);
        assert_eq!(
            query.sources.exclude[0].label.href,
            LabelHref::new("/orgs/1/labels/3")
        );
        assert_eq!(
            query.policy_decisions,
            vec![
                PolicyDecision::Allowed,
                PolicyDecision::PotentiallyBlocked,
                PolicyDecision::Blocked
            ]
        );
    }

    #[test]
    fn unresolvable_filter_fails() {
        let cfg = parsed().take("narrow").unwrap();
        let err = build_traffic_query(&cfg, &index(), "daily_traffic").unwrap_err();
        assert!(matches!(err, ExportError::UnresolvableLabel(f) if f == "app=nope"));
    }

    #[test]
    fn malformed_filter_fails() {
        let mut cfg = parsed().take("default").unwrap();
        cfg.exclude_destinations = vec!["billing".to_string()];
        let err = build_traffic_query(&cfg, &index(), "daily_traffic").unwrap_err();
        assert!(matches!(err, ExportError::InvalidLabelFilter(f) if f == "billing"));
    }

    #[test]
    fn misspelled_policy_decision_fails() {
        let yaml = r#"
traffic_configs:
  default:
    start_date: "2024-10-01"
    end_date: "2024-10-02"
    policy_decisions: [allowed, alowed]
"#;
        let file: QueryFile = serde_yaml::from_str(yaml).unwrap();
        let cfg = file.take("default").unwrap();

        let err = build_traffic_query(&cfg, &index(), "daily_traffic").unwrap_err();
        assert!(matches!(err, ExportError::UnknownPolicyDecision(d) if d == "alowed"));
    }

    #[test]
    fn explicit_unknown_decision_is_kept() {
        let mut cfg = parsed().take("default").unwrap();
        cfg.policy_decisions = vec!["unknown".to_string()];
        let query = build_traffic_query(&cfg, &index(), "daily_traffic").unwrap();
        assert_eq!(query.policy_decisions, vec![PolicyDecision::Unknown]);
    }
}
