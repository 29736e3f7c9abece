use serde::{Deserialize, Serialize};

use crate::{LabelHref, LabelRef, PolicyDecision, Service};

/// Body of an async traffic query submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficQuery {
    pub query_name: String,
    pub start_date: String,
    pub end_date: String,
    pub sources: FilterSet,
    pub destinations: FilterSet,
    pub services: ServiceFilter,
    pub policy_decisions: Vec<PolicyDecision>,
    pub sources_destinations_query_op: String,
    pub max_results: u32,
}

impl TrafficQuery {
    pub const DEFAULT_MAX_RESULTS: u32 = 100_000;

    pub fn new(
        query_name: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            query_name: query_name.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            sources: FilterSet::default(),
            destinations: FilterSet::default(),
            services: ServiceFilter::default(),
            policy_decisions: Vec::new(),
            sources_destinations_query_op: "and".to_string(),
            max_results: Self::DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_sources(mut self, sources: FilterSet) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_destinations(mut self, destinations: FilterSet) -> Self {
        self.destinations = destinations;
        self
    }

    pub fn with_policy_decisions(mut self, decisions: Vec<PolicyDecision>) -> Self {
        self.policy_decisions = decisions;
        self
    }
}

/// Include/exclude label filter for one side of a traffic query.
///
/// `include` is a list of groups: a flow matches when it matches every label of
/// any one group. The PCE expects a single empty group when nothing is included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    pub include: Vec<Vec<LabelFilter>>,
    pub exclude: Vec<LabelFilter>,
}

impl FilterSet {
    /// Each included label becomes its own group; excludes stay flat.
    pub fn from_hrefs(
        include: impl IntoIterator<Item = LabelHref>,
        exclude: impl IntoIterator<Item = LabelHref>,
    ) -> Self {
        let mut groups: Vec<Vec<LabelFilter>> = include
            .into_iter()
            .map(|href| vec![LabelFilter::label(href)])
            .collect();
        if groups.is_empty() {
            groups.push(Vec::new());
        }
        Self {
            include: groups,
            exclude: exclude.into_iter().map(LabelFilter::label).collect(),
        }
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::from_hrefs(Vec::new(), Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelFilter {
    pub label: LabelRef,
}

impl LabelFilter {
    pub fn label(href: LabelHref) -> Self {
        Self {
            label: LabelRef::new(href),
        }
    }
}

/// Service filter; entries use the same `proto`/`port` shape as flow services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFilter {
    pub include: Vec<Service>,
    pub exclude: Vec<Service>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_one_empty_group() {
        let json = serde_json::to_value(FilterSet::default()).unwrap();
        assert_eq!(json, serde_json::json!({"include": [[]], "exclude": []}));
    }

    #[test]
    fn query_body_matches_pce_shape() {
        let query = TrafficQuery::new("daily_traffic", "2024-10-01", "2024-10-02")
            .with_sources(FilterSet::from_hrefs(
                vec![LabelHref::new("/orgs/1/labels/1"), LabelHref::new("/orgs/1/labels/2")],
                vec![],
            ))
            .with_destinations(FilterSet::from_hrefs(
                vec![],
                vec![LabelHref::new("/orgs/1/labels/9")],
            ))
            .with_policy_decisions(vec![PolicyDecision::Allowed, PolicyDecision::PotentiallyBlocked]);

        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["query_name"], "daily_traffic");
        assert_eq!(json["max_results"], 100_000);
        assert_eq!(json["sources_destinations_query_op"], "and");
        assert_eq!(
            json["sources"]["include"],
            serde_json::json!([[{"label": {"href": "/orgs/1/labels/1"}}], [{"label": {"href": "/orgs/1/labels/2"}}]])
        );
        assert_eq!(
            json["destinations"]["exclude"],
            serde_json::json!([{"label": {"href": "/orgs/1/labels/9"}}])
        );
        assert_eq!(json["services"], serde_json::json!({"include": [], "exclude": []}));
        assert_eq!(
            json["policy_decisions"],
            serde_json::json!(["allowed", "potentially_blocked"])
        );
    }
}
