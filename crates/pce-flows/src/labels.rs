//! Two-way mapping between label hrefs and `key=value` pairs.
//!
//! The index is a snapshot: it is built once per run from a single label fetch and reused
//! for both query construction and flow resolution. Label hrefs are assumed stable for
//! the lifetime of the run.
use std::collections::HashMap;

use tracing::{debug, warn};

use pce_model::{Label, LabelHref, LabelRef, UNKNOWN_LABEL};

#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    by_href: HashMap<LabelHref, Label>,
    by_composite: HashMap<String, LabelHref>,
}

impl LabelIndex {
    /// Build both directions in one pass.
    ///
    /// A repeated `key=value` resolves to the last href seen; earlier hrefs still resolve to
    /// their label.
    pub fn build(labels: impl IntoIterator<Item = Label>) -> Self {
        let mut index = Self::default();
        for label in labels {
            let composite = label.composite();
            if let Some(previous) = index.by_composite.insert(composite.clone(), label.href.clone())
                && previous != label.href
            {
                warn!(label = %composite, %previous, current = %label.href, "duplicate label key/value");
            }
            index.by_href.insert(label.href.clone(), label);
        }
        debug!(labels = index.by_href.len(), "label index built");
        index
    }

    pub fn len(&self) -> usize {
        self.by_href.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_href.is_empty()
    }

    pub fn get(&self, href: &LabelHref) -> Option<&Label> {
        self.by_href.get(href)
    }

    pub fn resolve_composite(&self, key: &str, value: &str) -> Option<&LabelHref> {
        self.by_composite.get(&format!("{key}={value}"))
    }

    /// Look up a filter string of the form `key=value`.
    ///
    /// Only the first `=` separates key from value. Returns `None` for strings without one.
    pub fn resolve_filter(&self, filter: &str) -> Option<&LabelHref> {
        let (key, value) = filter.split_once('=')?;
        self.resolve_composite(key, value)
    }

    /// Labels for the given references; hrefs missing from the snapshot are dropped.
    pub fn resolve_identifiers<'a>(&'a self, refs: &[LabelRef]) -> Vec<&'a Label> {
        let labels: Vec<&Label> = refs.iter().filter_map(|r| self.get(&r.href)).collect();
        let dropped = refs.len() - labels.len();
        if dropped > 0 {
            debug!(dropped, "label references not present in snapshot");
        }
        labels
    }
}

/// Join the values of `wanted_keys`, in order, with `separator`.
///
/// Keys not carried by `labels` contribute the `Unknown` placeholder.
pub fn compose_app_name<S: AsRef<str>>(labels: &[&Label], wanted_keys: &[S], separator: &str) -> String {
    wanted_keys
        .iter()
        .map(|key| {
            labels
                .iter()
                .rev()
                .find(|l| l.key == key.as_ref())
                .map(|l| l.value.as_str())
                .unwrap_or(UNKNOWN_LABEL)
        })
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<Label> {
        vec![
            Label::new("/orgs/1/labels/1", "app", "web"),
            Label::new("/orgs/1/labels/2", "env", "prod"),
            Label::new("/orgs/1/labels/3", "loc", "dc1"),
            Label::new("/orgs/1/labels/4", "role", "db=primary"),
        ]
    }

    #[test]
    fn every_label_resolves_both_ways() {
        let index = LabelIndex::build(labels());
        assert_eq!(index.len(), 4);

        for label in labels() {
            assert_eq!(index.resolve_composite(&label.key, &label.value), Some(&label.href));
            assert_eq!(index.get(&label.href), Some(&label));
        }
    }

    #[test]
    fn resolve_filter_splits_on_first_equals() {
        let index = LabelIndex::build(labels());
        assert_eq!(
            index.resolve_filter("role=db=primary"),
            Some(&LabelHref::new("/orgs/1/labels/4"))
        );
        assert_eq!(index.resolve_filter("app=missing"), None);
        assert_eq!(index.resolve_filter("app"), None);
    }

    #[test]
    fn duplicate_composite_keeps_last() {
        let index = LabelIndex::build(vec![
            Label::new("/orgs/1/labels/1", "app", "web"),
            Label::new("/orgs/1/labels/9", "app", "web"),
        ]);
        assert_eq!(
            index.resolve_composite("app", "web"),
            Some(&LabelHref::new("/orgs/1/labels/9"))
        );
        assert!(index.get(&LabelHref::new("/orgs/1/labels/1")).is_some());
    }

    #[test]
    fn unknown_references_are_dropped() {
        let index = LabelIndex::build(labels());
        let refs = vec![
            LabelRef::new(LabelHref::new("/orgs/1/labels/2")),
            LabelRef::new(LabelHref::new("/orgs/1/labels/404")),
        ];
        let resolved = index.resolve_identifiers(&refs);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].value, "prod");
    }

    #[test]
    fn compose_substitutes_unknown() {
        let web = Label::new("/l/1", "app", "web");
        assert_eq!(compose_app_name(&[&web], &["app", "env"], "-"), "web-Unknown");
        assert_eq!(compose_app_name(&[], &["app", "env"], "-"), "Unknown-Unknown");
    }

    #[test]
    fn compose_keeps_key_order_and_segment_count() {
        let web = Label::new("/l/1", "app", "web");
        let prod = Label::new("/l/2", "env", "prod");
        let keys = ["env", "loc", "app"];
        let name = compose_app_name(&[&web, &prod], &keys, "|");
        assert_eq!(name, "prod|Unknown|web");
        assert_eq!(name.split('|').count(), keys.len());
    }
}
