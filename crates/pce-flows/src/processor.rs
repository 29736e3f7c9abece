//! Turns raw flows into the de-duplicated export set.
use std::collections::HashSet;

use tracing::{debug, info};

use pce_model::{Endpoint, ExportRow, FlowRecord, UNKNOWN_LABEL};

use crate::labels::{LabelIndex, compose_app_name};
use crate::service::classify_service;

/// Why a flow produced no row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// No service, or port 0.
    NoService,
    /// Destination has no labels, or none of the wanted keys.
    NoApplication,
    /// Source or destination name is empty.
    NoEndpointName,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub processed: usize,
    pub no_service: usize,
    pub no_application: usize,
    pub no_endpoint_name: usize,
    pub duplicates: usize,
}

impl ExportStats {
    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::NoService => self.no_service += 1,
            DropReason::NoApplication => self.no_application += 1,
            DropReason::NoEndpointName => self.no_endpoint_name += 1,
        }
    }

    pub fn dropped(&self) -> usize {
        self.no_service + self.no_application + self.no_endpoint_name
    }
}

/// Unique export rows and the counters explaining what was filtered out.
#[derive(Debug, Clone, Default)]
pub struct ExportSet {
    pub rows: HashSet<ExportRow>,
    pub stats: ExportStats,
}

pub struct FlowProcessor<'a> {
    index: &'a LabelIndex,
    app_keys: Vec<String>,
    separator: String,
}

impl<'a> FlowProcessor<'a> {
    /// `app_keys` are the label keys whose values form the application name, in order.
    pub fn new(index: &'a LabelIndex, app_keys: Vec<String>, separator: impl Into<String>) -> Self {
        Self {
            index,
            app_keys,
            separator: separator.into(),
        }
    }

    /// Split a comma separated key list such as `app,env`.
    pub fn parse_app_keys(keys: &str) -> Vec<String> {
        keys.split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Application name of a destination, empty when it carries no labels at all.
    pub fn resolve_app_name(&self, destination: &Endpoint) -> String {
        let refs = destination.labels();
        if refs.is_empty() {
            return String::new();
        }
        let labels = self.index.resolve_identifiers(refs);
        compose_app_name(&labels, self.app_keys.as_slice(), &self.separator)
    }

    /// Build the row for `flow`, or say why it has none.
    pub fn classify(&self, flow: &FlowRecord) -> Result<ExportRow, DropReason> {
        let service = classify_service(flow.service.as_ref());
        if service.is_empty() {
            return Err(DropReason::NoService);
        }

        let app_name = self.resolve_app_name(&flow.dst);
        if app_name.is_empty() || app_name == UNKNOWN_LABEL {
            return Err(DropReason::NoApplication);
        }

        let src_name = flow.src.display_name();
        let dst_name = flow.dst.display_name();
        if src_name.is_empty() || dst_name.is_empty() {
            return Err(DropReason::NoEndpointName);
        }

        Ok(ExportRow {
            src_ip: flow.src.ip.clone(),
            src_name: src_name.to_string(),
            dst_ip: flow.dst.ip.clone(),
            dst_name: dst_name.to_string(),
            service,
            service_name: String::new(),
            app_name,
        })
    }

    pub fn to_export_row(&self, flow: &FlowRecord) -> Option<ExportRow> {
        self.classify(flow).ok()
    }

    pub fn build_export_set<'f>(&self, flows: impl IntoIterator<Item = &'f FlowRecord>) -> ExportSet {
        let mut set = ExportSet::default();

        for flow in flows {
            set.stats.processed += 1;
            match self.classify(flow) {
                Ok(row) => {
                    if !set.rows.insert(row) {
                        set.stats.duplicates += 1;
                    }
                }
                Err(reason) => {
                    debug!(src = %flow.src.ip, dst = %flow.dst.ip, ?reason, "flow dropped");
                    set.stats.record_drop(reason);
                }
            }
        }

        info!(
            processed = set.stats.processed,
            exported = set.rows.len(),
            dropped = set.stats.dropped(),
            duplicates = set.stats.duplicates,
            "flows filtered and de-duplicated"
        );
        set
    }
}
