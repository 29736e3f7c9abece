use serde::{Deserialize, Serialize};

/// Column names of the flow export, in order.
pub const EXPORT_HEADER: [&str; 7] = [
    "Source IP",
    "Source Name",
    "Destination IP",
    "Destination Name",
    "Service",
    "Service Name",
    "Application Name",
];

/// One canonical row of the flow export.
///
/// Rows are compared on the full tuple; the export is a set of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Source IP")]
    pub src_ip: String,
    #[serde(rename = "Source Name")]
    pub src_name: String,
    #[serde(rename = "Destination IP")]
    pub dst_ip: String,
    #[serde(rename = "Destination Name")]
    pub dst_name: String,
    /// `proto/port`, e.g. `tcp/443`.
    #[serde(rename = "Service")]
    pub service: String,
    /// Always empty; kept for the consumer's column layout.
    #[serde(rename = "Service Name")]
    pub service_name: String,
    #[serde(rename = "Application Name")]
    pub app_name: String,
}
