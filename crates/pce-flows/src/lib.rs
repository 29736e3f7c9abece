mod error;
pub use error::ExportError;

mod labels;
pub use labels::{LabelIndex, compose_app_name};

mod service;
pub use service::{classify_service, protocol_name};

mod processor;
pub use processor::{DropReason, ExportSet, ExportStats, FlowProcessor};

mod query;
pub use query::{QueryFile, TrafficConfig, build_traffic_query, load_traffic_config};

mod output;
pub use output::{read_export_csv, write_export_csv, write_label_values};
