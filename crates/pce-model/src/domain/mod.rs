mod label;
pub use label::{Label, LabelHref, LabelRef, LabelValue, UNKNOWN_LABEL};

mod flow;
pub use flow::{Endpoint, FlowRecord, PolicyDecision, Service, Workload};

mod export_row;
pub use export_row::{EXPORT_HEADER, ExportRow};

mod job;
pub use job::{AsyncJob, JobHandle, JobState, JobStatus, ResultLocation};

mod query;
pub use query::{FilterSet, LabelFilter, ServiceFilter, TrafficQuery};

mod result_set;
pub use result_set::ResultSet;
