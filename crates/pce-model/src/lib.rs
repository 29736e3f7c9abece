mod domain;
pub use domain::{
    AsyncJob, Endpoint, ExportRow, FilterSet, FlowRecord, JobHandle, JobState, JobStatus, Label,
    LabelFilter, LabelHref, LabelRef, LabelValue, PolicyDecision, ResultLocation, ResultSet,
    Service, ServiceFilter, TrafficQuery, Workload, EXPORT_HEADER, UNKNOWN_LABEL,
};
