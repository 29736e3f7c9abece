mod config;
pub use config::{Credentials, PceConfig, PollPolicy};

mod errors;
pub use errors::ApiError;

mod transport;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

mod jobs;
pub use jobs::AsyncJobClient;

mod api;
pub use api::{PceApi, labels_path, traffic_query_path};

#[cfg(test)]
mod fake;
