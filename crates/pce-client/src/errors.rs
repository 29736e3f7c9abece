use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("http request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("pce rejected request: {status} - {body}")]
    Rejected { status: u16, body: String },

    #[error("async job {handle} failed with status '{status}'")]
    JobFailed { handle: String, status: String },

    #[error("async job {handle} still running after {attempts} polls ({elapsed_ms} ms)")]
    TimedOut {
        handle: String,
        attempts: u32,
        elapsed_ms: u64,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
