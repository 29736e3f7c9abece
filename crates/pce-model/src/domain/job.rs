use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of an async job's status resource, relative to the API base.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location of a finished job's result payload, relative to the API base.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultLocation(String);

impl ResultLocation {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a single status poll reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Still running; carries the raw server status for logging.
    Processing { status: String },
    Done { result: ResultLocation },
    Failed { status: String },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Processing { .. })
    }
}

/// Lifecycle of an async job as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Submitted,
    Polling,
    Done,
    Failed,
}

impl JobState {
    /// Returns `true` for states that accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Failed)
    }
}

/// Client-side record of one submitted job.
///
/// Created on submission, advanced only through [`AsyncJob::observe`], discarded once the
/// result has been fetched.
#[derive(Debug, Clone)]
pub struct AsyncJob {
    handle: JobHandle,
    state: JobState,
    result: Option<ResultLocation>,
    polls: u32,
}

impl AsyncJob {
    pub fn submitted(handle: JobHandle) -> Self {
        Self {
            handle,
            state: JobState::Submitted,
            result: None,
            polls: 0,
        }
    }

    pub fn handle(&self) -> &JobHandle {
        &self.handle
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Result location; only set once the job is done.
    pub fn result(&self) -> Option<&ResultLocation> {
        self.result.as_ref()
    }

    /// Number of status observations applied so far.
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Apply a poll observation and return the new state.
    ///
    /// Observations made after a terminal state are ignored.
    pub fn observe(&mut self, status: &JobStatus) -> JobState {
        if self.state.is_terminal() {
            return self.state;
        }
        self.polls += 1;
        self.state = match status {
            JobStatus::Processing { .. } => JobState::Polling,
            JobStatus::Done { result } => {
                self.result = Some(result.clone());
                JobState::Done
            }
            JobStatus::Failed { .. } => JobState::Failed,
        };
        self.state
    }
}
