//! Submit / poll / fetch protocol for work the PCE runs in the background.
//!
//! A submission answered with `202 Accepted` names a job resource. The job is polled until it
//! reports a terminal status, then its result payload (a JSON array) is downloaded. Nothing
//! here retries: the first transport error or rejection ends the operation.
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use pce_model::{AsyncJob, JobHandle, JobStatus, ResultLocation, ResultSet};

use crate::config::PollPolicy;
use crate::errors::ApiError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

const ACCEPTED: u16 = 202;
const OK: u16 = 200;

pub struct AsyncJobClient<T> {
    transport: T,
}

impl<T: Transport> AsyncJobClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` asking for asynchronous handling and return the job handle.
    ///
    /// The handle comes from the `Location` header, or from the `href` of the response body
    /// when the endpoint reports the job that way.
    pub async fn submit(&self, request: ApiRequest) -> Result<JobHandle, ApiError> {
        let response = self.transport.send(request.respond_async()).await?;
        expect_status(&response, ACCEPTED)?;

        if let Some(location) = response.location.filter(|l| !l.is_empty()) {
            return Ok(JobHandle::new(location));
        }
        let accepted: AcceptedBody = parse_body(&response.body)?;
        accepted
            .href
            .filter(|h| !h.is_empty())
            .map(JobHandle::new)
            .ok_or_else(|| {
                ApiError::InvalidResponse("accepted response carried no job location".to_string())
            })
    }

    /// Read the job's status resource once.
    pub async fn poll(&self, handle: &JobHandle) -> Result<JobStatus, ApiError> {
        let response = self.transport.send(ApiRequest::get(handle.as_str())).await?;
        expect_status(&response, OK)?;

        let body: StatusBody = parse_body(&response.body)?;
        body.into_status(handle)
    }

    /// Poll until the job is done and return where its result lives.
    ///
    /// Sleeps `policy.interval()` after every non-terminal observation. A failed job is
    /// [`ApiError::JobFailed`]; running past the attempt cap or the timeout is
    /// [`ApiError::TimedOut`].
    pub async fn await_completion(
        &self,
        handle: &JobHandle,
        policy: &PollPolicy,
    ) -> Result<ResultLocation, ApiError> {
        let mut job = AsyncJob::submitted(handle.clone());
        let started = Instant::now();

        loop {
            let status = self.poll(job.handle()).await?;
            job.observe(&status);

            match status {
                JobStatus::Done { result } => {
                    info!(job = %handle, polls = job.polls(), "async job completed");
                    return Ok(result);
                }
                JobStatus::Failed { status } => {
                    warn!(job = %handle, %status, "async job failed");
                    return Err(ApiError::JobFailed {
                        handle: handle.to_string(),
                        status,
                    });
                }
                JobStatus::Processing { status } => {
                    debug!(job = %handle, %status, polls = job.polls(), "async job still processing");

                    let elapsed = started.elapsed();
                    let attempts_exhausted =
                        policy.max_attempts.is_some_and(|max| job.polls() >= max);
                    let deadline_passed = policy
                        .timeout()
                        .is_some_and(|timeout| elapsed + policy.interval() > timeout);

                    if attempts_exhausted || deadline_passed {
                        return Err(ApiError::TimedOut {
                            handle: handle.to_string(),
                            attempts: job.polls(),
                            elapsed_ms: elapsed.as_millis() as u64,
                        });
                    }
                    sleep(policy.interval()).await;
                }
            }
        }
    }

    /// Download a job result and parse its elements as `R`.
    ///
    /// Elements that do not parse are skipped and counted in [`ResultSet::skipped`].
    pub async fn fetch_results<R: DeserializeOwned>(
        &self,
        location: &ResultLocation,
    ) -> Result<ResultSet<R>, ApiError> {
        let response = self
            .transport
            .send(ApiRequest::get(location.as_str()))
            .await?;
        expect_status(&response, OK)?;

        let items: Vec<serde_json::Value> = serde_json::from_str(&response.body).map_err(|e| {
            ApiError::InvalidResponse(format!("result payload is not a JSON array: {e}"))
        })?;

        let mut set = ResultSet::default();
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<R>(item) {
                Ok(record) => set.records.push(record),
                Err(e) => {
                    set.skipped += 1;
                    debug!(index, error = %e, "skipping malformed record");
                }
            }
        }

        if set.skipped > 0 {
            warn!(
                location = %location,
                kept = set.records.len(),
                skipped = set.skipped,
                "job result contained malformed records"
            );
        }
        Ok(set)
    }

    /// Submit, wait and fetch in one go.
    pub async fn run<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
        policy: &PollPolicy,
    ) -> Result<ResultSet<R>, ApiError> {
        let handle = self.submit(request).await?;
        info!(job = %handle, "async job submitted");

        let location = self.await_completion(&handle, policy).await?;
        self.fetch_results(&location).await
    }
}

#[derive(Deserialize)]
struct AcceptedBody {
    #[serde(default)]
    href: Option<String>,
}

#[derive(Deserialize)]
struct StatusBody {
    status: String,
    #[serde(default)]
    result: Option<ResultRef>,
}

/// Label jobs report `{"href": ...}`, traffic queries a bare path.
#[derive(Deserialize)]
#[serde(untagged)]
enum ResultRef {
    Object { href: String },
    Path(String),
}

impl ResultRef {
    fn into_href(self) -> String {
        match self {
            ResultRef::Object { href } => href,
            ResultRef::Path(path) => path,
        }
    }
}

impl StatusBody {
    fn into_status(self, handle: &JobHandle) -> Result<JobStatus, ApiError> {
        let result = self.result.map(ResultRef::into_href).filter(|h| !h.is_empty());

        match self.status.as_str() {
            "done" => result
                .map(|href| JobStatus::Done {
                    result: ResultLocation::new(href),
                })
                .ok_or_else(|| {
                    ApiError::InvalidResponse(format!("job {handle} is done but has no result"))
                }),
            "completed" => Ok(JobStatus::Done {
                result: ResultLocation::new(
                    result.unwrap_or_else(|| format!("{}/download", handle.as_str())),
                ),
            }),
            "failed" | "cancelled" => Ok(JobStatus::Failed {
                status: self.status.clone(),
            }),
            _ => Ok(JobStatus::Processing {
                status: self.status.clone(),
            }),
        }
    }
}

fn expect_status(response: &ApiResponse, expected: u16) -> Result<(), ApiError> {
    if response.status != expected {
        return Err(ApiError::Rejected {
            status: response.status,
            body: response.body.clone(),
        });
    }
    Ok(())
}

fn parse_body<B: DeserializeOwned>(body: &str) -> Result<B, ApiError> {
    serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("failed to parse response: {e}, body: {body}")))
}
