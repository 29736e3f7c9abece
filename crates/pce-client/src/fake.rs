use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::errors::ApiError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Transport replaying canned responses and recording what was sent, and when.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<ApiResponse>>,
    sent: Mutex<Vec<(ApiRequest, Instant)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.push(ApiResponse {
            status,
            location: None,
            body: body.to_string(),
        })
    }

    pub fn accept(self, location: &str) -> Self {
        self.push(ApiResponse {
            status: 202,
            location: Some(location.to_string()),
            body: String::new(),
        })
    }

    fn push(self, response: ApiResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn sent(&self) -> Vec<(ApiRequest, Instant)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.sent().into_iter().map(|(r, _)| r.path).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.sent.lock().unwrap().push((request, Instant::now()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ApiError::InvalidResponse("script exhausted".to_string()))
    }
}
