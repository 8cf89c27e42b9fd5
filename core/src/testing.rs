//! Recording transport shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::TogglClient;
use crate::config::{with_api_token, with_transport};
use crate::error::BoxError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Replays queued responses and records every request it receives. When the
/// queue is empty it answers `200 {}`.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl Recorder {
    pub(crate) fn push(&self, response: HttpResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for Recorder {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| HttpResponse::new(200, "{}")))
    }
}

pub(crate) fn recording_client() -> (TogglClient, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let client = TogglClient::from_options([with_api_token("token"), with_transport(recorder.clone())])
        .unwrap();
    (client, recorder)
}
