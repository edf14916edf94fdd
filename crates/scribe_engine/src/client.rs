use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ClientError, FailureKind, RemoteStatus, TaskId};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The remote transcription service seam: one submission exchange and one
/// status poll, both single request/response.
#[async_trait::async_trait]
pub trait TranscribeService: Send + Sync {
    /// Submits `(source_url, format)` and returns the assigned task id.
    /// Non-retryable: a failure here aborts the job.
    async fn submit(&self, source_url: &str, format: &str) -> Result<TaskId, ClientError>;

    /// Fetches the current status of an in-flight task.
    async fn fetch_status(&self, task_id: &str) -> Result<RemoteStatus, ClientError>;
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    url: &'a str,
    format: &'a str,
}

#[derive(Deserialize)]
struct SubmitResponse {
    task_id: String,
}

/// Raw poll payload. Decoded leniently: only `status` is required, and an
/// unknown status string must not fail the decode.
#[derive(Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    progress: Option<f64>,
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl From<StatusResponse> for RemoteStatus {
    fn from(raw: StatusResponse) -> Self {
        match raw.status.as_str() {
            "pending" => RemoteStatus::Pending,
            "started" => RemoteStatus::Started,
            "processing" => RemoteStatus::Processing {
                progress: raw.progress.unwrap_or(0.0).clamp(0.0, 100.0).round() as u8,
            },
            "completed" => RemoteStatus::Completed {
                transcript: raw.transcript.unwrap_or_default(),
            },
            "error" => RemoteStatus::Error {
                message: raw
                    .error
                    .unwrap_or_else(|| "Transcription failed on the backend.".to_string()),
            },
            _ => RemoteStatus::Unrecognized { status: raw.status },
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTranscribeService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTranscribeService {
    pub fn new(base_url: &str, settings: ClientSettings) -> Result<Self, ClientError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|err| ClientError::new(FailureKind::InvalidBaseUrl, err.to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait::async_trait]
impl TranscribeService for HttpTranscribeService {
    async fn submit(&self, source_url: &str, format: &str) -> Result<TaskId, ClientError> {
        let response = self
            .client
            .post(self.endpoint("transcribe"))
            .json(&SubmitRequest {
                url: source_url,
                format,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("server error: {} {}", status.as_u16(), body.trim()),
            ));
        }

        let payload: SubmitResponse = response
            .json()
            .await
            .map_err(|err| ClientError::new(FailureKind::MalformedResponse, err.to_string()))?;
        Ok(payload.task_id)
    }

    async fn fetch_status(&self, task_id: &str) -> Result<RemoteStatus, ClientError> {
        let response = self
            .client
            .get(self.endpoint(&format!("result/{task_id}")))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("failed to fetch result: {status}"),
            ));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        let payload: StatusResponse = serde_json::from_str(&body)
            .map_err(|err| ClientError::new(FailureKind::MalformedResponse, err.to_string()))?;
        Ok(payload.into())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
