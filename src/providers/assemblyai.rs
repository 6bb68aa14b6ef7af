use std::path::Path;
use std::time::Duration;
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::app_config::TranscriptionConfig;
use crate::errors::ProviderError;
use crate::providers::Transcriber;

/// AssemblyAI client: upload, submit, poll, then export the SRT
pub struct AssemblyAi {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL
    endpoint: String,
    /// Delay between status polls
    poll_interval: Duration,
    /// Overall job deadline
    timeout: Duration,
    /// Optional spoken language hint
    language_code: Option<String>,
}

impl std::fmt::Debug for AssemblyAi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssemblyAi")
            .field("endpoint", &self.endpoint)
            .field("poll_interval", &self.poll_interval)
            .field("timeout", &self.timeout)
            .field("language_code", &self.language_code)
            .finish_non_exhaustive()
    }
}

/// Response to an audio upload
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub upload_url: String,
}

/// Transcript job submission
#[derive(Debug, Serialize)]
pub struct TranscriptRequest {
    /// URL of the uploaded audio
    audio_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<String>,
}

impl TranscriptRequest {
    pub fn new(audio_url: impl Into<String>) -> Self {
        Self {
            audio_url: audio_url.into(),
            language_code: None,
        }
    }

    /// Set the spoken language hint
    pub fn language_code(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = Some(language_code.into());
        self
    }
}

/// Job lifecycle as reported by the service
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

/// A transcript job as returned by submit and status calls
#[derive(Debug, Deserialize)]
pub struct TranscriptJob {
    pub id: String,
    pub status: TranscriptStatus,
    #[serde(default)]
    pub error: Option<String>,
}

impl TranscriptJob {
    /// `Ok(true)` once finished, `Ok(false)` while pending, the service's error otherwise
    pub fn outcome(&self) -> Result<bool, ProviderError> {
        match self.status {
            TranscriptStatus::Completed => Ok(true),
            TranscriptStatus::Queued | TranscriptStatus::Processing => Ok(false),
            TranscriptStatus::Error => Err(ProviderError::TranscriptionFailed(
                self.error
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }
}

impl AssemblyAi {
    /// Create a new AssemblyAI client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(300))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            poll_interval: Duration::from_secs(3),
            timeout: Duration::from_secs(1800),
            language_code: None,
        }
    }

    pub fn from_config(config: &TranscriptionConfig) -> Self {
        let mut client = Self::new(config.api_key.clone(), config.endpoint.clone())
            .poll_interval(Duration::from_millis(config.poll_interval_ms))
            .timeout(Duration::from_secs(config.timeout_secs));
        client.language_code = config.language_code.clone();
        client
    }

    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        let base = if self.endpoint.is_empty() {
            "https://api.assemblyai.com"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}{}", base, path)
    }

    /// Upload the audio bytes and return the private URL the service assigned
    pub async fn upload(&self, audio: Vec<u8>) -> Result<String, ProviderError> {
        let response = self.client.post(self.url("/v2/upload"))
            .header("authorization", &self.api_key)
            .body(audio)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to upload audio: {}", e)))?;

        let upload: UploadResponse = Self::check(response).await?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(upload.upload_url)
    }

    /// Submit a transcript job
    pub async fn submit(&self, request: &TranscriptRequest) -> Result<TranscriptJob, ProviderError> {
        let response = self.client.post(self.url("/v2/transcript"))
            .header("authorization", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to submit transcript: {}", e)))?;

        Self::check(response).await?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    /// Fetch the current state of a job
    pub async fn status(&self, id: &str) -> Result<TranscriptJob, ProviderError> {
        let response = self.client.get(self.url(&format!("/v2/transcript/{}", id)))
            .header("authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to poll transcript {}: {}", id, e)))?;

        Self::check(response).await?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    /// Export a finished job as SRT
    pub async fn export_srt(&self, id: &str) -> Result<String, ProviderError> {
        let response = self.client.get(self.url(&format!("/v2/transcript/{}/srt", id)))
            .header("authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to export subtitles for {}: {}", id, e)))?;

        Self::check(response).await?
            .text()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    async fn check(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        error!("AssemblyAI API error ({}): {}", status, error_text);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ProviderError::AuthenticationError(error_text))
            }
            _ => Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            }),
        }
    }

    async fn wait_for_completion(&self, mut job: TranscriptJob) -> Result<TranscriptJob, ProviderError> {
        let deadline = Instant::now() + self.timeout;

        while !job.outcome()? {
            if Instant::now() >= deadline {
                return Err(ProviderError::Timeout(self.timeout.as_secs()));
            }
            tokio::time::sleep(self.poll_interval).await;
            job = self.status(&job.id).await?;
            debug!("Transcript {} is {:?}", job.id, job.status);
        }

        Ok(job)
    }
}

#[async_trait]
impl Transcriber for AssemblyAi {
    async fn transcribe(&self, source: &Path) -> Result<String, ProviderError> {
        let audio = tokio::fs::read(source).await
            .map_err(|e| ProviderError::Io(format!("Failed to read {}: {}", source.display(), e)))?;

        info!("Uploading {} ({} bytes) for transcription", source.display(), audio.len());
        let audio_url = self.upload(audio).await?;

        let mut request = TranscriptRequest::new(audio_url);
        if let Some(language_code) = &self.language_code {
            request = request.language_code(language_code.clone());
        }

        let job = self.submit(&request).await?;
        debug!("Submitted transcript job {}", job.id);

        let job = self.wait_for_completion(job).await?;
        self.export_srt(&job.id).await
    }

    fn name(&self) -> &str {
        "AssemblyAI"
    }
}
