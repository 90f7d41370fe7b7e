use bytes::BytesMut;
use futures_util::StreamExt;
use jobboard_core::{FilterCriteria, Job};
use jobboard_logging::{board_debug, board_warn};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use crate::{ApiConfig, ApiError, ApiErrorKind};

/// The two calls the board makes against the job API.
///
/// Implementations never panic or propagate transport errors by other means:
/// every failure comes back as an [`ApiError`].
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    /// `GET /job/get-job-item/{job_id}/`
    async fn fetch_job(&self, job_id: &str) -> Result<Job, ApiError>;

    /// `POST /job/get-jobs-open/` with the criteria as JSON body.
    async fn fetch_jobs(&self, criteria: &FilterCriteria) -> Result<Vec<Job>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobApi {
    config: ApiConfig,
    client: reqwest::Client,
}

impl ReqwestJobApi {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiErrorKind::Network, err.to_string()))?;
        Ok(Self { config, client })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ApiErrorKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = self.read_body(response).await?;
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(ApiErrorKind::Parse, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<BytesMut, ApiError> {
        let max_bytes = self.config.max_bytes;
        let too_large = |actual: u64| {
            ApiError::new(
                ApiErrorKind::TooLarge {
                    max_bytes,
                    actual: Some(actual),
                },
                "response too large",
            )
        };

        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(content_len));
            }
        }

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(next_len));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl JobApi for ReqwestJobApi {
    async fn fetch_job(&self, job_id: &str) -> Result<Job, ApiError> {
        let url = self.config.job_url(job_id)?;
        board_debug!("GET {}", url);
        let result = self.execute(self.client.get(url)).await;
        if let Err(err) = &result {
            board_warn!("fetch_job {} failed: {}", job_id, err);
        }
        result
    }

    async fn fetch_jobs(&self, criteria: &FilterCriteria) -> Result<Vec<Job>, ApiError> {
        let url = self.config.jobs_url()?;
        let body = serde_json::to_vec(criteria)
            .map_err(|err| ApiError::new(ApiErrorKind::InvalidRequest, err.to_string()))?;
        board_debug!("POST {} criteria={:?}", url, criteria);
        let result: Result<Vec<Job>, ApiError> =
            self.execute(self.client.post(url).body(body)).await;
        match &result {
            Ok(jobs) => board_debug!("fetch_jobs returned {} jobs", jobs.len()),
            Err(err) => board_warn!("fetch_jobs failed: {}", err),
        }
        result
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiErrorKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(ApiErrorKind::InvalidRequest, err.to_string());
    }
    ApiError::new(ApiErrorKind::Network, err.to_string())
}
