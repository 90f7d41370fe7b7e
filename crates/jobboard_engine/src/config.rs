use std::time::Duration;

use url::Url;

use crate::{ApiError, ApiErrorKind};

/// Environment variable holding the job API host.
pub const BASE_URL_ENV: &str = "JOBBOARD_BACKEND_SERVICE";

const JOBS_PATH: [&str; 2] = ["job", "get-jobs-open"];
const JOB_PATH: [&str; 2] = ["job", "get-job-item"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("invalid backend address {value:?}: {message}")]
    InvalidBaseUrl { value: String, message: String },
}

/// How long successful query results are reused.
///
/// The default keeps nothing beyond the lifetime of an in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CachePolicy {
    pub ttl: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    pub cache: CachePolicy,
}

impl ApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
            cache: CachePolicy::default(),
        }
    }

    /// Reads the base host from [`BASE_URL_ENV`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_var(std::env::var(BASE_URL_ENV).ok().as_deref())
    }

    pub fn from_var(value: Option<&str>) -> Result<Self, ConfigError> {
        let raw = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(BASE_URL_ENV))?;
        Ok(Self::new(parse_base_url(raw)?))
    }

    /// `{base}/job/get-jobs-open/`
    pub fn jobs_url(&self) -> Result<Url, ApiError> {
        self.endpoint(&JOBS_PATH, None)
    }

    /// `{base}/job/get-job-item/{job_id}/`, with the id encoded as one segment.
    pub fn job_url(&self, job_id: &str) -> Result<Url, ApiError> {
        let job_id = job_id.trim();
        if job_id.is_empty() {
            return Err(ApiError::new(ApiErrorKind::InvalidRequest, "empty job id"));
        }
        self.endpoint(&JOB_PATH, Some(job_id))
    }

    fn endpoint(&self, path: &[&str], tail: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ApiError::new(
                    ApiErrorKind::InvalidRequest,
                    format!("base url {} cannot carry a path", self.base_url),
                )
            })?;
            segments.pop_if_empty().extend(path).extend(tail);
            // Endpoints are declared with a trailing slash.
            segments.push("");
        }
        Ok(url)
    }
}

/// A bare host gets `https://`; anything with a scheme is taken as-is.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    let invalid = |message: String| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        message,
    };
    let url = Url::parse(&candidate).map_err(|err| invalid(err.to_string()))?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("missing host".into()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::{ApiConfig, ConfigError, BASE_URL_ENV};
    use crate::ApiErrorKind;

    #[test]
    fn bare_host_defaults_to_https() {
        let config = ApiConfig::from_var(Some("api.example.com")).unwrap();
        assert_eq!(
            config.jobs_url().unwrap().as_str(),
            "https://api.example.com/job/get-jobs-open/"
        );
    }

    #[test]
    fn explicit_scheme_and_prefix_are_kept() {
        let config = ApiConfig::from_var(Some("http://localhost:8000/api/")).unwrap();
        assert_eq!(
            config.job_url("abc123").unwrap().as_str(),
            "http://localhost:8000/api/job/get-job-item/abc123/"
        );
    }

    #[test]
    fn job_id_is_a_single_segment() {
        let config = ApiConfig::from_var(Some("api.example.com")).unwrap();
        assert_eq!(
            config.job_url("a/b c").unwrap().as_str(),
            "https://api.example.com/job/get-job-item/a%2Fb%20c/"
        );
        assert_eq!(
            config.job_url("  ").unwrap_err().kind,
            ApiErrorKind::InvalidRequest
        );
    }

    #[test]
    fn missing_or_invalid_base_is_rejected() {
        assert_eq!(
            ApiConfig::from_var(None).unwrap_err(),
            ConfigError::Missing(BASE_URL_ENV)
        );
        assert_eq!(
            ApiConfig::from_var(Some("  ")).unwrap_err(),
            ConfigError::Missing(BASE_URL_ENV)
        );
        assert!(matches!(
            ApiConfig::from_var(Some("http://")),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }
}
