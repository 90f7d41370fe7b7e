use std::sync::Arc;

use jobboard_core::{FilterCriteria, Job};

use crate::{ApiConfig, ApiError, CachePolicy, JobApi, QueryCache, QueryKey, ReqwestJobApi};

/// Job API behind per-operation query caches.
pub struct JobBoardService {
    api: Arc<dyn JobApi>,
    jobs: QueryCache<Vec<Job>>,
    job: QueryCache<Job>,
}

impl JobBoardService {
    pub fn new(api: Arc<dyn JobApi>, policy: CachePolicy) -> Self {
        Self {
            api,
            jobs: QueryCache::new(policy),
            job: QueryCache::new(policy),
        }
    }

    /// Service over the HTTP client described by `config`.
    pub fn from_config(config: ApiConfig) -> Result<Self, ApiError> {
        let policy = config.cache;
        let api = ReqwestJobApi::new(config)?;
        Ok(Self::new(Arc::new(api), policy))
    }

    pub async fn fetch_jobs(&self, criteria: &FilterCriteria) -> Result<Vec<Job>, ApiError> {
        let api = Arc::clone(&self.api);
        let owned = criteria.clone();
        self.jobs
            .get_or_fetch(QueryKey::jobs(criteria), move || async move {
                api.fetch_jobs(&owned).await
            })
            .await
    }

    /// Like [`Self::fetch_jobs`], but stored data for `criteria` is dropped
    /// first so the API is always asked.
    pub async fn refresh_jobs(&self, criteria: &FilterCriteria) -> Result<Vec<Job>, ApiError> {
        self.jobs.invalidate(&QueryKey::jobs(criteria));
        self.fetch_jobs(criteria).await
    }

    pub async fn fetch_job(&self, job_id: &str) -> Result<Job, ApiError> {
        let api = Arc::clone(&self.api);
        let owned = job_id.to_string();
        self.job
            .get_or_fetch(QueryKey::job(job_id), move || async move {
                api.fetch_job(&owned).await
            })
            .await
    }

    pub fn jobs_cache(&self) -> &QueryCache<Vec<Job>> {
        &self.jobs
    }

    pub fn job_cache(&self) -> &QueryCache<Job> {
        &self.job
    }
}
