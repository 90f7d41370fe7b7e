//! Job board engine: API client, query cache and effect execution.
mod cache;
mod client;
mod config;
mod engine;
mod service;
mod types;

pub use cache::{QueryCache, QueryEvent, QueryKey, QueryState, QueryStatus};
pub use client::{JobApi, ReqwestJobApi};
pub use config::{ApiConfig, CachePolicy, ConfigError, BASE_URL_ENV};
pub use engine::{EngineError, EngineHandle};
pub use service::JobBoardService;
pub use types::{ApiError, ApiErrorKind, EngineEvent, ErrorCategory};
