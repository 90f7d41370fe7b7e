use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use jobboard_core::{FilterCriteria, Generation};
use jobboard_logging::{board_debug, board_info, board_warn};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::{ApiConfig, ApiError, EngineEvent, JobBoardService};

const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

enum EngineCommand {
    FetchJobs {
        generation: Generation,
        criteria: FilterCriteria,
        refresh: bool,
    },
    FetchJob {
        generation: Generation,
        job_id: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("engine thread has stopped")]
    Stopped,
}

/// Runs fetches on a background tokio runtime.
///
/// A new list fetch cancels the previous one, and likewise for detail
/// fetches; cancelled requests report nothing. Dropping the handle stops the
/// engine thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: ApiConfig) -> Result<Self, EngineError> {
        let service = JobBoardService::from_config(config)?;
        Self::with_service(service)
    }

    pub fn with_service(service: JobBoardService) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("jobboard-io")
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let service = Arc::new(service);

        thread::Builder::new()
            .name("jobboard-engine".into())
            .spawn(move || run(runtime, service, cmd_rx, event_tx))?;

        Ok(Self { cmd_tx, event_rx })
    }

    /// Fetches the job list, serving fresh cached data when the cache policy
    /// allows it.
    pub fn fetch_jobs(
        &self,
        generation: Generation,
        criteria: FilterCriteria,
    ) -> Result<(), EngineError> {
        self.send(EngineCommand::FetchJobs {
            generation,
            criteria,
            refresh: false,
        })
    }

    /// Fetches the job list from the API regardless of cached data.
    pub fn refresh_jobs(
        &self,
        generation: Generation,
        criteria: FilterCriteria,
    ) -> Result<(), EngineError> {
        self.send(EngineCommand::FetchJobs {
            generation,
            criteria,
            refresh: true,
        })
    }

    pub fn fetch_job(
        &self,
        generation: Generation,
        job_id: impl Into<String>,
    ) -> Result<(), EngineError> {
        self.send(EngineCommand::FetchJob {
            generation,
            job_id: job_id.into(),
        })
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineError> {
        self.cmd_tx.send(command).map_err(|_| {
            board_warn!("engine thread is gone; request dropped");
            EngineError::Stopped
        })
    }
}

/// Cancellation slot for the latest request of one kind.
#[derive(Default)]
struct Latest {
    current: Option<(Generation, CancellationToken)>,
}

impl Latest {
    fn replace(&mut self, generation: Generation) -> CancellationToken {
        self.cancel();
        let token = CancellationToken::new();
        self.current = Some((generation, token.clone()));
        token
    }

    fn cancel(&mut self) {
        if let Some((previous, token)) = self.current.take() {
            board_debug!("cancelling request generation={}", previous);
            token.cancel();
        }
    }
}

fn run(
    runtime: Runtime,
    service: Arc<JobBoardService>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut list = Latest::default();
    let mut detail = Latest::default();

    while let Ok(command) = cmd_rx.recv() {
        let service = Arc::clone(&service);
        let event_tx = event_tx.clone();
        match command {
            EngineCommand::FetchJobs {
                generation,
                criteria,
                refresh,
            } => {
                let token = list.replace(generation);
                runtime.spawn(async move {
                    let fetch = async {
                        if refresh {
                            service.refresh_jobs(&criteria).await
                        } else {
                            service.fetch_jobs(&criteria).await
                        }
                    };
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            board_debug!("list generation={} superseded", generation);
                        }
                        result = fetch => {
                            let _ = event_tx.send(EngineEvent::JobsFetched { generation, result });
                        }
                    }
                });
            }
            EngineCommand::FetchJob { generation, job_id } => {
                let token = detail.replace(generation);
                let request_id = job_id.clone();
                runtime.spawn(async move {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            board_debug!("detail generation={} superseded", generation);
                        }
                        result = service.fetch_job(&request_id) => {
                            let _ = event_tx.send(EngineEvent::JobFetched { generation, job_id, result });
                        }
                    }
                });
            }
        }
    }

    list.cancel();
    detail.cancel();
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    board_info!("engine stopped");
}
