use std::collections::VecDeque;

use jobboard_core::{Effect, LoadError, Msg};
use jobboard_engine::{EngineError, EngineEvent, EngineHandle};
use jobboard_logging::{board_info, board_warn};

/// Forwards core effects to the engine and turns engine events back into
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
    /// Failures for effects the engine never accepted.
    undelivered: VecDeque<Msg>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            undelivered: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            let sent = match &effect {
                Effect::FetchJobs {
                    generation,
                    criteria,
                    refresh,
                } => {
                    board_info!(
                        "FetchJobs generation={} refresh={} search={:?} type={} location={:?} skills={:?}",
                        generation,
                        refresh,
                        criteria.search_term,
                        criteria.job_type,
                        criteria.location,
                        criteria.skills
                    );
                    if *refresh {
                        self.engine.refresh_jobs(*generation, criteria.clone())
                    } else {
                        self.engine.fetch_jobs(*generation, criteria.clone())
                    }
                }
                Effect::FetchJob { generation, job_id } => {
                    board_info!("FetchJob generation={} job_id={}", generation, job_id);
                    self.engine.fetch_job(*generation, job_id.clone())
                }
            };
            if let Err(err) = sent {
                self.undelivered.push_back(undelivered_to_msg(effect, &err));
            }
        }
    }

    /// Next engine result as a message, if one is ready.
    pub fn poll(&mut self) -> Option<Msg> {
        if let Some(msg) = self.undelivered.pop_front() {
            return Some(msg);
        }
        self.engine.try_recv().map(event_to_msg)
    }
}

/// Settles an effect the engine could not take, so the board leaves `Loading`.
fn undelivered_to_msg(effect: Effect, err: &EngineError) -> Msg {
    board_warn!("{:?} not delivered: {}", effect, err);
    let error = LoadError::network(err.to_string());
    match effect {
        Effect::FetchJobs { generation, .. } => Msg::JobsLoaded {
            generation,
            result: Err(error),
        },
        Effect::FetchJob { generation, job_id } => Msg::JobLoaded {
            generation,
            job_id,
            result: Err(error),
        },
    }
}

fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::JobsFetched { generation, result } => {
            if let Err(err) = &result {
                board_warn!("Job list generation={} failed: {}", generation, err);
            }
            Msg::JobsLoaded {
                generation,
                result: result.map_err(LoadError::from),
            }
        }
        EngineEvent::JobFetched {
            generation,
            job_id,
            result,
        } => {
            if let Err(err) = &result {
                board_warn!("Job {} generation={} failed: {}", job_id, generation, err);
            }
            Msg::JobLoaded {
                generation,
                job_id,
                result: result.map_err(LoadError::from),
            }
        }
    }
}
