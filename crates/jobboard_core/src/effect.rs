use crate::{FilterCriteria, Generation};

/// Side effects requested by [`crate::update`], executed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the filtered job collection. Supersedes any earlier `FetchJobs`.
    ///
    /// `refresh` asks for a network round trip even when cached data for the
    /// criteria is still fresh.
    FetchJobs {
        generation: Generation,
        criteria: FilterCriteria,
        refresh: bool,
    },
    /// Fetch a single job for the detail view. Supersedes any earlier `FetchJob`.
    FetchJob {
        generation: Generation,
        job_id: String,
    },
}
