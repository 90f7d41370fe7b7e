use crate::{FilterChange, Generation, Job, LoadError};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// First load of the list with the current (default) criteria.
    Started,
    /// User edited one filter field.
    FilterChanged(FilterChange),
    /// User cleared all filters back to their defaults.
    FiltersReset,
    /// User picked a page number.
    PageSelected(usize),
    PreviousPage,
    NextPage,
    /// User asked to re-run the current query.
    RefreshRequested,
    /// Engine finished a list query.
    JobsLoaded {
        generation: Generation,
        result: Result<Vec<Job>, LoadError>,
    },
    /// User opened a job's detail view.
    JobSelected { job_id: String },
    /// Engine finished a detail query.
    JobLoaded {
        generation: Generation,
        job_id: String,
        result: Result<Job, LoadError>,
    },
    /// User left the detail view.
    DetailClosed,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
