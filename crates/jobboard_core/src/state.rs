use jobboard_logging::{board_debug, board_trace};

use crate::view_model::{
    BoardViewModel, DetailView, JobDetailView, JobRowView, ListStatus, ListViewModel,
};
use crate::{Effect, FilterChange, FilterCriteria, Job, LoadError, PageState};

/// Monotonic request tag; responses carrying an older value are discarded.
pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Error(LoadError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailPhase {
    #[default]
    Closed,
    Loading {
        job_id: String,
    },
    Loaded(Box<Job>),
    Error {
        job_id: String,
        error: LoadError,
    },
}

/// Single owner of the board's filters, pagination and fetched data.
///
/// All mutation goes through [`crate::update`]; readers only get accessors and
/// the derived [`BoardViewModel`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoardState {
    criteria: FilterCriteria,
    page: PageState,
    phase: ListPhase,
    jobs: Vec<Job>,
    generation: Generation,
    detail: DetailPhase,
    detail_generation: Generation,
    dirty: bool,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn phase(&self) -> &ListPhase {
        &self.phase
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn current_page(&self) -> usize {
        self.page.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.page.total_pages(self.jobs.len())
    }

    /// Full collection matching the current criteria.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Slice of [`Self::jobs`] on the current page.
    pub fn visible_jobs(&self) -> &[Job] {
        &self.jobs[self.page.visible_range(self.jobs.len())]
    }

    pub fn detail(&self) -> &DetailPhase {
        &self.detail
    }

    pub fn view(&self) -> BoardViewModel {
        BoardViewModel {
            list: self.list_view(),
            detail: self.detail_view(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.phase == ListPhase::Idle
    }

    /// Replaces one filter field and starts a fresh query.
    pub(crate) fn apply_filter(&mut self, change: FilterChange) -> Effect {
        board_debug!("filter changed: {:?}", change);
        self.criteria = self.criteria.with_change(change);
        self.begin_query(false)
    }

    pub(crate) fn reset_filters(&mut self) -> Effect {
        self.criteria = FilterCriteria::default();
        self.begin_query(false)
    }

    /// Enters `Loading` under a new generation. The previous collection is
    /// dropped so nothing from superseded criteria stays visible.
    pub(crate) fn begin_query(&mut self, refresh: bool) -> Effect {
        self.generation += 1;
        self.jobs.clear();
        self.page.reset();
        self.phase = ListPhase::Loading;
        self.mark_dirty();
        board_debug!(
            "list query generation={} refresh={} criteria={:?}",
            self.generation,
            refresh,
            self.criteria
        );
        Effect::FetchJobs {
            generation: self.generation,
            criteria: self.criteria.clone(),
            refresh,
        }
    }

    pub(crate) fn apply_jobs(
        &mut self,
        generation: Generation,
        result: Result<Vec<Job>, LoadError>,
    ) {
        if generation != self.generation || self.phase != ListPhase::Loading {
            board_debug!(
                "dropping stale list result generation={} current={}",
                generation,
                self.generation
            );
            return;
        }
        match result {
            Ok(jobs) => {
                board_debug!("list generation={} loaded {} jobs", generation, jobs.len());
                self.jobs = jobs;
                self.phase = ListPhase::Success;
            }
            Err(error) => {
                board_debug!("list generation={} failed: {}", generation, error);
                self.jobs.clear();
                self.phase = ListPhase::Error(error);
            }
        }
        self.page.clamp(self.jobs.len());
        self.mark_dirty();
    }

    pub(crate) fn select_page(&mut self, page: usize) {
        if self.page.select(page, self.jobs.len()) {
            board_trace!("page -> {}", page);
            self.mark_dirty();
        }
    }

    pub(crate) fn step_page(&mut self, forward: bool) {
        let current = self.page.current_page();
        let target = if forward {
            current + 1
        } else {
            current.saturating_sub(1)
        };
        self.select_page(target);
    }

    pub(crate) fn open_detail(&mut self, job_id: String) -> Effect {
        self.detail_generation += 1;
        self.detail = DetailPhase::Loading {
            job_id: job_id.clone(),
        };
        self.mark_dirty();
        board_debug!(
            "detail query generation={} job_id={}",
            self.detail_generation,
            job_id
        );
        Effect::FetchJob {
            generation: self.detail_generation,
            job_id,
        }
    }

    pub(crate) fn apply_job(
        &mut self,
        generation: Generation,
        job_id: String,
        result: Result<Job, LoadError>,
    ) {
        let pending = matches!(&self.detail, DetailPhase::Loading { job_id: id } if *id == job_id);
        if generation != self.detail_generation || !pending {
            board_debug!(
                "dropping stale detail result generation={} current={}",
                generation,
                self.detail_generation
            );
            return;
        }
        self.detail = match result {
            Ok(job) => DetailPhase::Loaded(Box::new(job)),
            Err(error) => DetailPhase::Error { job_id, error },
        };
        self.mark_dirty();
    }

    pub(crate) fn close_detail(&mut self) {
        if self.detail == DetailPhase::Closed {
            return;
        }
        // Anything still in flight for the old view is now stale.
        self.detail_generation += 1;
        self.detail = DetailPhase::Closed;
        self.mark_dirty();
    }

    fn list_view(&self) -> ListViewModel {
        let total_pages = self.total_pages();
        let status = match &self.phase {
            ListPhase::Idle => ListStatus::Idle,
            ListPhase::Loading => ListStatus::Loading,
            ListPhase::Error(error) => ListStatus::Error(error.to_string()),
            ListPhase::Success if self.jobs.is_empty() => ListStatus::NoResults,
            ListPhase::Success => ListStatus::Results,
        };
        ListViewModel {
            status,
            rows: self.visible_jobs().iter().map(JobRowView::from_job).collect(),
            current_page: self.page.current_page(),
            total_pages,
            show_pagination: total_pages > 1,
            total_jobs: self.jobs.len(),
            criteria: self.criteria.clone(),
        }
    }

    fn detail_view(&self) -> Option<DetailView> {
        match &self.detail {
            DetailPhase::Closed => None,
            DetailPhase::Loading { job_id } => Some(DetailView::Loading {
                job_id: job_id.clone(),
            }),
            DetailPhase::Loaded(job) => Some(DetailView::Loaded(JobDetailView::from_job(job))),
            DetailPhase::Error { job_id, error } => Some(DetailView::Error {
                job_id: job_id.clone(),
                message: error.to_string(),
            }),
        }
    }
}
