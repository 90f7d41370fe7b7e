use crate::{FilterCriteria, Job};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    Error(String),
    /// Query succeeded with an empty collection.
    NoResults,
    Results,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListViewModel {
    pub status: ListStatus,
    /// Rows of the current page only.
    pub rows: Vec<JobRowView>,
    pub current_page: usize,
    pub total_pages: usize,
    /// Pagination controls are hidden for zero or one page.
    pub show_pagination: bool,
    pub total_jobs: usize,
    pub criteria: FilterCriteria,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: String,
    pub title: String,
    pub job_type: String,
    pub company_name: String,
    pub company_logo: Option<String>,
    pub location: String,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub tags: Vec<String>,
}

impl JobRowView {
    pub(crate) fn from_job(job: &Job) -> Self {
        Self {
            job_id: job.id.clone(),
            title: job.job_title.clone(),
            job_type: job.job_type.clone(),
            company_name: job.company_name.clone(),
            company_logo: job.company_logo.clone(),
            location: job.job_location_name.clone(),
            skills: job.skills(),
            languages: job.languages(),
            tags: job.tags(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Loading { job_id: String },
    Error { job_id: String, message: String },
    Loaded(JobDetailView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDetailView {
    pub job_id: String,
    pub title: String,
    pub company_name: String,
    pub company_logo: Option<String>,
    pub location: String,
    pub salary: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub job_type: String,
    pub description: String,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub total_applicants: u32,
    /// Documents the application form asks for, e.g. "CV".
    pub required_documents: Vec<&'static str>,
}

impl JobDetailView {
    pub(crate) fn from_job(job: &Job) -> Self {
        let required_documents = [
            (job.require_cv, "CV"),
            (job.require_cover_letter, "cover letter"),
            (job.require_voicenote, "voice note"),
        ]
        .into_iter()
        .filter_map(|(required, name)| required.then_some(name))
        .collect();

        Self {
            job_id: job.id.clone(),
            title: job.job_title.clone(),
            company_name: job.company_name.clone(),
            company_logo: job.company_logo.clone(),
            location: job.job_location_name.clone(),
            salary: job.salary_label(),
            start_date: job.start_date.clone(),
            end_date: job.end_date.clone(),
            job_type: job.job_type.clone(),
            description: job.job_description.clone(),
            skills: job.skills(),
            languages: job.languages(),
            total_applicants: job.total_applicants,
            required_documents,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardViewModel {
    pub list: ListViewModel,
    /// `Some` while a job's detail view is open.
    pub detail: Option<DetailView>,
    pub dirty: bool,
}
