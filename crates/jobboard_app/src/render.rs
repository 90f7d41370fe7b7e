use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use jobboard_core::{
    BoardViewModel, DetailView, FilterCriteria, JobDetailView, JobRowView, ListStatus,
    ListViewModel,
};

use crate::commands::ViewMode;

const CELL_WIDTH: usize = 28;
const DATE_FORMAT: &str = "%d %b %Y";

pub fn render(view: &BoardViewModel, mode: ViewMode) -> String {
    match &view.detail {
        Some(detail) => render_detail(detail),
        None => render_list(&view.list, mode),
    }
}

pub fn render_list(list: &ListViewModel, mode: ViewMode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", filter_summary(&list.criteria));

    match &list.status {
        ListStatus::Idle => {}
        ListStatus::Loading => out.push_str("Loading jobs...\n"),
        ListStatus::Error(message) => {
            let _ = writeln!(out, "Error fetching jobs: {message}");
        }
        ListStatus::NoResults => out.push_str("No jobs found.\n"),
        ListStatus::Results => {
            match mode {
                ViewMode::Table => out.push_str(&render_table(&list.rows)),
                ViewMode::Grid => out.push_str(&render_grid(&list.rows)),
            }
            if let Some(line) = pagination_line(list) {
                let _ = writeln!(out, "{line}");
            }
            let _ = writeln!(
                out,
                "Page {} of {} ({} jobs)",
                list.current_page, list.total_pages, list.total_jobs
            );
        }
    }
    out
}

fn filter_summary(criteria: &FilterCriteria) -> String {
    let mut parts = vec![format!("type={}", criteria.job_type.label())];
    if !criteria.search_term.is_empty() {
        parts.insert(0, format!("search={:?}", criteria.search_term));
    }
    if !criteria.location.is_empty() {
        parts.push(format!("location={:?}", criteria.location));
    }
    if !criteria.skills.is_empty() {
        parts.push(format!("skills={}", criteria.skills.join(",")));
    }
    format!("Filters: {}", parts.join(" "))
}

fn render_table(rows: &[JobRowView]) -> String {
    let headers = ["#", "Job Title", "Job Type", "Skills", "Languages", "Tags"];
    let cells: Vec<[String; 6]> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            [
                (index + 1).to_string(),
                truncate(&row.title),
                truncate(&row.job_type),
                truncate(&row.skills.join(", ")),
                truncate(&row.languages.join(", ")),
                truncate(&row.tags.join(", ")),
            ]
        })
        .collect();

    let mut widths = headers.map(|header| header.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

fn render_grid(rows: &[JobRowView]) -> String {
    let mut out = String::new();
    for (index, row) in rows.iter().enumerate() {
        let _ = writeln!(out, "[{}] {}", index + 1, row.title);
        if !row.company_name.is_empty() {
            let _ = writeln!(out, "    {}", row.company_name);
        }
        let _ = writeln!(out, "    Type: {}", row.job_type);
        let _ = writeln!(out, "    Skills: {}", row.skills.join(", "));
        let _ = writeln!(out, "    Languages: {}", row.languages.join(", "));
        let _ = writeln!(out, "    Tags: {}", row.tags.join(", "));
        out.push('\n');
    }
    out
}

/// `‹ 1 [2] 3 ›`, or `None` when there is at most one page.
pub fn pagination_line(list: &ListViewModel) -> Option<String> {
    if !list.show_pagination {
        return None;
    }
    let pages: Vec<String> = (1..=list.total_pages)
        .map(|page| {
            if page == list.current_page {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect();
    Some(format!("‹ {} ›", pages.join(" ")))
}

pub fn render_detail(detail: &DetailView) -> String {
    match detail {
        DetailView::Loading { job_id } => format!("Loading job {job_id}...\n"),
        DetailView::Error { job_id, message } => {
            format!("Error fetching job {job_id}: {message}\n(type 'back' to return)\n")
        }
        DetailView::Loaded(job) => render_job(job),
    }
}

fn render_job(job: &JobDetailView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", job.title);
    let _ = writeln!(out, "{}", "=".repeat(job.title.chars().count().max(1)));
    if !job.company_name.is_empty() {
        let _ = writeln!(out, "Company:   {}", job.company_name);
    }
    if !job.location.is_empty() {
        let _ = writeln!(out, "Location:  {}", job.location);
    }
    if let Some(salary) = &job.salary {
        let _ = writeln!(out, "Salary:    {salary}");
    }
    if let Some(duration) = duration(&job.start_date, &job.end_date) {
        let _ = writeln!(out, "Duration:  {duration}");
    }
    let _ = writeln!(out, "Job type:  {}", job.job_type);
    if !job.skills.is_empty() {
        let _ = writeln!(out, "Skills:    {}", job.skills.join(", "));
    }
    if !job.languages.is_empty() {
        let _ = writeln!(out, "Languages: {}", job.languages.join(", "));
    }
    let _ = writeln!(out, "Applicants: {}", job.total_applicants);
    if !job.required_documents.is_empty() {
        let _ = writeln!(out, "Apply with: {}", job.required_documents.join(", "));
    }
    if !job.description.is_empty() {
        let _ = writeln!(out, "\n{}", job.description.trim());
    }
    out.push_str("\n(type 'back' to return)\n");
    out
}

fn duration(start: &str, end: &str) -> Option<String> {
    match (start.trim(), end.trim()) {
        ("", "") => None,
        (start, "") => Some(format!("from {}", format_date(start))),
        ("", end) => Some(format!("until {}", format_date(end))),
        (start, end) => Some(format!("{} - {}", format_date(start), format_date(end))),
    }
}

/// Formats ISO dates and timestamps; anything else is shown as sent.
pub fn format_date(raw: &str) -> String {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return at.format(DATE_FORMAT).to_string();
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return at.format(DATE_FORMAT).to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format(DATE_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= CELL_WIDTH {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}
