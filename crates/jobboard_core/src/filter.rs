use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::job::split_list;

/// Job type filter offered by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    #[default]
    Hybrid,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Hybrid,
    ];

    /// Wire name, as sent in the `job_type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Hybrid => "hybrid",
        }
    }

    /// Human label, as shown in the filter summary.
    pub fn label(self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterParseError {
    #[error("unknown job type {0:?} (expected one of full-time, part-time, contract, hybrid)")]
    UnknownJobType(String),
}

impl FromStr for JobType {
    type Err = FilterParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        JobType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| FilterParseError::UnknownJobType(raw.trim().to_string()))
    }
}

/// Search and filter parameters sent with every list query.
///
/// Serializes to exactly the request body of the open-jobs endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_term: String,
    pub job_type: JobType,
    pub location: String,
    pub skills: Vec<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `change` applied.
    pub fn with_change(&self, change: FilterChange) -> Self {
        let mut next = self.clone();
        match change {
            FilterChange::SearchTerm(term) => next.search_term = term,
            FilterChange::JobType(kind) => next.job_type = kind,
            FilterChange::Location(location) => next.location = location,
            FilterChange::Skills(skills) => next.skills = skills,
        }
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    SearchTerm,
    JobType,
    Location,
    Skills,
}

/// A single edit to one filter field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    SearchTerm(String),
    JobType(JobType),
    Location(String),
    Skills(Vec<String>),
}

impl FilterChange {
    /// Build a change from raw user input for `field`.
    ///
    /// Skills are comma-separated; the job type must name one of [`JobType::ALL`].
    pub fn parse(field: FilterField, raw: &str) -> Result<Self, FilterParseError> {
        Ok(match field {
            FilterField::SearchTerm => FilterChange::SearchTerm(raw.to_string()),
            FilterField::JobType => FilterChange::JobType(raw.parse()?),
            FilterField::Location => FilterChange::Location(raw.to_string()),
            FilterField::Skills => FilterChange::Skills(split_list(raw)),
        })
    }

    pub fn field(&self) -> FilterField {
        match self {
            FilterChange::SearchTerm(_) => FilterField::SearchTerm,
            FilterChange::JobType(_) => FilterField::JobType,
            FilterChange::Location(_) => FilterField::Location,
            FilterChange::Skills(_) => FilterField::Skills,
        }
    }
}
