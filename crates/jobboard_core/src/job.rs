use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier the API sends either as a JSON string or as a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseId {
    Number(i64),
    Text(String),
}

impl fmt::Display for LooseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LooseId::Number(n) => write!(f, "{n}"),
            LooseId::Text(s) => f.write_str(s),
        }
    }
}

/// A posted job as returned by the job API.
///
/// Only `id` and `job_title` are required. Free-text and flag fields that are
/// missing or `null` fall back to their default value; fields whose absence is
/// meaningful to the views are kept as `Option`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub reference: Option<String>,
    pub job_title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub job_description: String,
    /// Raw job type string, e.g. `hybrid` or `full-time`.
    #[serde(default, deserialize_with = "nullable")]
    pub job_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub job_location_name: String,
    #[serde(default)]
    pub country_of_residence: Option<String>,

    #[serde(default)]
    pub salary_currency: Option<String>,
    #[serde(default)]
    pub salary_range_min: Option<f64>,
    #[serde(default)]
    pub salary_range_max: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub filter_out_salary_range: bool,

    /// Comma-separated in the API payload; see [`Job::skills`].
    #[serde(default, deserialize_with = "nullable")]
    pub required_skills: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: String,
    #[serde(default, deserialize_with = "nullable")]
    pub languages: String,
    #[serde(default, deserialize_with = "nullable")]
    pub educational_requirements: String,
    #[serde(default, deserialize_with = "nullable")]
    pub additional_benefits: String,
    #[serde(default, deserialize_with = "nullable")]
    pub years_of_experience_required: String,

    #[serde(default, deserialize_with = "nullable")]
    pub start_date: String,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: String,
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
    #[serde(default, deserialize_with = "nullable")]
    pub updated_at: String,

    #[serde(default, deserialize_with = "nullable")]
    pub company_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub company_website: String,
    #[serde(default, deserialize_with = "nullable")]
    pub company_description: String,
    #[serde(default)]
    pub company_logo: Option<String>,
    #[serde(default)]
    pub company_id: Option<LooseId>,
    #[serde(default)]
    pub recruiter_id: Option<LooseId>,
    #[serde(default)]
    pub user: Option<JobUser>,

    #[serde(default, deserialize_with = "nullable")]
    pub visibility_public: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub visibility_private: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub require_cv: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub require_cover_letter: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub require_voicenote: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub hide_personal_details_during_screening: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub minimum_fit_score: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub filter_minimum_fit_score: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub auto_send_interview_mail_on_close: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub candidate_interview_count: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub total_applicants: u32,
    #[serde(default)]
    pub interview_link: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub questions: Vec<JobQuestion>,
}

/// Recruiter account that owns a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobUser {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable")]
    pub role: String,
    #[serde(default, deserialize_with = "nullable")]
    pub is_verified: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub channel: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub calendly_link: Option<String>,
    #[serde(default)]
    pub google_calender_link: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
    #[serde(default, deserialize_with = "nullable")]
    pub updated_at: String,
}

/// Screening question attached to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobQuestion {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub text: String,
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
    #[serde(default, deserialize_with = "nullable")]
    pub updated_at: String,
}

impl Job {
    pub fn skills(&self) -> Vec<String> {
        split_list(&self.required_skills)
    }

    pub fn tags(&self) -> Vec<String> {
        split_list(&self.tags)
    }

    pub fn languages(&self) -> Vec<String> {
        split_list(&self.languages)
    }

    /// `"{currency} {min} - {max}"`, or `None` when the job carries no salary.
    pub fn salary_label(&self) -> Option<String> {
        if self.salary_range_min.is_none() && self.salary_range_max.is_none() {
            return None;
        }
        let amount = |value: Option<f64>| value.map(format_amount).unwrap_or_else(|| "?".into());
        let range = format!(
            "{} - {}",
            amount(self.salary_range_min),
            amount(self.salary_range_max)
        );
        Some(match self.salary_currency.as_deref().map(str::trim) {
            Some(currency) if !currency.is_empty() => format!("{currency} {range}"),
            _ => range,
        })
    }
}

/// Split a comma-separated API field into trimmed, non-empty entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    LooseId::deserialize(deserializer).map(|id| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::{split_list, Job, LooseId};

    fn minimal() -> serde_json::Value {
        serde_json::json!({ "id": "abc123", "job_title": "Rust Engineer" })
    }

    #[test]
    fn minimal_payload_fills_defaults() {
        let job: Job = serde_json::from_value(minimal()).unwrap();
        assert_eq!(job.id, "abc123");
        assert_eq!(job.job_title, "Rust Engineer");
        assert_eq!(job.job_description, "");
        assert!(job.questions.is_empty());
        assert_eq!(job.salary_label(), None);
    }

    #[test]
    fn numeric_ids_and_nulls_are_accepted() {
        let job: Job = serde_json::from_value(serde_json::json!({
            "id": 42,
            "job_title": "Backend",
            "job_description": null,
            "company_id": 7,
            "recruiter_id": "r-9",
            "total_applicants": null,
            "questions": [{ "id": 1, "text": "Why us?" }],
            "user": { "id": "u1", "name": "Ada", "email": "ada@example.com", "is_verified": true }
        }))
        .unwrap();
        assert_eq!(job.id, "42");
        assert_eq!(job.job_description, "");
        assert_eq!(job.company_id, Some(LooseId::Number(7)));
        assert_eq!(job.recruiter_id, Some(LooseId::Text("r-9".into())));
        assert_eq!(job.total_applicants, 0);
        assert_eq!(job.questions[0].id, "1");
        assert_eq!(job.user.as_ref().map(|u| u.name.as_str()), Some("Ada"));
    }

    #[test]
    fn missing_title_is_rejected() {
        let result: Result<Job, _> = serde_json::from_value(serde_json::json!({ "id": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn list_fields_split_on_commas() {
        let mut value = minimal();
        value["required_skills"] = "Rust, Tokio,, SQL ".into();
        let job: Job = serde_json::from_value(value).unwrap();
        assert_eq!(job.skills(), vec!["Rust", "Tokio", "SQL"]);
        assert!(split_list("  ").is_empty());
    }

    #[test]
    fn salary_label_formats_range() {
        let mut value = minimal();
        value["salary_currency"] = "USD".into();
        value["salary_range_min"] = 50000.into();
        value["salary_range_max"] = serde_json::json!(72500.5);
        let job: Job = serde_json::from_value(value).unwrap();
        assert_eq!(job.salary_label().as_deref(), Some("USD 50000 - 72500.50"));
    }
}
