use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCATION: &str = "Remote";
pub const DEFAULT_JOB_TYPE: &str = "Full Time";

/// Options offered by the type selector. The filter itself accepts any string.
pub const TYPE_FILTER_OPTIONS: &[&str] = &["All", "Full Time", "Part Time", "Remote", "Contract"];
pub const TYPE_FILTER_ALL: &str = "All";

/// A job posting. Field names follow the stored blob format (`type`, `datePosted`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type", default)]
    pub job_type: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date_posted: String,
}

/// Raw add/edit form input, before trimming and defaulting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub salary: String,
    /// Comma-separated.
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub description: String,
}

impl JobPayload {
    /// Prefills the form from an existing job.
    pub fn from_job(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            job_type: job.job_type.clone(),
            salary: job.salary.clone(),
            tags: job.tags.join(", "),
            description: job.description.clone(),
        }
    }

    pub fn parsed_tags(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Builds the job record this payload describes. Callers validate first.
    pub fn into_job(self, id: String, date_posted: String) -> Job {
        let tags = self.parsed_tags();
        Job {
            id,
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            location: non_empty_or(self.location.trim(), DEFAULT_LOCATION),
            job_type: non_empty_or(self.job_type.trim(), DEFAULT_JOB_TYPE),
            salary: self.salary.trim().to_string(),
            tags,
            description: self.description.trim().to_string(),
            date_posted,
        }
    }

    pub fn has_required_fields(&self) -> bool {
        !self.title.trim().is_empty() && !self.company.trim().is_empty()
    }
}

fn non_empty_or(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
