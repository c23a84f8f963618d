//! The main board page: header, toolbar, job list and detail pane.

use askama::Template;

use super::options::{with_current, SelectOption};
use super::paths::path_segment;
use crate::board::pipeline::parse_posted;
use crate::models::job::TYPE_FILTER_OPTIONS;
use crate::models::{Application, BoardState, Job, Role, SortOrder};

const CARD_TAG_LIMIT: usize = 4;
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    role: &'a str,
    is_recruiter: bool,
    role_options: Vec<SelectOption>,
    query: &'a str,
    type_options: Vec<SelectOption>,
    sort_options: Vec<SelectOption>,
    notice: Option<&'a str>,
    result_count: usize,
    cards: Vec<JobCard<'a>>,
    details: Option<JobDetails<'a>>,
}

struct JobCard<'a> {
    path: String,
    title: &'a str,
    company: &'a str,
    location: &'a str,
    badges: Vec<&'a str>,
    selected: bool,
}

struct JobDetails<'a> {
    path: String,
    title: &'a str,
    company: &'a str,
    location: &'a str,
    description: &'a str,
    tags: String,
    salary: &'a str,
    posted: String,
    applications: Vec<ApplicantRow<'a>>,
}

struct ApplicantRow<'a> {
    name: &'a str,
    email: &'a str,
    date: String,
}

pub fn render_page(state: &BoardState, notice: Option<&str>) -> askama::Result<String> {
    let role_options = Role::ALL
        .iter()
        .map(|r| SelectOption::new(r.as_str(), r.as_str(), *r == state.role))
        .collect();
    let sort_options = [SortOrder::Newest, SortOrder::Oldest]
        .iter()
        .map(|s| SelectOption::new(s.as_str(), s.label(), *s == state.sort))
        .collect();

    PageTemplate {
        role: state.role.as_str(),
        is_recruiter: state.role == Role::Recruiter,
        role_options,
        query: &state.query,
        type_options: with_current(TYPE_FILTER_OPTIONS, &state.type_filter),
        sort_options,
        notice,
        result_count: state.filtered.len(),
        cards: state.filtered.iter().map(|job| job_card(job, state)).collect(),
        details: state.selected_job().map(|job| job_details(job, state)),
    }
    .render()
}

fn job_card<'a>(job: &'a Job, state: &BoardState) -> JobCard<'a> {
    JobCard {
        path: path_segment(&job.id),
        title: &job.title,
        company: &job.company,
        location: &job.location,
        badges: job.tags.iter().take(CARD_TAG_LIMIT).map(String::as_str).collect(),
        selected: state.selected_id.as_deref() == Some(job.id.as_str()),
    }
}

fn job_details<'a>(job: &'a Job, state: &'a BoardState) -> JobDetails<'a> {
    let description = if job.description.is_empty() {
        "No description provided."
    } else {
        job.description.as_str()
    };
    // Applicants are only listed to recruiters.
    let applications = match state.role {
        Role::Recruiter => state
            .applications_for(&job.id)
            .iter()
            .map(applicant_row)
            .collect(),
        Role::JobSeeker => Vec::new(),
    };
    JobDetails {
        path: path_segment(&job.id),
        title: &job.title,
        company: &job.company,
        location: &job.location,
        description,
        tags: job.tags.join(", "),
        salary: &job.salary,
        posted: display_posted(&job.date_posted),
        applications,
    }
}

fn applicant_row(app: &Application) -> ApplicantRow<'_> {
    ApplicantRow {
        name: &app.name,
        email: &app.email,
        date: app.date.format(DATE_FORMAT).to_string(),
    }
}

fn display_posted(raw: &str) -> String {
    parse_posted(raw)
        .map(|dt| dt.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}
