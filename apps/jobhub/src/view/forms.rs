use askama::Template;

use super::options::{with_current, SelectOption};
use super::paths::path_segment;
use crate::board::DELETE_PROMPT;
use crate::models::job::{TYPE_FILTER_ALL, TYPE_FILTER_OPTIONS};
use crate::models::{Job, JobPayload};

#[derive(Template)]
#[template(path = "job_form.html")]
struct JobFormTemplate<'a> {
    heading: &'a str,
    editing_id: Option<&'a str>,
    payload: &'a JobPayload,
    type_options: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "confirm_delete.html")]
struct ConfirmDeleteTemplate<'a> {
    prompt: &'a str,
    path: String,
    title: &'a str,
    company: &'a str,
}

/// Add form when `editing_id` is `None`, edit form otherwise.
pub fn render_job_form(payload: &JobPayload, editing_id: Option<&str>) -> askama::Result<String> {
    let job_types: Vec<&str> = TYPE_FILTER_OPTIONS
        .iter()
        .copied()
        .filter(|t| *t != TYPE_FILTER_ALL)
        .collect();
    JobFormTemplate {
        heading: if editing_id.is_some() { "Edit Job" } else { "Add Job" },
        editing_id,
        payload,
        type_options: with_current(&job_types, &payload.job_type),
    }
    .render()
}

pub fn render_delete_confirmation(job: &Job) -> askama::Result<String> {
    ConfirmDeleteTemplate {
        prompt: DELETE_PROMPT,
        path: path_segment(&job.id),
        title: &job.title,
        company: &job.company,
    }
    .render()
}
