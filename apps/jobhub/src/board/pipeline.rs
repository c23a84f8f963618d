//! Filter → search → sort. Pure; the store calls it on every commit.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::job::{Job, TYPE_FILTER_ALL};
use crate::models::SortOrder;

/// Parses `datePosted`. Accepts RFC 3339, naive date-times (taken as UTC) and bare dates.
pub fn parse_posted(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn matches_type(job: &Job, type_filter: &str) -> bool {
    type_filter == TYPE_FILTER_ALL || job.job_type.to_lowercase() == type_filter.to_lowercase()
}

fn matches_query(job: &Job, needle: &str) -> bool {
    needle.is_empty()
        || job.title.to_lowercase().contains(needle)
        || job.company.to_lowercase().contains(needle)
        || job.tags.join(" ").to_lowercase().contains(needle)
}

/// Unparseable dates sort as older than any real date.
fn compare_posted(a: &Option<DateTime<Utc>>, b: &Option<DateTime<Utc>>) -> Ordering {
    a.cmp(b)
}

/// Computes the visible job list. Stable: jobs with equal dates keep their relative order.
pub fn filter_sort(jobs: &[Job], query: &str, type_filter: &str, sort: SortOrder) -> Vec<Job> {
    let needle = query.to_lowercase();

    let mut visible: Vec<(Option<DateTime<Utc>>, &Job)> = jobs
        .iter()
        .filter(|job| matches_type(job, type_filter))
        .filter(|job| matches_query(job, &needle))
        .map(|job| (parse_posted(&job.date_posted), job))
        .collect();

    // sort_by is stable
    visible.sort_by(|(a, _), (b, _)| match sort {
        SortOrder::Newest => compare_posted(b, a),
        SortOrder::Oldest => compare_posted(a, b),
    });

    visible.into_iter().map(|(_, job)| job.clone()).collect()
}
