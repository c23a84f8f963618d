use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::RawJob;
use crate::models::job::{Job, DEFAULT_JOB_TYPE, DEFAULT_LOCATION};

/// Where to look for a field in a raw listing.
#[derive(Debug, Clone, Copy)]
enum Accessor {
    Key(&'static str),
    /// `outer.inner`, e.g. `company.name`.
    Nested(&'static str, &'static str),
}

impl Accessor {
    fn lookup<'a>(&self, raw: &'a RawJob) -> Option<&'a Value> {
        match *self {
            Accessor::Key(key) => raw.get(key),
            Accessor::Nested(outer, inner) => raw.get(outer)?.get(inner),
        }
    }
}

/// Ordered accessors tried first to last, then the default.
struct FieldChain {
    accessors: &'static [Accessor],
    default: &'static str,
}

impl FieldChain {
    fn resolve(&self, raw: &RawJob) -> Option<String> {
        self.accessors
            .iter()
            .find_map(|a| a.lookup(raw).and_then(present_text))
    }

    fn resolve_or_default(&self, raw: &RawJob) -> String {
        self.resolve(raw)
            .unwrap_or_else(|| self.default.to_string())
    }
}

const ID: FieldChain = FieldChain {
    accessors: &[Accessor::Key("id")],
    default: "",
};
const TITLE: FieldChain = FieldChain {
    accessors: &[Accessor::Key("title"), Accessor::Key("role")],
    default: "Untitled",
};
const COMPANY: FieldChain = FieldChain {
    accessors: &[Accessor::Nested("company", "name"), Accessor::Key("company")],
    default: "Company",
};
const LOCATION: FieldChain = FieldChain {
    accessors: &[Accessor::Key("location")],
    default: DEFAULT_LOCATION,
};
const JOB_TYPE: FieldChain = FieldChain {
    accessors: &[Accessor::Key("type"), Accessor::Key("jobType")],
    default: DEFAULT_JOB_TYPE,
};
const SALARY: FieldChain = FieldChain {
    accessors: &[Accessor::Key("salary"), Accessor::Key("compensation")],
    default: "",
};
const DESCRIPTION: FieldChain = FieldChain {
    accessors: &[Accessor::Key("description"), Accessor::Key("summary")],
    default: "",
};
const DATE_POSTED: FieldChain = FieldChain {
    accessors: &[Accessor::Key("datePosted")],
    default: "",
};

const MAX_SKILL_TAGS: usize = 4;

/// Non-empty strings and numbers count as present; everything else falls through.
fn present_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(items.iter().filter_map(present_text).collect())
}

fn resolve_tags(raw: &RawJob) -> Vec<String> {
    if let Some(tags) = raw.get("tags").and_then(string_list) {
        return tags;
    }
    raw.get("skills")
        .and_then(string_list)
        .map(|skills| skills.into_iter().take(MAX_SKILL_TAGS).collect())
        .unwrap_or_default()
}

pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Maps one raw listing onto a `Job`, filling every missing field with its default.
pub fn normalize(raw: &RawJob, now: DateTime<Utc>) -> Job {
    Job {
        id: ID.resolve(raw).unwrap_or_else(generate_id),
        title: TITLE.resolve_or_default(raw),
        company: COMPANY.resolve_or_default(raw),
        location: LOCATION.resolve_or_default(raw),
        job_type: JOB_TYPE.resolve_or_default(raw),
        salary: SALARY.resolve_or_default(raw),
        description: DESCRIPTION.resolve_or_default(raw),
        tags: resolve_tags(raw),
        date_posted: DATE_POSTED.resolve(raw).unwrap_or_else(|| timestamp(now)),
    }
}

/// Normalizes a feed, replacing any id already used earlier in the batch.
pub fn normalize_all(raw: &[RawJob], now: DateTime<Utc>) -> Vec<Job> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|r| {
            let mut job = normalize(r, now);
            if !seen.insert(job.id.clone()) {
                job.id = generate_id();
                seen.insert(job.id.clone());
            }
            job
        })
        .collect()
}
