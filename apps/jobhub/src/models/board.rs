use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::application::{Application, Applications};
use crate::models::job::{Job, TYPE_FILTER_ALL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "Job Seeker")]
    JobSeeker,
    #[serde(rename = "Recruiter")]
    Recruiter,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::JobSeeker, Role::Recruiter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::JobSeeker => "Job Seeker",
            Role::Recruiter => "Recruiter",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest",
            SortOrder::Oldest => "Oldest",
        }
    }
}

/// The whole client state. `filtered` is derived and only written by the store's commit path.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    pub jobs: Vec<Job>,
    pub filtered: Vec<Job>,
    pub selected_id: Option<String>,
    pub role: Role,
    pub query: String,
    pub type_filter: String,
    pub sort: SortOrder,
    pub apps: Applications,
    /// Bumped on every published snapshot.
    pub revision: u64,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            filtered: Vec::new(),
            selected_id: None,
            role: Role::default(),
            query: String::new(),
            type_filter: TYPE_FILTER_ALL.to_string(),
            sort: SortOrder::default(),
            apps: Applications::new(),
            revision: 0,
        }
    }
}

impl BoardState {
    /// The selected job, if the selection still refers to a job in the list.
    pub fn selected_job(&self) -> Option<&Job> {
        let id = self.selected_id.as_deref()?;
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn applications_for(&self, job_id: &str) -> &[Application] {
        self.apps.get(job_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_display_string() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_sort_order_serde() {
        let s: SortOrder = serde_json::from_str("\"oldest\"").unwrap();
        assert_eq!(s, SortOrder::Oldest);
    }

    #[test]
    fn test_dangling_selection_resolves_to_none() {
        let state = BoardState {
            selected_id: Some("gone".to_string()),
            ..Default::default()
        };
        assert!(state.selected_job().is_none());
    }
}
