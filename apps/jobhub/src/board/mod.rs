//! The domain store. `JobBoard` owns the board state; every mutation goes
//! through `commit`, which recomputes the visible list, applies the
//! auto-selection rule and publishes an immutable snapshot to subscribers.

pub mod pipeline;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::errors::AppError;
use crate::models::{Application, ApplicationForm, BoardState, Job, JobPayload, Role, SortOrder};
use crate::persistence::Persistence;
use crate::source::normalize::{generate_id, timestamp};
use crate::source::{normalize_all, JobSource, RawJob, SourceError};

pub use pipeline::filter_sort;

pub type SharedBoard = Arc<Mutex<JobBoard>>;
pub type Snapshot = Arc<BoardState>;

pub const DELETE_PROMPT: &str = "Delete this job?";

/// Asks the user to confirm a destructive action.
pub trait ConfirmPrompt: Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// An answer collected before the call, e.g. from a confirmation form.
impl ConfirmPrompt for bool {
    fn confirm(&self, _message: &str) -> bool {
        *self
    }
}

pub struct JobBoard {
    state: BoardState,
    persistence: Persistence,
    /// Set once the job list has been chosen (stored, fetched, or edited).
    /// A remote fetch that resolves afterwards is discarded.
    jobs_settled: bool,
    tx: watch::Sender<Snapshot>,
}

impl JobBoard {
    pub fn new(persistence: Persistence) -> Self {
        let state = BoardState::default();
        let (tx, _rx) = watch::channel(Arc::new(state.clone()));
        Self {
            state,
            persistence,
            jobs_settled: false,
            tx,
        }
    }

    pub fn into_shared(self) -> SharedBoard {
        Arc::new(Mutex::new(self))
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    #[cfg(test)]
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    fn commit(&mut self) {
        self.state.filtered = filter_sort(
            &self.state.jobs,
            &self.state.query,
            &self.state.type_filter,
            self.state.sort,
        );
        if self.state.selected_id.is_none() {
            self.state.selected_id = self.state.filtered.first().map(|j| j.id.clone());
        }
        self.state.revision += 1;
        self.tx.send_replace(Arc::new(self.state.clone()));
        debug!(
            "Published snapshot r{} ({} of {} jobs visible)",
            self.state.revision,
            self.state.filtered.len(),
            self.state.jobs.len()
        );
    }

    // ── startup ────────────────────────────────────────────────────────────

    /// Loads applications, role and jobs from the store. Returns whether a job list was stored.
    pub async fn restore(&mut self) -> bool {
        self.state.apps = self.persistence.load_apps().await;
        if let Some(role) = self.persistence.load_role().await {
            self.state.role = role;
        }

        let found = match self.persistence.load_jobs().await {
            Some(jobs) => {
                info!("Restored {} stored jobs", jobs.len());
                self.state.jobs = jobs;
                self.jobs_settled = true;
                true
            }
            None => false,
        };
        self.commit();
        found
    }

    /// Adopts the remote feed as the job list, unless the list was settled meanwhile.
    /// A failed fetch leaves the board empty; it is never surfaced to the user.
    pub async fn adopt_remote(&mut self, fetched: Result<Vec<RawJob>, SourceError>) {
        if self.jobs_settled {
            info!("Job list already settled; discarding remote feed");
            return;
        }
        self.jobs_settled = true;

        match fetched {
            Ok(raw) => {
                let jobs = normalize_all(&raw, Utc::now());
                if let Err(e) = self.persistence.save_jobs(&jobs).await {
                    error!("Failed to persist fetched jobs: {e}");
                }
                info!("Loaded {} jobs from remote source", jobs.len());
                self.state.jobs = jobs;
            }
            Err(e) => {
                error!("Failed to fetch jobs: {e}");
                self.state.jobs = Vec::new();
            }
        }
        self.commit();
    }

    /// Stored jobs if present, otherwise the remote feed, on an unshared
    /// board. Holds `&mut self` across the fetch; a served board starts
    /// through [`bootstrap`].
    #[cfg(test)]
    pub async fn initialize(&mut self, source: &dyn JobSource) {
        if !self.restore().await {
            let fetched = source.fetch_jobs().await;
            self.adopt_remote(fetched).await;
        }
    }

    // ── view state ─────────────────────────────────────────────────────────

    pub async fn set_role(&mut self, role: Role) -> Result<(), AppError> {
        self.persistence.save_role(role).await?;
        self.state.role = role;
        info!("Role set to {role}");
        self.commit();
        Ok(())
    }

    pub fn set_query(&mut self, query: &str) {
        self.state.query = query.trim().to_string();
        self.commit();
    }

    pub fn set_type_filter(&mut self, type_filter: &str) {
        self.state.type_filter = type_filter.to_string();
        self.commit();
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.state.sort = sort;
        self.commit();
    }

    /// No existence check; a dangling id renders as "nothing selected".
    pub fn select(&mut self, id: &str) {
        self.state.selected_id = Some(id.to_string());
        self.commit();
    }

    // ── jobs ───────────────────────────────────────────────────────────────

    /// Saves the add/edit form. Edits keep the job's id and original posting date;
    /// new jobs go to the front of the list.
    pub async fn create_or_update_job(
        &mut self,
        payload: JobPayload,
        editing_id: Option<&str>,
    ) -> Result<Job, AppError> {
        if !payload.has_required_fields() {
            return Err(AppError::Validation("Title and Company required".to_string()));
        }

        let mut jobs = self.state.jobs.clone();
        let saved = match editing_id {
            Some(id) => {
                let pos = jobs
                    .iter()
                    .position(|j| j.id == id)
                    .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
                let original = &jobs[pos];
                let job = payload.into_job(original.id.clone(), original.date_posted.clone());
                jobs[pos] = job.clone();
                job
            }
            None => {
                let job = payload.into_job(generate_id(), timestamp(Utc::now()));
                jobs.insert(0, job.clone());
                job
            }
        };

        self.persistence.save_jobs(&jobs).await?;
        self.state.jobs = jobs;
        self.jobs_settled = true;
        info!(
            "{} job {} ({})",
            if editing_id.is_some() { "Updated" } else { "Created" },
            saved.id,
            saved.title
        );
        self.commit();
        Ok(saved)
    }

    /// Returns `Ok(false)` when the user declines.
    pub async fn delete_job(
        &mut self,
        id: &str,
        prompt: &dyn ConfirmPrompt,
    ) -> Result<bool, AppError> {
        if !prompt.confirm(DELETE_PROMPT) {
            debug!("Delete of job {id} cancelled");
            return Ok(false);
        }

        let jobs: Vec<Job> = self
            .state
            .jobs
            .iter()
            .filter(|j| j.id != id)
            .cloned()
            .collect();
        self.persistence.save_jobs(&jobs).await?;
        self.state.jobs = jobs;
        self.jobs_settled = true;
        if self.state.selected_id.as_deref() == Some(id) {
            self.state.selected_id = None;
        }
        info!("Deleted job {id}");
        self.commit();
        Ok(true)
    }

    // ── applications ───────────────────────────────────────────────────────

    pub async fn submit_application(
        &mut self,
        job_id: &str,
        form: ApplicationForm,
    ) -> Result<Application, AppError> {
        let name = form.name.trim();
        let email = form.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(AppError::Validation("Name and email required".to_string()));
        }
        if self.state.job(job_id).is_none() {
            return Err(AppError::NotFound("Job not found".to_string()));
        }

        let application = Application {
            name: name.to_string(),
            email: email.to_string(),
            date: Utc::now(),
        };
        let mut apps = self.state.apps.clone();
        apps.entry(job_id.to_string())
            .or_default()
            .push(application.clone());

        self.persistence.save_apps(&apps).await?;
        self.state.apps = apps;
        info!("Application received for job {job_id}");
        self.commit();
        Ok(application)
    }
}

/// Startup sequence for a shared board. Stored state is restored before this
/// returns, so callers can start serving afterwards without a request racing
/// the restore. When nothing was stored the remote fetch runs on a spawned
/// task that takes the store lock only to adopt the result; requests are
/// served (with an empty list) meanwhile.
pub async fn bootstrap(board: SharedBoard, source: Arc<dyn JobSource>) -> Option<JoinHandle<()>> {
    if board.lock().await.restore().await {
        return None;
    }
    Some(tokio::spawn(async move {
        let fetched = source.fetch_jobs().await;
        board.lock().await.adopt_remote(fetched).await;
    }))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Notify;

    use super::*;
    use crate::persistence::{KvStore, MemoryStore, StoreError, JOBS_KEY};

    struct StaticSource(Vec<RawJob>);

    #[async_trait]
    impl JobSource for StaticSource {
        async fn fetch_jobs(&self) -> Result<Vec<RawJob>, SourceError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl JobSource for FailingSource {
        async fn fetch_jobs(&self) -> Result<Vec<RawJob>, SourceError> {
            Err(SourceError::Status(503))
        }
    }

    /// Holds its feed back until the gate is opened.
    struct GatedSource {
        gate: Arc<Notify>,
        feed: Vec<RawJob>,
    }

    #[async_trait]
    impl JobSource for GatedSource {
        async fn fetch_jobs(&self) -> Result<Vec<RawJob>, SourceError> {
            self.gate.notified().await;
            Ok(self.feed.clone())
        }
    }

    struct ReadOnlyStore;

    #[async_trait]
    impl KvStore for ReadOnlyStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    fn raw(value: serde_json::Value) -> RawJob {
        value.as_object().cloned().unwrap()
    }

    fn feed() -> Vec<RawJob> {
        vec![
            raw(json!({"id": "a", "title": "A", "company": "X", "type": "Full Time", "datePosted": "2024-01-01"})),
            raw(json!({"id": "b", "title": "B", "company": "Y", "type": "Part Time", "datePosted": "2024-06-01"})),
        ]
    }

    fn payload(title: &str, company: &str) -> JobPayload {
        JobPayload {
            title: title.to_string(),
            company: company.to_string(),
            ..Default::default()
        }
    }

    async fn seeded() -> (JobBoard, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let mut board = JobBoard::new(Persistence::new(store.clone()));
        board.initialize(&StaticSource(feed())).await;
        (board, store)
    }

    fn visible_ids(board: &JobBoard) -> Vec<String> {
        board.state().filtered.iter().map(|j| j.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_initialize_fetches_normalizes_and_persists() {
        let (board, store) = seeded().await;
        assert_eq!(visible_ids(&board), vec!["b", "a"]);
        assert_eq!(board.state().selected_id.as_deref(), Some("b"));
        assert!(store.get(JOBS_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_initialize_prefers_stored_jobs() {
        let (_, store) = seeded().await;
        let mut board = JobBoard::new(Persistence::new(store));
        board.initialize(&FailingSource).await;
        assert_eq!(board.state().jobs.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_empty_board() {
        let mut board = JobBoard::new(Persistence::new(Arc::new(MemoryStore::new())));
        board.initialize(&FailingSource).await;
        assert!(board.state().jobs.is_empty());
        assert!(board.state().selected_id.is_none());
    }

    #[tokio::test]
    async fn test_late_fetch_is_discarded_after_local_edit() {
        let mut board = JobBoard::new(Persistence::new(Arc::new(MemoryStore::new())));
        assert!(!board.restore().await);
        board
            .create_or_update_job(payload("Local", "Me"), None)
            .await
            .unwrap();
        board.adopt_remote(Ok(feed())).await;
        assert_eq!(board.state().jobs.len(), 1);
        assert_eq!(board.state().jobs[0].title, "Local");
    }

    #[tokio::test]
    async fn test_type_filter_narrows_visible_jobs() {
        let (mut board, _) = seeded().await;
        board.set_type_filter("Part Time");
        assert_eq!(visible_ids(&board), vec!["b"]);
    }

    #[tokio::test]
    async fn test_query_is_trimmed() {
        let (mut board, _) = seeded().await;
        board.set_query("  y ");
        assert_eq!(board.state().query, "y");
        assert_eq!(visible_ids(&board), vec!["b"]);
    }

    #[tokio::test]
    async fn test_create_with_empty_title_fails_without_change() {
        let (mut board, _) = seeded().await;
        let before = board.state().clone();
        let err = board
            .create_or_update_job(payload("", "Acme"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(board.state().jobs, before.jobs);
        assert_eq!(board.state().revision, before.revision);
    }

    #[tokio::test]
    async fn test_create_prepends_and_persists() {
        let (mut board, _) = seeded().await;
        let job = board
            .create_or_update_job(payload(" New ", " Co "), None)
            .await
            .unwrap();
        assert_eq!(board.state().jobs[0], job);
        assert_eq!(job.title, "New");
        assert_eq!(board.persistence.load_jobs().await.unwrap()[0].id, job.id);
    }

    #[tokio::test]
    async fn test_edit_keeps_original_date_posted() {
        let (mut board, _) = seeded().await;
        let original = board.state().job("a").cloned().unwrap();
        let mut edit = JobPayload::from_job(&original);
        edit.title = "A (renamed)".to_string();

        let saved = board.create_or_update_job(edit, Some("a")).await.unwrap();
        assert_eq!(saved.id, "a");
        assert_eq!(saved.title, "A (renamed)");
        assert_eq!(saved.date_posted, original.date_posted);
        assert_eq!(board.state().jobs.len(), 2);
    }

    #[tokio::test]
    async fn test_edit_of_unknown_job_is_not_found() {
        let (mut board, _) = seeded().await;
        let err = board
            .create_or_update_job(payload("T", "C"), Some("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_declined_delete_changes_nothing() {
        let (mut board, _) = seeded().await;
        assert!(!board.delete_job("a", &false).await.unwrap());
        assert_eq!(board.state().jobs.len(), 2);
    }

    #[tokio::test]
    async fn test_deleting_selected_job_reselects_first_visible() {
        let (mut board, _) = seeded().await;
        assert_eq!(board.state().selected_id.as_deref(), Some("b"));
        assert!(board.delete_job("b", &true).await.unwrap());
        assert!(board.state().job("b").is_none());
        assert_eq!(board.state().selected_id.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_selection_survives_filter_changes() {
        let (mut board, _) = seeded().await;
        board.select("a");
        board.set_type_filter("Part Time");
        assert_eq!(visible_ids(&board), vec!["b"]);
        assert_eq!(board.state().selected_id.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_dangling_selection_is_tolerated() {
        let (mut board, _) = seeded().await;
        board.select("nope");
        assert_eq!(board.state().selected_id.as_deref(), Some("nope"));
        assert!(board.state().selected_job().is_none());
    }

    #[tokio::test]
    async fn test_application_requires_name_and_email() {
        let (mut board, _) = seeded().await;
        let form = ApplicationForm {
            name: String::new(),
            email: "e@x.com".to_string(),
        };
        let err = board.submit_application("a", form).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(board.state().apps.is_empty());
    }

    #[tokio::test]
    async fn test_applications_append_in_order_and_persist() {
        let (mut board, _) = seeded().await;
        for name in ["first", "second"] {
            let form = ApplicationForm {
                name: name.to_string(),
                email: format!("{name}@x.com"),
            };
            board.submit_application("a", form).await.unwrap();
        }
        let names: Vec<_> = board
            .state()
            .applications_for("a")
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(board.persistence.load_apps().await, board.state().apps);
    }

    #[tokio::test]
    async fn test_role_persists_across_restarts() {
        let (mut board, store) = seeded().await;
        board.set_role(Role::Recruiter).await.unwrap();

        let mut reloaded = JobBoard::new(Persistence::new(store));
        reloaded.restore().await;
        assert_eq!(reloaded.state().role, Role::Recruiter);
        assert_eq!(reloaded.state().query, "");
    }

    #[tokio::test]
    async fn test_failed_save_leaves_state_unchanged() {
        let mut board = JobBoard::new(Persistence::new(Arc::new(ReadOnlyStore)));
        board.restore().await;
        let err = board
            .create_or_update_job(payload("T", "C"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
        assert!(board.state().jobs.is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_see_every_commit() {
        let (mut board, _) = seeded().await;
        let mut rx = board.subscribe();
        rx.borrow_and_update();
        board.set_sort(SortOrder::Oldest);
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.sort, SortOrder::Oldest);
        assert_eq!(snapshot.filtered[0].id, "a");
    }

    #[tokio::test]
    async fn test_bootstrap_shared_board() {
        let board = JobBoard::new(Persistence::new(Arc::new(MemoryStore::new()))).into_shared();
        let fetch = bootstrap(board.clone(), Arc::new(StaticSource(feed())))
            .await
            .expect("empty store starts a fetch");
        fetch.await.unwrap();
        assert_eq!(board.lock().await.state().jobs.len(), 2);
    }

    #[tokio::test]
    async fn test_bootstrap_restores_before_returning() {
        let (_, store) = seeded().await;
        let board = JobBoard::new(Persistence::new(store.clone())).into_shared();
        let fetch = bootstrap(board.clone(), Arc::new(FailingSource)).await;
        assert!(fetch.is_none());

        let mut guard = board.lock().await;
        assert_eq!(guard.state().jobs.len(), 2);
        guard
            .create_or_update_job(payload("Gamma", "Z"), None)
            .await
            .unwrap();
        assert_eq!(guard.state().jobs.len(), 3);
        drop(guard);

        let restarted = JobBoard::new(Persistence::new(store)).into_shared();
        assert!(bootstrap(restarted.clone(), Arc::new(FailingSource))
            .await
            .is_none());
        let titles: Vec<String> = restarted
            .lock()
            .await
            .state()
            .jobs
            .iter()
            .map(|j| j.title.clone())
            .collect();
        assert_eq!(titles, vec!["Gamma", "A", "B"]);
    }

    #[tokio::test]
    async fn test_pending_fetch_does_not_hold_the_lock() {
        let board = JobBoard::new(Persistence::new(Arc::new(MemoryStore::new()))).into_shared();
        let gate = Arc::new(Notify::new());
        let source = GatedSource {
            gate: gate.clone(),
            feed: feed(),
        };
        let fetch = bootstrap(board.clone(), Arc::new(source))
            .await
            .expect("empty store starts a fetch");

        let mut guard = tokio::time::timeout(Duration::from_secs(1), board.lock())
            .await
            .expect("board lock is free while the fetch is pending");
        guard
            .create_or_update_job(payload("Local", "Me"), None)
            .await
            .unwrap();
        drop(guard);

        gate.notify_one();
        fetch.await.unwrap();

        let guard = board.lock().await;
        assert_eq!(guard.state().jobs.len(), 1);
        assert_eq!(guard.state().jobs[0].title, "Local");
    }
}
