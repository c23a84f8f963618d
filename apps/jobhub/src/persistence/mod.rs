//! Persistence adapter: the job list, the application map and the role, each
//! stored as one blob. Reads fail soft (anything unreadable is "nothing
//! stored"); writes overwrite the whole blob.

mod kv;

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub use kv::{KvStore, MemoryStore, RedisStore};

use crate::models::{Applications, Job, Role};

pub const JOBS_KEY: &str = "jobhub_jobs";
pub const APPS_KEY: &str = "jobhub_applications";
pub const ROLE_KEY: &str = "jobhub_role";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KvStore>,
}

impl Persistence {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn load_jobs(&self) -> Option<Vec<Job>> {
        self.load_json(JOBS_KEY).await
    }

    pub async fn save_jobs(&self, jobs: &[Job]) -> Result<(), StoreError> {
        self.save_json(JOBS_KEY, jobs).await
    }

    /// Absent or unreadable maps load as empty.
    pub async fn load_apps(&self) -> Applications {
        self.load_json(APPS_KEY).await.unwrap_or_default()
    }

    pub async fn save_apps(&self, apps: &Applications) -> Result<(), StoreError> {
        self.save_json(APPS_KEY, apps).await
    }

    pub async fn load_role(&self) -> Option<Role> {
        let raw = self.load_raw(ROLE_KEY).await?;
        match raw.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => {
                warn!("Ignoring unknown stored role '{raw}'");
                None
            }
        }
    }

    pub async fn save_role(&self, role: Role) -> Result<(), StoreError> {
        self.store.set(ROLE_KEY, role.as_str()).await?;
        debug!("Saved role {role}");
        Ok(())
    }

    async fn load_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read '{key}' from store: {e}");
                None
            }
        }
    }

    async fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.load_raw(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring malformed '{key}' blob: {e}");
                None
            }
        }
    }

    async fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let blob = serde_json::to_string(value)?;
        self.store.set(key, &blob).await?;
        debug!("Saved '{key}' ({} bytes)", blob.len());
        Ok(())
    }
}
