//! Cloud resources shown on the dashboard and the templates they can be created from.

pub mod catalog;

use crate::api::ConsoleApi;
use crate::auth::SessionManager;
use crate::common::errors::{ClientError, ClientResult};
use crate::model::{ResourceDraft, ResourceRecord, ResourceTemplate};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Coarse status bucket derived from the free-form status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceStatus {
    Running,
    Stopped,
    Pending,
    Unknown,
}

impl ResourceStatus {
    /// Case-insensitive substring match on `run`, `stop` and `pend`, in that order.
    pub fn classify(status: &str) -> Self {
        let status = status.to_lowercase();
        if status.contains("run") {
            ResourceStatus::Running
        } else if status.contains("stop") {
            ResourceStatus::Stopped
        } else if status.contains("pend") {
            ResourceStatus::Pending
        } else {
            ResourceStatus::Unknown
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceStatus::Running => "running",
            ResourceStatus::Stopped => "stopped",
            ResourceStatus::Pending => "pending",
            ResourceStatus::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Dashboard headline numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub active_resources: usize,
    pub running: usize,
    pub stopped: usize,
    pub pending: usize,
}

impl DashboardStats {
    pub fn from_resources(resources: &[ResourceRecord]) -> Self {
        resources.iter().fold(
            Self {
                active_resources: resources.len(),
                ..Default::default()
            },
            |mut stats, resource| {
                match ResourceStatus::classify(&resource.status) {
                    ResourceStatus::Running => stats.running += 1,
                    ResourceStatus::Stopped => stats.stopped += 1,
                    ResourceStatus::Pending => stats.pending += 1,
                    ResourceStatus::Unknown => {}
                }
                stats
            },
        )
    }
}

/// Resource CRUD for the signed-in user. Errors pass through without retry.
pub struct ResourceService {
    session: Arc<SessionManager>,
    api: Arc<dyn ConsoleApi>,
}

impl ResourceService {
    pub fn new(session: Arc<SessionManager>, api: Arc<dyn ConsoleApi>) -> Self {
        Self { session, api }
    }

    pub async fn list(&self) -> ClientResult<Vec<ResourceRecord>> {
        let api = self.api.clone();
        self.session
            .authorized(|token| async move { api.list_resources(&token).await })
            .await
    }

    pub async fn get(&self, id: i64) -> ClientResult<ResourceRecord> {
        self.list()
            .await?
            .into_iter()
            .find(|resource| resource.id == id)
            .ok_or_else(|| ClientError::NotFound {
                kind: "Resource",
                id: id.to_string(),
            })
    }

    pub async fn create(&self, draft: &ResourceDraft) -> ClientResult<ResourceRecord> {
        let api = self.api.clone();
        let created = self
            .session
            .authorized(|token| async move { api.create_resource(&token, draft).await })
            .await?;
        log::info!("Created resource {} ({})", created.id, created.title);
        Ok(created)
    }

    pub async fn update(&self, id: i64, draft: &ResourceDraft) -> ClientResult<ResourceRecord> {
        let api = self.api.clone();
        let updated = self
            .session
            .authorized(|token| async move { api.update_resource(&token, id, draft).await })
            .await?;
        log::info!("Updated resource {id}");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        let api = self.api.clone();
        self.session
            .authorized(|token| async move { api.delete_resource(&token, id).await })
            .await?;
        log::info!("Deleted resource {id}");
        Ok(())
    }

    pub async fn templates(&self) -> ClientResult<Vec<ResourceTemplate>> {
        let api = self.api.clone();
        self.session
            .authorized(|token| async move { api.list_templates(&token).await })
            .await
    }

    pub async fn import_templates(&self, template_ids: &[i64]) -> ClientResult<()> {
        if template_ids.is_empty() {
            return Ok(());
        }
        let api = self.api.clone();
        self.session
            .authorized(|token| async move { api.import_templates(&token, template_ids).await })
            .await?;
        log::info!("Imported {} template(s)", template_ids.len());
        Ok(())
    }

    pub async fn seed_templates(&self) -> ClientResult<()> {
        let api = self.api.clone();
        self.session
            .authorized(|token| async move { api.seed_templates(&token).await })
            .await
    }

    pub async fn stats(&self) -> ClientResult<DashboardStats> {
        Ok(DashboardStats::from_resources(&self.list().await?))
    }
}
