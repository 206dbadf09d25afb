//! Construction project records.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use buildcity_store::{keys, KeyValueStore};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::json;
use crate::{RecordsError, RecordsResult};

/// Upper bound on user-attached images per project.
pub const MAX_MEDIA_IMAGES: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Finished,
    Ongoing,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finished => write!(f, "finished"),
            Self::Ongoing => write!(f, "ongoing"),
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = RecordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "finished" => Ok(Self::Finished),
            "ongoing" => Ok(Self::Ongoing),
            other => Err(RecordsError::InvalidInput(format!(
                "unknown project status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Brick,
    Concrete,
    Wood,
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brick => write!(f, "brick"),
            Self::Concrete => write!(f, "concrete"),
            Self::Wood => write!(f, "wood"),
        }
    }
}

impl FromStr for Material {
    type Err = RecordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brick" => Ok(Self::Brick),
            "concrete" => Ok(Self::Concrete),
            "wood" => Ok(Self::Wood),
            other => Err(RecordsError::InvalidInput(format!("unknown material: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Creation day, `DD/MM/YYYY`
    pub date: String,
    pub address: String,
    pub status: ProjectStatus,
    /// Free text, e.g. `"120 m²"`
    pub area: String,
    pub material: Material,
    /// Older records have no such field
    #[serde(default)]
    pub media_images: Vec<String>,
}

/// Input for [`ProjectStore::save`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub address: String,
    pub area: String,
    pub material: Material,
    #[serde(default)]
    pub media_images: Vec<String>,
}

impl NewProject {
    fn validate(&self) -> RecordsResult<()> {
        if self.name.trim().is_empty() {
            return Err(RecordsError::InvalidInput(
                "project name must not be empty".into(),
            ));
        }
        if self.media_images.len() > MAX_MEDIA_IMAGES {
            return Err(RecordsError::InvalidInput(format!(
                "a project holds at most {MAX_MEDIA_IMAGES} images, got {}",
                self.media_images.len()
            )));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct ProjectStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProjectStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> RecordsResult<Vec<Project>> {
        json::load_list(self.store.as_ref(), keys::PROJECTS).await
    }

    pub async fn get(&self, id: &str) -> RecordsResult<Option<Project>> {
        Ok(self.list().await?.into_iter().find(|p| p.id == id))
    }

    pub async fn list_by_status(&self, status: ProjectStatus) -> RecordsResult<Vec<Project>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|p| p.status == status)
            .collect())
    }

    /// Save a new project created today. New projects always start ongoing.
    pub async fn save(&self, project: NewProject) -> RecordsResult<Project> {
        self.save_on(project, Local::now().date_naive()).await
    }

    /// Save a new project with an explicit creation day.
    pub async fn save_on(&self, project: NewProject, created: NaiveDate) -> RecordsResult<Project> {
        project.validate()?;
        let mut projects = self.list().await?;
        let project = Project {
            id: json::new_id(),
            name: project.name.trim().to_string(),
            date: created.format("%d/%m/%Y").to_string(),
            address: project.address,
            status: ProjectStatus::Ongoing,
            area: project.area,
            material: project.material,
            media_images: project.media_images,
        };
        projects.push(project.clone());
        json::save(self.store.as_ref(), keys::PROJECTS, &projects).await?;
        info!(project_id = %project.id, material = %project.material, "Project saved");
        Ok(project)
    }

    /// Returns false when no such project exists.
    pub async fn update_status(&self, id: &str, status: ProjectStatus) -> RecordsResult<bool> {
        let mut projects = self.list().await?;
        let Some(project) = projects.iter_mut().find(|p| p.id == id) else {
            debug!(project_id = id, "Status update for unknown project ignored");
            return Ok(false);
        };
        project.status = status;
        json::save(self.store.as_ref(), keys::PROJECTS, &projects).await?;
        info!(project_id = id, status = %status, "Project status updated");
        Ok(true)
    }

    /// Returns false when no such project exists.
    pub async fn delete(&self, id: &str) -> RecordsResult<bool> {
        let mut projects = self.list().await?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Ok(false);
        }
        json::save(self.store.as_ref(), keys::PROJECTS, &projects).await?;
        info!(project_id = id, "Project deleted");
        Ok(true)
    }
}
