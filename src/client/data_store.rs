//! Client-side cache of the three portfolio collections.
//!
//! A [`DataStore`] is an explicit value: create one, share it behind an `Arc`, and call
//! [`DataStore::refresh`] to load. Mutations go to the server first and only the affected
//! collection is re-fetched afterwards.

use std::{sync::Arc, time::Duration};

use parking_lot::{Mutex, RwLock};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    client::{
        api::{HttpResourceApi, ResourceApi},
        sequence::Versioned,
        summary::DashboardSummary,
    },
    entities::{
        blog_post::{BlogPost, BlogPostPatch, NewBlogPost},
        project::{NewProject, Project, ProjectCategory, ProjectPatch},
        resource::Resource,
        skill::{NewSkill, Skill, SkillCategory, SkillPatch},
    },
    errors::ClientError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Uninitialized,
    Loading,
    Ready,
}

#[derive(Debug)]
struct LoadTracker {
    state: LoadState,
    in_flight: usize,
}

pub type Slot<R> = RwLock<Versioned<Vec<R>>>;

pub struct DataStore {
    projects_api: Arc<dyn ResourceApi<Project>>,
    blog_api: Arc<dyn ResourceApi<BlogPost>>,
    skills_api: Arc<dyn ResourceApi<Skill>>,
    projects: Slot<Project>,
    blog_posts: Slot<BlogPost>,
    skills: Slot<Skill>,
    load: Mutex<LoadTracker>,
}

/// Resources the [`DataStore`] caches.
pub trait Cached: Resource {
    fn api(store: &DataStore) -> &dyn ResourceApi<Self>;
    fn slot(store: &DataStore) -> &Slot<Self>;
}

impl Cached for Project {
    fn api(store: &DataStore) -> &dyn ResourceApi<Self> {
        store.projects_api.as_ref()
    }
    fn slot(store: &DataStore) -> &Slot<Self> {
        &store.projects
    }
}

impl Cached for BlogPost {
    fn api(store: &DataStore) -> &dyn ResourceApi<Self> {
        store.blog_api.as_ref()
    }
    fn slot(store: &DataStore) -> &Slot<Self> {
        &store.blog_posts
    }
}

impl Cached for Skill {
    fn api(store: &DataStore) -> &dyn ResourceApi<Self> {
        store.skills_api.as_ref()
    }
    fn slot(store: &DataStore) -> &Slot<Self> {
        &store.skills
    }
}

/// Marks a refresh in flight; the store returns to `Ready` once the last one ends or is dropped.
struct LoadGuard<'a> {
    store: &'a DataStore,
}

impl<'a> LoadGuard<'a> {
    fn begin(store: &'a DataStore) -> Self {
        let mut load = store.load.lock();
        load.in_flight += 1;
        load.state = LoadState::Loading;
        LoadGuard { store }
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        let mut load = self.store.load.lock();
        load.in_flight = load.in_flight.saturating_sub(1);
        if load.in_flight == 0 {
            load.state = LoadState::Ready;
        }
    }
}

impl DataStore {
    /// Store backed by the HTTP endpoints at `base_url`. Nothing is loaded yet.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_apis(
            Arc::new(HttpResourceApi::<Project>::with_client(client.clone(), base_url)?),
            Arc::new(HttpResourceApi::<BlogPost>::with_client(client.clone(), base_url)?),
            Arc::new(HttpResourceApi::<Skill>::with_client(client, base_url)?),
        ))
    }

    pub fn with_apis(
        projects_api: Arc<dyn ResourceApi<Project>>,
        blog_api: Arc<dyn ResourceApi<BlogPost>>,
        skills_api: Arc<dyn ResourceApi<Skill>>,
    ) -> Self {
        DataStore {
            projects_api,
            blog_api,
            skills_api,
            projects: RwLock::new(Versioned::new(Vec::new())),
            blog_posts: RwLock::new(Versioned::new(Vec::new())),
            skills: RwLock::new(Versioned::new(Vec::new())),
            load: Mutex::new(LoadTracker { state: LoadState::Uninitialized, in_flight: 0 }),
        }
    }

    /// Creates a store and performs the initial refresh.
    pub async fn connect(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let store = Self::new(base_url, timeout)?;
        store.refresh().await;
        Ok(store)
    }

    pub fn load_state(&self) -> LoadState {
        self.load.lock().state
    }

    /// Reloads all three collections concurrently. A failed collection keeps its previous contents.
    pub async fn refresh(&self) {
        let _guard = LoadGuard::begin(self);

        let (projects, posts, skills) = futures::join!(
            self.reload::<Project>(),
            self.reload::<BlogPost>(),
            self.reload::<Skill>(),
        );

        debug!(projects, posts, skills, "Refresh finished");
    }

    /// Reloads one collection. Returns whether the response was applied.
    pub async fn reload<R: Cached>(&self) -> bool {
        let ticket = R::slot(self).write().issue();

        match R::api(self).list().await {
            Ok(records) => {
                let applied = R::slot(self).write().commit(ticket, records);
                if !applied {
                    debug!(table = R::TABLE, "Discarded out-of-order response");
                }
                applied
            }
            Err(e) => {
                warn!(table = R::TABLE, error = %e, "Reload failed, keeping previous data");
                false
            }
        }
    }

    pub fn collection<R: Cached>(&self) -> Arc<Vec<R>> {
        R::slot(self).read().value()
    }

    pub async fn add<R: Cached>(&self, new: &R::New) -> Result<R, ClientError> {
        let created = R::api(self).create(new).await?;
        self.reload::<R>().await;
        Ok(created)
    }

    pub async fn update<R: Cached>(&self, id: &str, patch: &R::Patch) -> Result<R, ClientError> {
        let updated = R::api(self).update(id, patch).await?;
        self.reload::<R>().await;
        Ok(updated)
    }

    pub async fn delete<R: Cached>(&self, id: &str) -> Result<(), ClientError> {
        R::api(self).delete(id).await?;
        self.reload::<R>().await;
        Ok(())
    }

    pub fn projects(&self) -> Arc<Vec<Project>> {
        self.collection::<Project>()
    }

    pub fn blog_posts(&self) -> Arc<Vec<BlogPost>> {
        self.collection::<BlogPost>()
    }

    pub fn skills(&self) -> Arc<Vec<Skill>> {
        self.collection::<Skill>()
    }

    pub async fn add_project(&self, new: &NewProject) -> Result<Project, ClientError> {
        self.add::<Project>(new).await
    }

    pub async fn update_project(&self, id: &str, patch: &ProjectPatch) -> Result<Project, ClientError> {
        self.update::<Project>(id, patch).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), ClientError> {
        self.delete::<Project>(id).await
    }

    pub async fn add_blog_post(&self, new: &NewBlogPost) -> Result<BlogPost, ClientError> {
        self.add::<BlogPost>(new).await
    }

    pub async fn update_blog_post(&self, id: &str, patch: &BlogPostPatch) -> Result<BlogPost, ClientError> {
        self.update::<BlogPost>(id, patch).await
    }

    pub async fn delete_blog_post(&self, id: &str) -> Result<(), ClientError> {
        self.delete::<BlogPost>(id).await
    }

    pub async fn add_skill(&self, new: &NewSkill) -> Result<Skill, ClientError> {
        self.add::<Skill>(new).await
    }

    pub async fn update_skill(&self, id: &str, patch: &SkillPatch) -> Result<Skill, ClientError> {
        self.update::<Skill>(id, patch).await
    }

    pub async fn delete_skill(&self, id: &str) -> Result<(), ClientError> {
        self.delete::<Skill>(id).await
    }

    pub fn published_posts(&self) -> Vec<BlogPost> {
        self.blog_posts().iter().filter(|p| p.published).cloned().collect()
    }

    pub fn featured_projects(&self) -> Vec<Project> {
        self.projects().iter().filter(|p| p.featured).cloned().collect()
    }

    pub fn projects_in(&self, category: ProjectCategory) -> Vec<Project> {
        self.projects().iter().filter(|p| p.category == category).cloned().collect()
    }

    pub fn skills_in(&self, category: SkillCategory) -> Vec<Skill> {
        self.skills().iter().filter(|s| s.category == category).cloned().collect()
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::from_collections(&self.projects(), &self.blog_posts(), &self.skills())
    }
}
