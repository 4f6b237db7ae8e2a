use tracing::{info, warn};
use validator::Validate;

use crate::{
    entities::resource::{MessageResponse, Resource},
    errors::{AppError, StoreError},
    store::{with_updated_at, RemoteStoreGateway},
};

/// CRUD for every [`Resource`] collection.
///
/// Reads never fail: when the store is unconfigured, failing or empty the fallback
/// records are served instead. Writes never degrade.
#[derive(Clone)]
pub struct ResourceHandler {
    pub gateway: RemoteStoreGateway,
}

impl ResourceHandler {
    pub fn new(gateway: RemoteStoreGateway) -> Self {
        ResourceHandler { gateway }
    }

    pub async fn list<R: Resource>(&self) -> Vec<R> {
        if !self.gateway.is_configured() {
            info!(table = R::TABLE, "Store not configured, serving fallback data");
            return R::fallback();
        }

        match self.gateway.select_all::<R>().await {
            Ok(rows) if rows.is_empty() => {
                info!(table = R::TABLE, "Store returned no rows, serving fallback data");
                R::fallback()
            }
            Ok(rows) => rows,
            Err(e) => {
                warn!(table = R::TABLE, error = %e, "Store read failed, serving fallback data");
                R::fallback()
            }
        }
    }

    pub async fn create<R: Resource>(&self, mut new: R::New) -> Result<R, AppError> {
        self.ensure_configured()?;

        R::prepare_new(&mut new)?;
        new.validate()?;

        if let Some(slug) = R::unique_slug_of_new(&new) {
            self.ensure_slug_free::<R>(slug, None)
                .await
                .map_err(|e| write_failure::<R>("create", e))?;
        }

        let row = with_updated_at(&new).map_err(|e| write_failure::<R>("create", e.into()))?;
        let created = self
            .gateway
            .insert::<R>(row)
            .await
            .map_err(|e| write_failure::<R>("create", e.into()))?;

        info!(table = R::TABLE, id = created.id(), "{} created", R::LABEL);
        Ok(created)
    }

    pub async fn update<R: Resource>(&self, id: &str, mut patch: R::Patch) -> Result<R, AppError> {
        self.ensure_configured()?;

        R::prepare_patch(&mut patch)?;
        patch.validate()?;

        if let Some(slug) = R::unique_slug_of_patch(&patch) {
            self.ensure_slug_free::<R>(slug, Some(id))
                .await
                .map_err(|e| write_failure::<R>("update", e))?;
        }

        let row = with_updated_at(&patch).map_err(|e| write_failure::<R>("update", e.into()))?;
        let updated = self
            .gateway
            .update::<R>(id, row)
            .await
            .map_err(|e| write_failure::<R>("update", e.into()))?;

        match updated {
            Some(record) => {
                info!(table = R::TABLE, id, "{} updated", R::LABEL);
                Ok(record)
            }
            None => Err(AppError::NotFound(format!("{} not found", R::LABEL))),
        }
    }

    pub async fn delete<R: Resource>(&self, id: &str) -> Result<MessageResponse, AppError> {
        self.ensure_configured()?;

        let removed = self
            .gateway
            .delete::<R>(id)
            .await
            .map_err(|e| write_failure::<R>("delete", e.into()))?;

        if !removed {
            return Err(AppError::NotFound(format!("{} not found", R::LABEL)));
        }

        info!(table = R::TABLE, id, "{} deleted", R::LABEL);
        Ok(MessageResponse { message: format!("{} deleted successfully", R::LABEL) })
    }

    fn ensure_configured(&self) -> Result<(), AppError> {
        if self.gateway.is_configured() {
            Ok(())
        } else {
            Err(StoreError::NotConfigured.into())
        }
    }

    async fn ensure_slug_free<R: Resource>(&self, slug: &str, own_id: Option<&str>) -> Result<(), AppError> {
        let holders = self.gateway.select_where::<R>("slug", slug).await?;
        if holders.iter().any(|r| Some(r.id()) != own_id) {
            return Err(AppError::Conflict(format!("Slug '{slug}' is already in use")));
        }
        Ok(())
    }
}

/// Client-facing errors pass through; store failures collapse into a generic 500 with the cause logged.
fn write_failure<R: Resource>(action: &str, err: AppError) -> AppError {
    match err {
        AppError::InternalError(cause) => {
            warn!(table = R::TABLE, cause = %cause, "{} {} failed", R::LABEL, action);
            AppError::InternalError(format!("Failed to {action} {}", R::LABEL.to_lowercase()))
        }
        other => other,
    }
}
