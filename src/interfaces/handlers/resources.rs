use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::resource::Resource, errors::AppError, AppState};

#[instrument(skip(state), fields(table = R::TABLE))]
pub async fn list_resources<R: Resource>(state: web::Data<AppState>) -> impl Responder {
    let records = state.resource_handler.list::<R>().await;
    HttpResponse::Ok().json(records)
}

#[instrument(skip(state, data), fields(table = R::TABLE))]
pub async fn create_resource<R: Resource>(
    state: web::Data<AppState>,
    data: web::Json<R::New>,
) -> Result<impl Responder, AppError> {
    let created = state
        .resource_handler
        .create::<R>(data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(created))
}

#[instrument(skip(state, data), fields(table = R::TABLE))]
pub async fn update_resource<R: Resource>(
    id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<R::Patch>,
) -> Result<impl Responder, AppError> {
    let updated = state
        .resource_handler
        .update::<R>(&id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

#[instrument(skip(state), fields(table = R::TABLE))]
pub async fn delete_resource<R: Resource>(
    id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let response = state.resource_handler.delete::<R>(&id).await?;
    Ok(HttpResponse::Ok().json(response))
}
