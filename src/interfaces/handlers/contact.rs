use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::contact::ContactForm, errors::AppError, AppState};

#[instrument(skip(state, data))]
pub async fn submit_contact_form(
    state: web::Data<AppState>,
    data: web::Json<ContactForm>,
) -> Result<impl Responder, AppError> {
    let response = state.contact_handler.submit(data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
