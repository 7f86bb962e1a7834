// src/web/handlers/notification_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::{auth_service, notification_service};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct FeedQuery {
  pub limit: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct MarkReadPayload {
  pub ids: Vec<Uuid>,
}

#[instrument(
    name = "handler::notifications_feed",
    skip(app_state, auth_user, query),
    fields(user_id = %auth_user.user_id)
)]
pub async fn feed_handler(
  app_state: web::Data<AppState>,
  query: web::Query<FeedQuery>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = auth_service::fetch_user(&app_state.db_pool, auth_user.user_id).await?;
  let limit = query.limit.unwrap_or(30).clamp(1, 100);
  let (items, unread) = notification_service::feed(&app_state.db_pool, &user, limit).await?;

  Ok(HttpResponse::Ok().json(json!({
      "items": items,
      "unread": unread,
  })))
}

#[instrument(
    name = "handler::notifications_mark_read_one",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, notification_id = %path.as_ref())
)]
pub async fn mark_read_one_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = auth_service::fetch_user(&app_state.db_pool, auth_user.user_id).await?;
  notification_service::mark_read_one(&app_state.db_pool, &user, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

#[instrument(
    name = "handler::notifications_mark_read",
    skip(app_state, auth_user, req_payload),
    fields(user_id = %auth_user.user_id)
)]
pub async fn mark_read_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<MarkReadPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = auth_service::fetch_user(&app_state.db_pool, auth_user.user_id).await?;
  let updated = notification_service::mark_read(&app_state.db_pool, &user, &req_payload.ids).await?;
  Ok(HttpResponse::Ok().json(json!({ "ok": true, "updated": updated })))
}

#[instrument(
    name = "handler::notifications_mark_all_read",
    skip(app_state, auth_user),
    fields(user_id = %auth_user.user_id)
)]
pub async fn mark_all_read_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = auth_service::fetch_user(&app_state.db_pool, auth_user.user_id).await?;
  let updated = notification_service::mark_all_read(&app_state.db_pool, &user).await?;
  Ok(HttpResponse::Ok().json(json!({ "ok": true, "updated": updated })))
}
