// src/web/handlers/admin_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Role;
use crate::services::{auth_service, order_service};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct SetWaitingTimePayload {
  pub minutes: i32,
}

#[instrument(
    name = "handler::admin_orders",
    skip(app_state, auth_user),
    fields(user_id = %auth_user.user_id)
)]
pub async fn admin_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_service::require_role(&app_state.db_pool, auth_user.user_id, Role::Admin).await?;
  let orders = order_service::list_all_orders(&app_state.db_pool).await?;

  Ok(HttpResponse::Ok().json(json!({
      "orders": orders,
      "currentWaitingTimeMinutes": app_state.current_waiting_time_minutes(),
  })))
}

#[instrument(
    name = "handler::complete_order",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, order_id = %path.as_ref())
)]
pub async fn complete_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let admin = auth_service::require_role(&app_state.db_pool, auth_user.user_id, Role::Admin).await?;
  let order = order_service::complete_order(&app_state.db_pool, admin.id, path.into_inner()).await?;

  info!(order_id = %order.id, "Order marked as delivered.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Order completed.",
      "order": order,
  })))
}

/// Adjusts the waiting window applied to orders created from now on;
/// existing orders keep the window they were checked out with.
#[instrument(
    name = "handler::set_waiting_time",
    skip(app_state, auth_user, req_payload),
    fields(user_id = %auth_user.user_id)
)]
pub async fn set_waiting_time_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SetWaitingTimePayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_service::require_role(&app_state.db_pool, auth_user.user_id, Role::Admin).await?;
  if req_payload.minutes <= 0 {
    return Err(AppError::Validation("Waiting time must be a positive number of minutes.".to_string()));
  }
  app_state.set_waiting_time_minutes(req_payload.minutes);

  info!(minutes = req_payload.minutes, "Default waiting time updated.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Waiting time updated.",
      "waitingTimeMinutes": req_payload.minutes,
  })))
}
