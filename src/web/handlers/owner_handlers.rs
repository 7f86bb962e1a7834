// src/web/handlers/owner_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{OrderStatus, Role};
use crate::services::{auth_service, order_service, restaurant_service};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CancelOrderPayload {
  pub reason: Option<String>,
}

/// The owner's order dashboard, bucketed by status the way the kitchen works
/// the queue: fresh PAID orders to confirm, ACCEPTED in progress, and the
/// closed buckets.
#[instrument(
    name = "handler::owner_orders",
    skip(app_state, auth_user),
    fields(user_id = %auth_user.user_id)
)]
pub async fn owner_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let owner = auth_service::require_role(&app_state.db_pool, auth_user.user_id, Role::RestaurantOwner).await?;
  let restaurant = restaurant_service::restaurant_of_owner(&app_state.db_pool, owner.id).await?;

  let pool = &app_state.db_pool;
  let paid = order_service::list_restaurant_orders(pool, restaurant.id, OrderStatus::Paid).await?;
  let accepted = order_service::list_restaurant_orders(pool, restaurant.id, OrderStatus::Accepted).await?;
  let canceled = order_service::list_restaurant_orders(pool, restaurant.id, OrderStatus::Canceled).await?;
  let completed = order_service::list_restaurant_orders(pool, restaurant.id, OrderStatus::Completed).await?;

  Ok(HttpResponse::Ok().json(json!({
      "restaurantId": restaurant.id,
      "paid": paid,
      "accepted": accepted,
      "canceled": canceled,
      "completed": completed,
  })))
}

#[instrument(
    name = "handler::approve_order",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, order_id = %path.as_ref())
)]
pub async fn approve_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let owner = auth_service::require_role(&app_state.db_pool, auth_user.user_id, Role::RestaurantOwner).await?;
  let order = order_service::approve_order(&app_state.db_pool, owner.id, path.into_inner()).await?;

  info!(order_id = %order.id, "Order accepted by the restaurant.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Order accepted.",
      "order": order,
  })))
}

#[instrument(
    name = "handler::owner_cancel_order",
    skip(app_state, auth_user, path, req_payload),
    fields(user_id = %auth_user.user_id, order_id = %path.as_ref())
)]
pub async fn owner_cancel_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<CancelOrderPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let owner = auth_service::require_role(&app_state.db_pool, auth_user.user_id, Role::RestaurantOwner).await?;
  let reason = req_payload.reason.as_deref().unwrap_or("").trim().to_string();
  let order = order_service::owner_cancel_order(&app_state.db_pool, owner.id, path.into_inner(), &reason).await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Order canceled and refund requested.",
      "order": order,
      "reason": reason,
  })))
}
