// src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{OrderStatus, Payment};
use crate::services::{auth_service, cart_service, order_service, rating_service};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct ListOrdersQuery {
  pub status: Option<OrderStatus>,
  pub page: Option<i64>,
  pub per_page: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct RateOrderPayload {
  pub rating: i32,
  pub comment: Option<String>,
}

// --- Handler Implementations ---

#[instrument(
    name = "handler::list_my_orders",
    skip(app_state, auth_user, query),
    fields(user_id = %auth_user.user_id)
)]
pub async fn list_my_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListOrdersQuery>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = auth_service::fetch_user(&app_state.db_pool, auth_user.user_id).await?;
  let page = query.page.unwrap_or(1).max(1);
  let per_page = query.per_page.unwrap_or(10).clamp(1, 100);

  let (orders, total) =
    order_service::list_customer_orders(&app_state.db_pool, user.id, query.status, page, per_page).await?;
  let total_pages = (total + per_page - 1) / per_page;

  Ok(HttpResponse::Ok().json(json!({
      "orders": orders,
      "page": page,
      "perPage": per_page,
      "total": total,
      "totalPages": total_pages,
  })))
}

/// Order tracking detail: the order, its lines, and payment state.
#[instrument(
    name = "handler::get_order",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, order_id = %path.as_ref())
)]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = auth_service::fetch_user(&app_state.db_pool, auth_user.user_id).await?;
  let order = order_service::fetch_order_for(&app_state.db_pool, &user, path.into_inner()).await?;

  let lines = cart_service::cart_lines(&app_state.db_pool, order.cart_id).await?;
  let payment: Option<Payment> =
    sqlx::query_as("SELECT id, order_id, txn_ref, amount_cents, status FROM payments WHERE order_id = $1")
      .bind(order.id)
      .fetch_optional(&app_state.db_pool)
      .await?;

  Ok(HttpResponse::Ok().json(json!({
      "order": order,
      "items": lines,
      "payment": payment,
  })))
}

#[instrument(
    name = "handler::cancel_order",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, order_id = %path.as_ref())
)]
pub async fn cancel_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = auth_service::fetch_user(&app_state.db_pool, auth_user.user_id).await?;
  let order = order_service::customer_cancel_order(&app_state.db_pool, &user, path.into_inner()).await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Order canceled.",
      "order": order,
  })))
}

#[instrument(
    name = "handler::rate_order",
    skip(app_state, auth_user, path, req_payload),
    fields(user_id = %auth_user.user_id, order_id = %path.as_ref())
)]
pub async fn rate_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<RateOrderPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = auth_service::fetch_user(&app_state.db_pool, auth_user.user_id).await?;
  let rating = rating_service::rate_order(
    &app_state.db_pool,
    &user,
    path.into_inner(),
    req_payload.rating,
    req_payload.comment.as_deref(),
  )
  .await?;

  Ok(HttpResponse::Created().json(json!({
      "message": "Thank you for your rating.",
      "rating": rating,
  })))
}
