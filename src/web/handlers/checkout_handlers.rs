// src/web/handlers/checkout_handlers.rs

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Role;
use crate::services::{auth_service, checkout_service};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(
    name = "handler::start_checkout",
    skip(app_state, auth_user, path, req),
    fields(user_id = %auth_user.user_id, restaurant_id = %path.as_ref())
)]
pub async fn start_checkout_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
  req: HttpRequest,
) -> Result<HttpResponse, AppError> {
  let customer = auth_service::require_role(&app_state.db_pool, auth_user.user_id, Role::Customer).await?;

  let client_ip = req
    .connection_info()
    .realip_remote_addr()
    .unwrap_or("127.0.0.1")
    .to_string();

  let redirect = checkout_service::start_checkout(&app_state, customer.id, path.into_inner(), client_ip).await?;

  info!(order_id = %redirect.order_id, "Redirecting customer to the payment gateway.");
  // 302 to the gateway; the body carries the same URL for API clients that
  // follow redirects themselves.
  Ok(
    HttpResponse::Found()
      .insert_header((header::LOCATION, redirect.pay_url.clone()))
      .json(json!({
          "orderId": redirect.order_id,
          "txnRef": redirect.txn_ref,
          "payUrl": redirect.pay_url,
      })),
  )
}
