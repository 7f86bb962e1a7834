// src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::cart::cart_total_cents;
use crate::models::Role;
use crate::services::{auth_service, cart_service};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct AddCartItemPayload {
  pub dish_id: Uuid,
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct UpdateCartItemPayload {
  pub quantity: i32,
}

// --- Handler Implementations ---

#[instrument(
    name = "handler::get_cart",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, restaurant_id = %path.as_ref())
)]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let customer = auth_service::require_role(&app_state.db_pool, auth_user.user_id, Role::Customer).await?;
  let cart = cart_service::active_cart(&app_state.db_pool, customer.id, path.into_inner()).await?;

  let Some(cart) = cart else {
    return Ok(HttpResponse::Ok().json(json!({
        "cart": null,
        "items": [],
        "totalCents": 0,
    })));
  };
  let lines = cart_service::cart_lines(&app_state.db_pool, cart.id).await?;
  let total_cents = cart_total_cents(&lines);
  Ok(HttpResponse::Ok().json(json!({
      "cart": cart,
      "items": lines,
      "totalCents": total_cents,
  })))
}

#[instrument(
    name = "handler::add_cart_item",
    skip(app_state, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, dish_id = %req_payload.dish_id, quantity = %req_payload.quantity)
)]
pub async fn add_cart_item_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddCartItemPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let customer = auth_service::require_role(&app_state.db_pool, auth_user.user_id, Role::Customer).await?;
  let item = cart_service::add_item(&app_state.db_pool, customer.id, req_payload.dish_id, req_payload.quantity).await?;

  info!(cart_item_id = %item.id, "Item added to cart.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Item added to cart successfully.",
      "cartItem": item,
  })))
}

#[instrument(
    name = "handler::update_cart_item",
    skip(app_state, req_payload, auth_user, path),
    fields(user_id = %auth_user.user_id, item_id = %path.as_ref())
)]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<UpdateCartItemPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let customer = auth_service::require_role(&app_state.db_pool, auth_user.user_id, Role::Customer).await?;
  let item =
    cart_service::update_item(&app_state.db_pool, customer.id, path.into_inner(), req_payload.quantity).await?;

  match item {
    Some(item) => Ok(HttpResponse::Ok().json(json!({
        "message": "Cart item updated.",
        "cartItem": item,
    }))),
    None => Ok(HttpResponse::Ok().json(json!({ "message": "Cart item removed." }))),
  }
}

#[instrument(
    name = "handler::remove_cart_item",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, item_id = %path.as_ref())
)]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let customer = auth_service::require_role(&app_state.db_pool, auth_user.user_id, Role::Customer).await?;
  cart_service::remove_item(&app_state.db_pool, customer.id, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Cart item removed." })))
}
