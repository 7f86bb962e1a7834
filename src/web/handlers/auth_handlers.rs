// src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::Role;
use crate::services::auth_service;
use crate::state::AppState;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct RegisterRequestPayload {
  pub name: String,
  pub email: String,
  pub phone: Option<String>,
  pub password: String,
  /// "customer" (default) or "restaurant_owner"; admins are provisioned
  /// out of band.
  pub role: Option<Role>,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequestPayload {
  pub email: String,
  pub password: String,
}

// --- Handler Implementations ---

#[instrument(
    name = "handler::register",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegisterRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let email = req_payload.email.trim().to_lowercase();
  if email.is_empty() || req_payload.password.is_empty() {
    return Err(AppError::Validation("Email and password are required.".to_string()));
  }
  let role = req_payload.role.unwrap_or(Role::Customer);

  let user = auth_service::register_user(
    &app_state.db_pool,
    req_payload.name.trim(),
    &email,
    req_payload.phone.as_deref(),
    &req_payload.password,
    role,
  )
  .await?;

  info!(user_id = %user.id, "User registered.");
  Ok(HttpResponse::Created().json(json!({
      "message": "User created successfully.",
      "user": user,
  })))
}

#[instrument(
    name = "handler::login",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let email = req_payload.email.trim().to_lowercase();
  let user = auth_service::login(&app_state.db_pool, &email, &req_payload.password).await?;

  info!(user_id = %user.id, "Login successful.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Login successful.",
      "user": user,
  })))
}
