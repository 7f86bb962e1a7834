// src/web/handlers/payment_handlers.rs

//! Gateway callback endpoints. The return URL is where the customer's
//! browser lands after paying; the IPN is the gateway's server-to-server
//! confirmation. Both verify the same signature and share one reconciliation
//! path; they only differ in how outcomes are rendered.

use std::collections::BTreeMap;

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::gateway::ipn_code;
use crate::services::checkout_service::{self, CallbackOutcome};
use crate::state::AppState;

#[instrument(name = "handler::payment_return", skip(app_state, query))]
pub async fn payment_return_handler(
  app_state: web::Data<AppState>,
  query: web::Query<BTreeMap<String, String>>,
) -> Result<HttpResponse, AppError> {
  let outcome = checkout_service::apply_gateway_callback(&app_state, &query).await?;

  let track_redirect = |order_id: uuid::Uuid, paid: bool| {
    let mut location = format!("{}/api/v1/orders/{}", app_state.config.app_base_url, order_id);
    if !paid {
      location.push_str("?payment=failed");
    }
    HttpResponse::Found()
      .insert_header((header::LOCATION, location))
      .finish()
  };

  match outcome {
    CallbackOutcome::Confirmed { order_id } | CallbackOutcome::AlreadyConfirmed { order_id } => {
      Ok(track_redirect(order_id, true))
    }
    CallbackOutcome::NotSuccessful { order_id } => Ok(track_redirect(order_id, false)),
    CallbackOutcome::InvalidSignature => Err(AppError::Validation("Invalid payment signature.".to_string())),
    CallbackOutcome::UnknownReference => Err(AppError::NotFound("Unknown transaction reference.".to_string())),
    CallbackOutcome::AmountMismatch { .. } => Err(AppError::Validation("Payment amount mismatch.".to_string())),
  }
}

/// IPN contract: always HTTP 200; the response code tells the gateway what
/// happened and whether to stop retrying.
#[instrument(name = "handler::payment_ipn", skip(app_state, query))]
pub async fn payment_ipn_handler(
  app_state: web::Data<AppState>,
  query: web::Query<BTreeMap<String, String>>,
) -> Result<HttpResponse, AppError> {
  let outcome = checkout_service::apply_gateway_callback(&app_state, &query).await?;

  let (rsp_code, message) = match outcome {
    CallbackOutcome::Confirmed { .. } => (ipn_code::CONFIRMED, "Confirm Success"),
    CallbackOutcome::AlreadyConfirmed { .. } => (ipn_code::ALREADY_CONFIRMED, "Order already confirmed"),
    CallbackOutcome::NotSuccessful { .. } => (ipn_code::CONFIRMED, "Confirm Received"),
    CallbackOutcome::InvalidSignature => (ipn_code::INVALID_SIGNATURE, "Invalid signature"),
    CallbackOutcome::UnknownReference => (ipn_code::ORDER_NOT_FOUND, "Order not found"),
    CallbackOutcome::AmountMismatch { .. } => (ipn_code::INVALID_AMOUNT, "Invalid amount"),
  };
  Ok(HttpResponse::Ok().json(json!({ "RspCode": rsp_code, "Message": message })))
}
