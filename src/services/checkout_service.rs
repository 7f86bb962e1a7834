// src/services/checkout_service.rs

//! Checkout and payment reconciliation.
//!
//! Checkout turns an ACTIVE cart into a PENDING order (reusing a still-open
//! order for the same cart), mints a fresh transaction reference, and hands
//! back the signed gateway redirect. The gateway answers twice -- a
//! user-facing return redirect and a server-to-server notification -- and
//! both funnel through [`apply_gateway_callback`], which moves the order to
//! PAID at most once.

use std::collections::BTreeMap;

use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::gateway::{self, PaymentRequest};
use crate::models::cart::cart_total_cents;
use crate::models::{Cart, Order, OrderStatus, Payment, PaymentStatus};
use crate::services::{cart_service, notification_service};
use crate::state::AppState;

const ORDER_COLUMNS: &str = "id, customer_id, restaurant_id, cart_id, status, total_cents, \
                             waiting_time_minutes, canceled_by, delivery_by, created_at";

#[derive(Debug)]
pub struct CheckoutRedirect {
  pub order_id: Uuid,
  pub txn_ref: String,
  pub pay_url: String,
}

/// Outcome of one gateway callback, shared by the return and IPN endpoints.
/// Only the first successful confirmation mutates state; everything else
/// reports without touching the order.
#[derive(Debug, PartialEq, Eq)]
pub enum CallbackOutcome {
  /// First confirmation: order PAID, payment PAID, cart CHECKOUT.
  Confirmed { order_id: Uuid },
  /// Duplicate confirmation for an order already past PENDING; no-op.
  AlreadyConfirmed { order_id: Uuid },
  /// The gateway reported a non-success response code; the payment attempt
  /// is closed out but the order stays PENDING for a retry.
  NotSuccessful { order_id: Uuid },
  InvalidSignature,
  UnknownReference,
  AmountMismatch { order_id: Uuid },
}

/// Creates or reuses the cart's open order, refreshes its payment row with a
/// newly minted txn_ref, and builds the signed redirect URL.
#[instrument(name = "checkout_service::start_checkout", skip(state, client_ip))]
pub async fn start_checkout(
  state: &AppState,
  customer_id: Uuid,
  restaurant_id: Uuid,
  client_ip: String,
) -> Result<CheckoutRedirect> {
  let Some(cart) = cart_service::active_cart(&state.db_pool, customer_id, restaurant_id).await? else {
    return Err(AppError::Validation("No active cart for this restaurant.".to_string()));
  };
  let lines = cart_service::cart_lines(&state.db_pool, cart.id).await?;
  if lines.is_empty() {
    return Err(AppError::Validation("Cart is empty.".to_string()));
  }
  let total_cents = cart_total_cents(&lines);
  if total_cents <= 0 {
    return Err(AppError::Validation("Cart total must be positive.".to_string()));
  }
  let waiting_time_minutes = state.current_waiting_time_minutes();

  let mut tx = state.db_pool.begin().await?;

  let order = reuse_or_create_order(&mut tx, &cart, total_cents, waiting_time_minutes).await?;

  let txn_ref = gateway::new_txn_ref(order.id);
  sqlx::query(
    "INSERT INTO payments (order_id, txn_ref, amount_cents, status) VALUES ($1, $2, $3, 'pending') \
     ON CONFLICT (order_id) DO UPDATE \
     SET txn_ref = EXCLUDED.txn_ref, amount_cents = EXCLUDED.amount_cents, status = 'pending'",
  )
  .bind(order.id)
  .bind(&txn_ref)
  .bind(total_cents)
  .execute(&mut *tx)
  .await?;

  tx.commit().await?;

  let config = &state.config;
  let pay_url = gateway::build_payment_url(
    &config.gateway_pay_url,
    &config.gateway_hash_secret,
    &PaymentRequest {
      merchant_code: &config.gateway_merchant_code,
      amount_cents: total_cents,
      txn_ref: &txn_ref,
      order_info: format!("Order {}", order.id),
      client_ip,
      return_url: &config.gateway_return_url,
      created_at: Utc::now(),
    },
  );

  info!(order_id = %order.id, %txn_ref, total_cents, "Checkout prepared, redirecting to gateway.");
  Ok(CheckoutRedirect {
    order_id: order.id,
    txn_ref,
    pay_url,
  })
}

/// At most one non-terminal order exists per cart; checkout reuses it and
/// refreshes the total and waiting window instead of inserting a duplicate.
async fn reuse_or_create_order(
  tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
  cart: &Cart,
  total_cents: i64,
  waiting_time_minutes: i32,
) -> Result<Order> {
  let existing: Option<Order> = sqlx::query_as(&format!(
    "SELECT {ORDER_COLUMNS} FROM orders \
     WHERE cart_id = $1 AND status IN ('pending', 'paid', 'accepted') \
     ORDER BY created_at DESC LIMIT 1"
  ))
  .bind(cart.id)
  .fetch_optional(&mut **tx)
  .await?;

  let order = match existing {
    Some(existing) => {
      sqlx::query_as(&format!(
        "UPDATE orders SET total_cents = $2, waiting_time_minutes = $3 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
      ))
      .bind(existing.id)
      .bind(total_cents)
      .bind(waiting_time_minutes)
      .fetch_one(&mut **tx)
      .await?
    }
    None => {
      sqlx::query_as(&format!(
        "INSERT INTO orders (customer_id, restaurant_id, cart_id, status, total_cents, waiting_time_minutes) \
         VALUES ($1, $2, $3, 'pending', $4, $5) RETURNING {ORDER_COLUMNS}"
      ))
      .bind(cart.customer_id)
      .bind(cart.restaurant_id)
      .bind(cart.id)
      .bind(total_cents)
      .bind(waiting_time_minutes)
      .fetch_one(&mut **tx)
      .await?
    }
  };
  Ok(order)
}

/// Verifies and applies one gateway callback. Rejections (bad signature,
/// unknown reference, amount mismatch) leave all state unchanged; a success
/// code transitions the order exactly once, so replays of the same callback
/// are no-ops and fire no second notification.
#[instrument(name = "checkout_service::apply_gateway_callback", skip_all)]
pub async fn apply_gateway_callback(state: &AppState, params: &BTreeMap<String, String>) -> Result<CallbackOutcome> {
  if !gateway::verify_signature(params, &state.config.gateway_hash_secret) {
    warn!("Gateway callback rejected: invalid signature.");
    return Ok(CallbackOutcome::InvalidSignature);
  }

  let Some(txn_ref) = gateway::callback_txn_ref(params) else {
    warn!("Gateway callback rejected: missing transaction reference.");
    return Ok(CallbackOutcome::UnknownReference);
  };
  let payment: Option<Payment> = sqlx::query_as(
    "SELECT id, order_id, txn_ref, amount_cents, status FROM payments WHERE txn_ref = $1",
  )
  .bind(txn_ref)
  .fetch_optional(&state.db_pool)
  .await?;
  let Some(payment) = payment else {
    warn!(%txn_ref, "Gateway callback rejected: unknown transaction reference.");
    return Ok(CallbackOutcome::UnknownReference);
  };

  if gateway::callback_amount(params) != Some(payment.amount_cents) {
    warn!(%txn_ref, expected = payment.amount_cents, "Gateway callback rejected: amount mismatch.");
    return Ok(CallbackOutcome::AmountMismatch {
      order_id: payment.order_id,
    });
  }

  let mut tx = state.db_pool.begin().await?;
  // Row lock so a racing return/IPN pair serializes on the same order.
  let order: Order = sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"))
    .bind(payment.order_id)
    .fetch_one(&mut *tx)
    .await?;

  if !gateway::is_success_code(params) {
    // Close out the attempt; the customer can re-run checkout for a new ref.
    if payment.status == PaymentStatus::Pending {
      sqlx::query("UPDATE payments SET status = 'canceled' WHERE id = $1")
        .bind(payment.id)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    info!(order_id = %order.id, %txn_ref, "Gateway reported non-success; payment attempt closed.");
    return Ok(CallbackOutcome::NotSuccessful { order_id: order.id });
  }

  if !order.status.can_transition_to(OrderStatus::Paid) {
    tx.rollback().await?;
    info!(order_id = %order.id, status = ?order.status, "Duplicate gateway confirmation ignored.");
    return Ok(CallbackOutcome::AlreadyConfirmed { order_id: order.id });
  }

  sqlx::query("UPDATE orders SET status = 'paid' WHERE id = $1")
    .bind(order.id)
    .execute(&mut *tx)
    .await?;
  sqlx::query("UPDATE payments SET status = 'paid' WHERE id = $1")
    .bind(payment.id)
    .execute(&mut *tx)
    .await?;
  sqlx::query("UPDATE carts SET status = 'checkout' WHERE id = $1")
    .bind(order.cart_id)
    .execute(&mut *tx)
    .await?;
  tx.commit().await?;

  info!(order_id = %order.id, %txn_ref, "Order confirmed as PAID.");
  // First transition only: let the owner know there is an order to confirm.
  notification_service::notify_owner_order_paid(&state.db_pool, &order).await?;

  Ok(CallbackOutcome::Confirmed { order_id: order.id })
}
