// src/sweep.rs

//! Idle-order expiry sweep.
//!
//! PAID orders the restaurant never confirms are canceled once their waiting
//! window runs out, attributed to the restaurant side, with both parties
//! notified. The sweep is a single sequential loop on a fixed interval:
//! `MissedTickBehavior::Skip` coalesces ticks that pile up behind a slow
//! run, so at most one sweep is ever in flight.

use chrono::Utc;
use sqlx::PgPool;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info, instrument};

use crate::errors::Result;
use crate::models::Order;
use crate::services::notification_service;
use crate::state::AppState;

const ORDER_COLUMNS: &str = "id, customer_id, restaurant_id, cart_id, status, total_cents, \
                             waiting_time_minutes, canceled_by, delivery_by, created_at";

pub fn spawn_expiry_sweep(state: AppState) -> tokio::task::JoinHandle<()> {
  let period = Duration::from_secs(state.config.sweep_interval_secs);
  tokio::spawn(async move {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
      ticker.tick().await;
      match run_expiry_sweep(&state.db_pool).await {
        Ok(0) => {}
        Ok(canceled) => info!(canceled, "Expiry sweep canceled overdue orders."),
        Err(e) => error!(error = %e, "Expiry sweep failed; will retry next tick."),
      }
    }
  })
}

/// One sweep pass. Returns how many orders were canceled.
#[instrument(name = "sweep::run_expiry_sweep", skip(pool))]
pub async fn run_expiry_sweep(pool: &PgPool) -> Result<u64> {
  let now = Utc::now();
  let candidates: Vec<Order> = sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE status = 'paid'"))
    .fetch_all(pool)
    .await?;

  let mut canceled = 0;
  for order in candidates.iter().filter(|o| o.is_expired_at(now)) {
    // The status guard in the UPDATE makes a racing owner approval win.
    let expired: Option<Order> = sqlx::query_as(&format!(
      "UPDATE orders SET status = 'canceled', canceled_by = 'restaurant_owner' \
       WHERE id = $1 AND status = 'paid' RETURNING {ORDER_COLUMNS}"
    ))
    .bind(order.id)
    .fetch_optional(pool)
    .await?;

    if let Some(expired) = expired {
      info!(order_id = %expired.id, waiting_time_minutes = expired.waiting_time_minutes, "Canceled overdue order.");
      notification_service::notify_order_expired(pool, &expired).await?;
      canceled += 1;
    }
  }
  Ok(canceled)
}
