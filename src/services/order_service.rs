// src/services/order_service.rs

//! Manual order lifecycle transitions and order listings. Every transition
//! re-checks the current status inside the UPDATE itself, so a violated
//! precondition (or a lost race) changes nothing and surfaces as an error.

use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{Order, OrderStatus, Payment, PaymentStatus, Role, User};
use crate::services::notification_service;

const ORDER_COLUMNS: &str = "id, customer_id, restaurant_id, cart_id, status, total_cents, \
                             waiting_time_minutes, canceled_by, delivery_by, created_at";

pub async fn fetch_order(pool: &PgPool, order_id: Uuid) -> Result<Order> {
  sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
    .bind(order_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Order {} not found.", order_id)))
}

/// The order, if the caller may see it: the owning customer or an admin.
pub async fn fetch_order_for(pool: &PgPool, actor: &User, order_id: Uuid) -> Result<Order> {
  let order = fetch_order(pool, order_id).await?;
  if actor.role != Role::Admin && order.customer_id != actor.id {
    return Err(AppError::Forbidden("This is not your order.".to_string()));
  }
  Ok(order)
}

/// Ensures the order belongs to the owner's restaurant.
async fn fetch_order_for_owner(pool: &PgPool, owner_id: Uuid, order_id: Uuid) -> Result<Order> {
  let order = fetch_order(pool, order_id).await?;
  let owner_of_order = notification_service::owner_user_id_for_order(pool, &order).await?;
  if owner_of_order != Some(owner_id) {
    return Err(AppError::Forbidden("This order belongs to another restaurant.".to_string()));
  }
  Ok(order)
}

/// Owner confirms a PAID order: PAID -> ACCEPTED.
#[instrument(name = "order_service::approve_order", skip(pool))]
pub async fn approve_order(pool: &PgPool, owner_id: Uuid, order_id: Uuid) -> Result<Order> {
  let order = fetch_order_for_owner(pool, owner_id, order_id).await?;
  if !order.status.can_transition_to(OrderStatus::Accepted) {
    return Err(AppError::Conflict(format!(
      "Order {} is not in the PAID state.",
      order_id
    )));
  }
  let updated: Option<Order> = sqlx::query_as(&format!(
    "UPDATE orders SET status = 'accepted' WHERE id = $1 AND status = 'paid' RETURNING {ORDER_COLUMNS}"
  ))
  .bind(order_id)
  .fetch_optional(pool)
  .await?;
  updated.ok_or_else(|| AppError::Conflict(format!("Order {} is not in the PAID state.", order_id)))
}

/// Owner cancels a PAID or ACCEPTED order. The customer already paid, so a
/// refund request is raised against the payment and the customer notified.
#[instrument(name = "order_service::owner_cancel_order", skip(pool, reason))]
pub async fn owner_cancel_order(pool: &PgPool, owner_id: Uuid, order_id: Uuid, reason: &str) -> Result<Order> {
  let order = fetch_order_for_owner(pool, owner_id, order_id).await?;
  if !matches!(order.status, OrderStatus::Paid | OrderStatus::Accepted) {
    return Err(AppError::Conflict(format!(
      "Order {} cannot be canceled from the {:?} state.",
      order_id, order.status
    )));
  }

  let mut tx = pool.begin().await?;
  let canceled: Option<Order> = sqlx::query_as(&format!(
    "UPDATE orders SET status = 'canceled', canceled_by = 'restaurant_owner' \
     WHERE id = $1 AND status IN ('paid', 'accepted') RETURNING {ORDER_COLUMNS}"
  ))
  .bind(order_id)
  .fetch_optional(&mut *tx)
  .await?;
  let Some(canceled) = canceled else {
    tx.rollback().await?;
    return Err(AppError::Conflict(format!("Order {} changed state concurrently.", order_id)));
  };

  raise_refund_request(&mut tx, order_id, reason, Role::RestaurantOwner).await?;
  tx.commit().await?;

  info!(%order_id, "Order canceled by the restaurant; refund requested.");
  notification_service::notify_customer_order_canceled(pool, &canceled, reason).await?;
  Ok(canceled)
}

/// Customer (or an admin on their behalf) cancels from PENDING/PAID/ACCEPTED.
/// A refund request is raised only when money actually moved.
#[instrument(name = "order_service::customer_cancel_order", skip(pool, actor), fields(actor_id = %actor.id))]
pub async fn customer_cancel_order(pool: &PgPool, actor: &User, order_id: Uuid) -> Result<Order> {
  let order = fetch_order_for(pool, actor, order_id).await?;
  if !matches!(
    order.status,
    OrderStatus::Pending | OrderStatus::Paid | OrderStatus::Accepted
  ) {
    return Err(AppError::Conflict(format!(
      "Order {} cannot be canceled from the {:?} state.",
      order_id, order.status
    )));
  }

  let mut tx = pool.begin().await?;
  let canceled: Option<Order> = sqlx::query_as(&format!(
    "UPDATE orders SET status = 'canceled', canceled_by = 'customer' \
     WHERE id = $1 AND status IN ('pending', 'paid', 'accepted') RETURNING {ORDER_COLUMNS}"
  ))
  .bind(order_id)
  .fetch_optional(&mut *tx)
  .await?;
  let Some(canceled) = canceled else {
    tx.rollback().await?;
    return Err(AppError::Conflict(format!("Order {} changed state concurrently.", order_id)));
  };

  let payment: Option<Payment> = sqlx::query_as(
    "SELECT id, order_id, txn_ref, amount_cents, status FROM payments WHERE order_id = $1",
  )
  .bind(order_id)
  .fetch_optional(&mut *tx)
  .await?;
  if payment.as_ref().map(|p| p.status) == Some(PaymentStatus::Paid) {
    raise_refund_request(&mut tx, order_id, "Canceled by the customer side.", Role::Customer).await?;
  }
  tx.commit().await?;

  info!(%order_id, "Order canceled by the customer side.");
  notification_service::notify_owner_order_canceled(pool, &canceled).await?;
  Ok(canceled)
}

/// Delivery handoff: ACCEPTED -> COMPLETED, stamped with the admin who
/// closed it out.
#[instrument(name = "order_service::complete_order", skip(pool))]
pub async fn complete_order(pool: &PgPool, admin_id: Uuid, order_id: Uuid) -> Result<Order> {
  let order = fetch_order(pool, order_id).await?;
  if !order.status.can_transition_to(OrderStatus::Completed) {
    return Err(AppError::Conflict(format!(
      "Order {} is not in the ACCEPTED state.",
      order_id
    )));
  }
  let updated: Option<Order> = sqlx::query_as(&format!(
    "UPDATE orders SET status = 'completed', delivery_by = $2 \
     WHERE id = $1 AND status = 'accepted' RETURNING {ORDER_COLUMNS}"
  ))
  .bind(order_id)
  .bind(admin_id)
  .fetch_optional(pool)
  .await?;
  let updated = updated.ok_or_else(|| AppError::Conflict(format!("Order {} is not in the ACCEPTED state.", order_id)))?;

  notification_service::notify_customer_order_completed(pool, &updated).await?;
  Ok(updated)
}

/// Marks the payment as refunded and records the refund request.
async fn raise_refund_request(
  tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
  order_id: Uuid,
  reason: &str,
  requested_by: Role,
) -> Result<()> {
  let payment: Option<Payment> = sqlx::query_as(
    "SELECT id, order_id, txn_ref, amount_cents, status FROM payments WHERE order_id = $1",
  )
  .bind(order_id)
  .fetch_optional(&mut **tx)
  .await?;
  let Some(payment) = payment else {
    // Nothing was ever paid for this order; no refund to request.
    return Ok(());
  };

  sqlx::query("UPDATE payments SET status = 'refund' WHERE id = $1")
    .bind(payment.id)
    .execute(&mut **tx)
    .await?;
  sqlx::query("INSERT INTO refunds (payment_id, reason, requested_by, status) VALUES ($1, $2, $3, 'requested')")
    .bind(payment.id)
    .bind(reason)
    .bind(requested_by)
    .execute(&mut **tx)
    .await?;
  Ok(())
}

/// Customer's own orders, newest first, optionally filtered by status.
pub async fn list_customer_orders(
  pool: &PgPool,
  customer_id: Uuid,
  status: Option<OrderStatus>,
  page: i64,
  per_page: i64,
) -> Result<(Vec<Order>, i64)> {
  let offset = (page.max(1) - 1) * per_page;
  let (orders, total) = match status {
    Some(status) => {
      let orders: Vec<Order> = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 AND status = $2 \
         ORDER BY created_at DESC LIMIT $3 OFFSET $4"
      ))
      .bind(customer_id)
      .bind(status)
      .bind(per_page)
      .bind(offset)
      .fetch_all(pool)
      .await?;
      let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE customer_id = $1 AND status = $2")
        .bind(customer_id)
        .bind(status)
        .fetch_one(pool)
        .await?;
      (orders, total)
    }
    None => {
      let orders: Vec<Order> = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 \
         ORDER BY created_at DESC LIMIT $2 OFFSET $3"
      ))
      .bind(customer_id)
      .bind(per_page)
      .bind(offset)
      .fetch_all(pool)
      .await?;
      let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE customer_id = $1")
        .bind(customer_id)
        .fetch_one(pool)
        .await?;
      (orders, total)
    }
  };
  Ok((orders, total))
}

/// All of a restaurant's orders in one status, for the owner's dashboard
/// buckets.
pub async fn list_restaurant_orders(pool: &PgPool, restaurant_id: Uuid, status: OrderStatus) -> Result<Vec<Order>> {
  let orders = sqlx::query_as(&format!(
    "SELECT {ORDER_COLUMNS} FROM orders WHERE restaurant_id = $1 AND status = $2 ORDER BY created_at DESC"
  ))
  .bind(restaurant_id)
  .bind(status)
  .fetch_all(pool)
  .await?;
  Ok(orders)
}

/// Every order in the system, newest first, for the admin delivery board.
pub async fn list_all_orders(pool: &PgPool) -> Result<Vec<Order>> {
  let orders = sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"))
    .fetch_all(pool)
    .await?;
  Ok(orders)
}
