// src/services/notification_service.rs

//! In-app notifications written by order lifecycle events and read back
//! through the feed endpoints. A single row can address the customer, the
//! owner, or both parties at once.

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{Notification, Order, Role, User};

async fn insert(
  pool: &PgPool,
  order_id: Uuid,
  message: &str,
  customer_id: Option<Uuid>,
  owner_id: Option<Uuid>,
) -> Result<()> {
  sqlx::query("INSERT INTO notifications (order_id, message, customer_id, owner_id) VALUES ($1, $2, $3, $4)")
    .bind(order_id)
    .bind(message)
    .bind(customer_id)
    .bind(owner_id)
    .execute(pool)
    .await?;
  Ok(())
}

/// order -> restaurant -> owner user id.
pub async fn owner_user_id_for_order(pool: &PgPool, order: &Order) -> Result<Option<Uuid>> {
  let owner_id: Option<(Uuid,)> = sqlx::query_as("SELECT owner_id FROM restaurants WHERE id = $1")
    .bind(order.restaurant_id)
    .fetch_optional(pool)
    .await?;
  Ok(owner_id.map(|(id,)| id))
}

/// PAID -> tell the owner there is an order waiting for confirmation.
pub async fn notify_owner_order_paid(pool: &PgPool, order: &Order) -> Result<()> {
  if let Some(owner_id) = owner_user_id_for_order(pool, order).await? {
    insert(pool, order.id, "You have a new order to confirm.", None, Some(owner_id)).await?;
  }
  Ok(())
}

/// COMPLETED -> tell the customer the delivery arrived.
pub async fn notify_customer_order_completed(pool: &PgPool, order: &Order) -> Result<()> {
  insert(
    pool,
    order.id,
    "Your order has been delivered successfully.",
    Some(order.customer_id),
    None,
  )
  .await
}

/// Expiry sweep cancellation -> one row addressed to both parties.
pub async fn notify_order_expired(pool: &PgPool, order: &Order) -> Result<()> {
  let owner_id = owner_user_id_for_order(pool, order).await?;
  insert(
    pool,
    order.id,
    "The order was canceled because it was not confirmed in time.",
    Some(order.customer_id),
    owner_id,
  )
  .await
}

/// Customer-side cancellation -> tell the owner.
pub async fn notify_owner_order_canceled(pool: &PgPool, order: &Order) -> Result<()> {
  if let Some(owner_id) = owner_user_id_for_order(pool, order).await? {
    insert(
      pool,
      order.id,
      "An order was canceled by the customer side.",
      None,
      Some(owner_id),
    )
    .await?;
  }
  Ok(())
}

/// Owner-side cancellation -> tell the customer, with the owner's reason.
pub async fn notify_customer_order_canceled(pool: &PgPool, order: &Order, reason: &str) -> Result<()> {
  let message = if reason.is_empty() {
    "Your order was canceled by the restaurant.".to_string()
  } else {
    format!("Your order was canceled by the restaurant: {}", reason)
  };
  insert(pool, order.id, &message, Some(order.customer_id), None).await
}

/// Newest-first feed for the caller plus their unread count. Reading the
/// feed does not mark anything read.
#[instrument(name = "notification_service::feed", skip(pool, user), fields(user_id = %user.id))]
pub async fn feed(pool: &PgPool, user: &User, limit: i64) -> Result<(Vec<Notification>, i64)> {
  let recipient_column = recipient_column(user.role)?;
  let items: Vec<Notification> = sqlx::query_as(&format!(
    "SELECT id, order_id, message, customer_id, owner_id, is_read, created_at \
     FROM notifications WHERE {recipient_column} = $1 ORDER BY created_at DESC LIMIT $2"
  ))
  .bind(user.id)
  .bind(limit)
  .fetch_all(pool)
  .await?;

  let (unread,): (i64,) = sqlx::query_as(&format!(
    "SELECT COUNT(*) FROM notifications WHERE {recipient_column} = $1 AND NOT is_read"
  ))
  .bind(user.id)
  .fetch_one(pool)
  .await?;

  Ok((items, unread))
}

pub async fn mark_read(pool: &PgPool, user: &User, ids: &[Uuid]) -> Result<u64> {
  if ids.is_empty() {
    return Ok(0);
  }
  let recipient_column = recipient_column(user.role)?;
  let result = sqlx::query(&format!(
    "UPDATE notifications SET is_read = TRUE WHERE id = ANY($1) AND {recipient_column} = $2"
  ))
  .bind(ids)
  .bind(user.id)
  .execute(pool)
  .await?;
  Ok(result.rows_affected())
}

pub async fn mark_read_one(pool: &PgPool, user: &User, notification_id: Uuid) -> Result<()> {
  let updated = mark_read(pool, user, &[notification_id]).await?;
  if updated == 0 {
    return Err(AppError::NotFound(format!("Notification {} not found.", notification_id)));
  }
  Ok(())
}

pub async fn mark_all_read(pool: &PgPool, user: &User) -> Result<u64> {
  let recipient_column = recipient_column(user.role)?;
  let result = sqlx::query(&format!(
    "UPDATE notifications SET is_read = TRUE WHERE {recipient_column} = $1 AND NOT is_read"
  ))
  .bind(user.id)
  .execute(pool)
  .await?;
  Ok(result.rows_affected())
}

/// Which recipient column the caller reads: owners see owner-addressed rows,
/// customers see customer-addressed rows. Admins have no feed.
fn recipient_column(role: Role) -> Result<&'static str> {
  match role {
    Role::Customer => Ok("customer_id"),
    Role::RestaurantOwner => Ok("owner_id"),
    Role::Admin => Err(AppError::Forbidden("Admins do not have a notification feed.".to_string())),
  }
}
