// src/services/rating_service.rs

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{OrderRating, OrderStatus, Role, User};
use crate::services::order_service;

/// One rating per customer per COMPLETED order; the restaurant's aggregate
/// rating is recomputed in the same transaction.
#[instrument(name = "rating_service::rate_order", skip(pool, customer, comment), fields(customer_id = %customer.id))]
pub async fn rate_order(
  pool: &PgPool,
  customer: &User,
  order_id: Uuid,
  rating: i32,
  comment: Option<&str>,
) -> Result<OrderRating> {
  if !(1..=5).contains(&rating) {
    return Err(AppError::Validation("Rating must be between 1 and 5.".to_string()));
  }
  let order = order_service::fetch_order(pool, order_id).await?;
  if customer.role != Role::Customer || order.customer_id != customer.id {
    return Err(AppError::Forbidden("Only the ordering customer can rate an order.".to_string()));
  }
  if order.status != OrderStatus::Completed {
    return Err(AppError::Conflict("Only delivered orders can be rated.".to_string()));
  }

  let mut tx = pool.begin().await?;
  let inserted = sqlx::query_as::<_, OrderRating>(
    "INSERT INTO order_ratings (order_id, customer_id, rating, comment) VALUES ($1, $2, $3, $4) \
     RETURNING id, order_id, customer_id, rating, comment",
  )
  .bind(order_id)
  .bind(customer.id)
  .bind(rating)
  .bind(comment)
  .fetch_one(&mut *tx)
  .await;
  let inserted = match inserted {
    Ok(rating) => rating,
    Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
      return Err(AppError::Conflict("You have already rated this order.".to_string()));
    }
    Err(e) => return Err(AppError::Sqlx(e)),
  };

  sqlx::query(
    "UPDATE restaurants SET rating_point = ( \
       SELECT COALESCE(AVG(r.rating), 0)::float8 \
       FROM order_ratings r JOIN orders o ON o.id = r.order_id \
       WHERE o.restaurant_id = $1) \
     WHERE id = $1",
  )
  .bind(order.restaurant_id)
  .execute(&mut *tx)
  .await?;
  tx.commit().await?;

  Ok(inserted)
}
