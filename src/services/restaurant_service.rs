// src/services/restaurant_service.rs

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{Dish, Restaurant};

/// Approved restaurants, optionally filtered by name or by the name of a
/// dish on their menu.
#[instrument(name = "restaurant_service::list", skip(pool))]
pub async fn list_restaurants(pool: &PgPool, search: Option<&str>) -> Result<Vec<Restaurant>> {
  let restaurants = match search {
    Some(keyword) if !keyword.trim().is_empty() => {
      let pattern = format!("%{}%", keyword.trim());
      sqlx::query_as::<_, Restaurant>(
        "SELECT id, name, owner_id, address, open_hour, close_hour, status, rating_point \
         FROM restaurants r \
         WHERE r.status = 'approved' AND (r.name ILIKE $1 OR EXISTS ( \
           SELECT 1 FROM dishes d WHERE d.restaurant_id = r.id AND d.name ILIKE $1)) \
         ORDER BY r.rating_point DESC, r.name ASC",
      )
      .bind(pattern)
      .fetch_all(pool)
      .await?
    }
    _ => {
      sqlx::query_as::<_, Restaurant>(
        "SELECT id, name, owner_id, address, open_hour, close_hour, status, rating_point \
         FROM restaurants WHERE status = 'approved' \
         ORDER BY rating_point DESC, name ASC LIMIT 50",
      )
      .fetch_all(pool)
      .await?
    }
  };
  Ok(restaurants)
}

pub async fn get_restaurant(pool: &PgPool, restaurant_id: Uuid) -> Result<Restaurant> {
  sqlx::query_as(
    "SELECT id, name, owner_id, address, open_hour, close_hour, status, rating_point \
     FROM restaurants WHERE id = $1",
  )
  .bind(restaurant_id)
  .fetch_optional(pool)
  .await?
  .ok_or_else(|| AppError::NotFound(format!("Restaurant {} not found.", restaurant_id)))
}

/// The restaurant owned by the given user, if any. Owners have at most one.
pub async fn restaurant_of_owner(pool: &PgPool, owner_id: Uuid) -> Result<Restaurant> {
  sqlx::query_as(
    "SELECT id, name, owner_id, address, open_hour, close_hour, status, rating_point \
     FROM restaurants WHERE owner_id = $1",
  )
  .bind(owner_id)
  .fetch_optional(pool)
  .await?
  .ok_or_else(|| AppError::Forbidden("You do not have a restaurant.".to_string()))
}

pub async fn available_menu(pool: &PgPool, restaurant_id: Uuid) -> Result<Vec<Dish>> {
  let dishes = sqlx::query_as(
    "SELECT id, restaurant_id, name, price_cents, is_available, note \
     FROM dishes WHERE restaurant_id = $1 AND is_available ORDER BY name ASC",
  )
  .bind(restaurant_id)
  .fetch_all(pool)
  .await?;
  Ok(dishes)
}
