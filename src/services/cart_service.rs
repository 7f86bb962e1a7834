// src/services/cart_service.rs

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{Cart, CartItem, CartLine, Dish};

pub async fn active_cart(pool: &PgPool, customer_id: Uuid, restaurant_id: Uuid) -> Result<Option<Cart>> {
  let cart = sqlx::query_as(
    "SELECT id, customer_id, restaurant_id, status FROM carts \
     WHERE customer_id = $1 AND restaurant_id = $2 AND status = 'active'",
  )
  .bind(customer_id)
  .bind(restaurant_id)
  .fetch_optional(pool)
  .await?;
  Ok(cart)
}

/// Fetches the customer's ACTIVE cart for a restaurant, creating it on first
/// use. The partial unique index on (customer, restaurant, active) makes the
/// insert race-safe; a concurrent insert just falls through to the select.
async fn get_or_create_active_cart(pool: &PgPool, customer_id: Uuid, restaurant_id: Uuid) -> Result<Cart> {
  if let Some(cart) = active_cart(pool, customer_id, restaurant_id).await? {
    return Ok(cart);
  }
  sqlx::query(
    "INSERT INTO carts (customer_id, restaurant_id, status) VALUES ($1, $2, 'active') \
     ON CONFLICT (customer_id, restaurant_id) WHERE status = 'active' DO NOTHING",
  )
  .bind(customer_id)
  .bind(restaurant_id)
  .execute(pool)
  .await?;

  active_cart(pool, customer_id, restaurant_id)
    .await?
    .ok_or_else(|| AppError::Internal("Active cart disappeared after creation.".to_string()))
}

/// Cart lines joined with their dishes, for rendering and totalling.
pub async fn cart_lines(pool: &PgPool, cart_id: Uuid) -> Result<Vec<CartLine>> {
  let lines = sqlx::query_as(
    "SELECT ci.id, ci.dish_id, d.name AS dish_name, d.price_cents, ci.quantity \
     FROM cart_items ci JOIN dishes d ON d.id = ci.dish_id \
     WHERE ci.cart_id = $1 ORDER BY d.name ASC",
  )
  .bind(cart_id)
  .fetch_all(pool)
  .await?;
  Ok(lines)
}

/// Adds a dish to the customer's active cart for its restaurant, bumping the
/// quantity when the dish is already in the cart.
#[instrument(name = "cart_service::add_item", skip(pool))]
pub async fn add_item(pool: &PgPool, customer_id: Uuid, dish_id: Uuid, quantity: i32) -> Result<CartItem> {
  if quantity <= 0 {
    return Err(AppError::Validation("Quantity must be positive.".to_string()));
  }

  let dish: Option<Dish> = sqlx::query_as(
    "SELECT id, restaurant_id, name, price_cents, is_available, note FROM dishes WHERE id = $1",
  )
  .bind(dish_id)
  .fetch_optional(pool)
  .await?;
  let Some(dish) = dish else {
    return Err(AppError::NotFound(format!("Dish {} not found.", dish_id)));
  };
  if !dish.is_available {
    return Err(AppError::Validation(format!("Dish '{}' is not available.", dish.name)));
  }

  let cart = get_or_create_active_cart(pool, customer_id, dish.restaurant_id).await?;

  let item = sqlx::query_as(
    "INSERT INTO cart_items (cart_id, dish_id, quantity) VALUES ($1, $2, $3) \
     ON CONFLICT (cart_id, dish_id) \
     DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity \
     RETURNING id, cart_id, dish_id, quantity",
  )
  .bind(cart.id)
  .bind(dish.id)
  .bind(quantity)
  .fetch_one(pool)
  .await?;
  Ok(item)
}

/// Sets a line's quantity; zero or less removes the line. Only lines in the
/// customer's own ACTIVE carts are touchable.
#[instrument(name = "cart_service::update_item", skip(pool))]
pub async fn update_item(pool: &PgPool, customer_id: Uuid, item_id: Uuid, quantity: i32) -> Result<Option<CartItem>> {
  if quantity <= 0 {
    remove_item(pool, customer_id, item_id).await?;
    return Ok(None);
  }
  let item = sqlx::query_as(
    "UPDATE cart_items ci SET quantity = $3 \
     FROM carts c \
     WHERE ci.id = $1 AND ci.cart_id = c.id AND c.customer_id = $2 AND c.status = 'active' \
     RETURNING ci.id, ci.cart_id, ci.dish_id, ci.quantity",
  )
  .bind(item_id)
  .bind(customer_id)
  .bind(quantity)
  .fetch_optional(pool)
  .await?
  .ok_or_else(|| AppError::NotFound(format!("Cart item {} not found.", item_id)))?;
  Ok(Some(item))
}

pub async fn remove_item(pool: &PgPool, customer_id: Uuid, item_id: Uuid) -> Result<()> {
  let result = sqlx::query(
    "DELETE FROM cart_items ci USING carts c \
     WHERE ci.id = $1 AND ci.cart_id = c.id AND c.customer_id = $2 AND c.status = 'active'",
  )
  .bind(item_id)
  .bind(customer_id)
  .execute(pool)
  .await?;
  if result.rows_affected() == 0 {
    return Err(AppError::NotFound(format!("Cart item {} not found.", item_id)));
  }
  Ok(())
}
