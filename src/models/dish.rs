// src/models/dish.rs

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Dish {
  pub id: Uuid,
  pub restaurant_id: Uuid,
  pub name: String,
  pub price_cents: i64,
  pub is_available: bool,
  pub note: Option<String>,
}
