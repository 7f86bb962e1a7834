// src/models/rating.rs

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderRating {
  pub id: Uuid,
  pub order_id: Uuid,
  pub customer_id: Uuid,
  pub rating: i32,
  pub comment: Option<String>,
}
