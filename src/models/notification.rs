// src/models/notification.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row can address the customer, the owner, or both sides at once
/// (system cancellations set both recipient columns).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
  pub id: Uuid,
  pub order_id: Uuid,
  pub message: String,
  pub customer_id: Option<Uuid>,
  pub owner_id: Option<Uuid>,
  pub is_read: bool,
  pub created_at: DateTime<Utc>,
}
