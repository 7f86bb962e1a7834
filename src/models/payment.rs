// src/models/payment.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
  Pending,
  Paid,
  Canceled,
  Refund,
}

/// One payment row per order. `txn_ref` is regenerated on every checkout
/// attempt so each gateway redirect correlates to exactly one reference;
/// `amount_cents` is what the gateway callback must echo back.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Payment {
  pub id: Uuid,
  pub order_id: Uuid,
  pub txn_ref: String,
  pub amount_cents: i64,
  pub status: PaymentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "refund_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
  Requested,
  Completed,
  Failed,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Refund {
  pub id: Uuid,
  pub payment_id: Uuid,
  pub reason: Option<String>,
  pub requested_by: Role,
  pub status: RefundStatus,
  pub created_at: DateTime<Utc>,
  pub completed_at: Option<DateTime<Utc>>,
}
