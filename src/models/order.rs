// src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
  Pending,
  Paid,
  Accepted,
  Canceled,
  Completed,
}

impl OrderStatus {
  /// CANCELED and COMPLETED orders never move again.
  pub fn is_terminal(self) -> bool {
    matches!(self, OrderStatus::Canceled | OrderStatus::Completed)
  }

  /// The lifecycle transition table. Transitions are forward-only:
  /// PENDING -> PAID -> ACCEPTED -> COMPLETED, with CANCELED reachable from
  /// any non-terminal state.
  pub fn can_transition_to(self, next: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
      (self, next),
      (Pending, Paid) | (Paid, Accepted) | (Accepted, Completed) | (Pending | Paid | Accepted, Canceled)
    )
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub customer_id: Uuid,
  pub restaurant_id: Uuid,
  pub cart_id: Uuid,
  pub status: OrderStatus,
  pub total_cents: i64,
  pub waiting_time_minutes: i32,
  pub canceled_by: Option<Role>,
  pub delivery_by: Option<Uuid>,
  pub created_at: DateTime<Utc>,
}

impl Order {
  /// True once a PAID order has sat unaccepted past its waiting window.
  /// Only PAID orders expire; PENDING and ACCEPTED never do.
  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    if self.status != OrderStatus::Paid {
      return false;
    }
    let deadline = self.created_at + chrono::Duration::minutes(i64::from(self.waiting_time_minutes));
    now >= deadline
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  fn order(status: OrderStatus, age_minutes: i64, waiting: i32) -> (Order, DateTime<Utc>) {
    let now = Utc::now();
    let order = Order {
      id: Uuid::new_v4(),
      customer_id: Uuid::new_v4(),
      restaurant_id: Uuid::new_v4(),
      cart_id: Uuid::new_v4(),
      status,
      total_cents: 10_000,
      waiting_time_minutes: waiting,
      canceled_by: None,
      delivery_by: None,
      created_at: now - Duration::minutes(age_minutes),
    };
    (order, now)
  }

  #[test]
  fn transitions_follow_the_lifecycle() {
    use OrderStatus::*;
    assert!(Pending.can_transition_to(Paid));
    assert!(Paid.can_transition_to(Accepted));
    assert!(Accepted.can_transition_to(Completed));
    for from in [Pending, Paid, Accepted] {
      assert!(from.can_transition_to(Canceled));
    }
  }

  #[test]
  fn no_backward_or_skipping_transitions() {
    use OrderStatus::*;
    assert!(!Completed.can_transition_to(Paid));
    assert!(!Canceled.can_transition_to(Pending));
    assert!(!Canceled.can_transition_to(Paid));
    assert!(!Pending.can_transition_to(Accepted));
    assert!(!Pending.can_transition_to(Completed));
    assert!(!Paid.can_transition_to(Completed));
    assert!(!Accepted.can_transition_to(Paid));
    assert!(!Completed.can_transition_to(Canceled));
  }

  #[test]
  fn terminal_states() {
    use OrderStatus::*;
    assert!(Canceled.is_terminal());
    assert!(Completed.is_terminal());
    assert!(!Pending.is_terminal());
    assert!(!Paid.is_terminal());
    assert!(!Accepted.is_terminal());
  }

  #[test]
  fn only_overdue_paid_orders_expire() {
    let (overdue, now) = order(OrderStatus::Paid, 31, 30);
    assert!(overdue.is_expired_at(now));

    let (fresh, now) = order(OrderStatus::Paid, 10, 30);
    assert!(!fresh.is_expired_at(now));

    // Age alone is not enough; the state has to be PAID.
    let (pending, now) = order(OrderStatus::Pending, 120, 30);
    assert!(!pending.is_expired_at(now));
    let (accepted, now) = order(OrderStatus::Accepted, 120, 30);
    assert!(!accepted.is_expired_at(now));
  }

  #[test]
  fn expiry_boundary_is_inclusive() {
    let (order, now) = order(OrderStatus::Paid, 30, 30);
    assert!(order.is_expired_at(now));
  }
}
