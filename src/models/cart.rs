// src/models/cart.rs

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A cart stays ACTIVE while the customer is composing it and flips to
/// CHECKOUT once its order has been paid; SAVED parks it for later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "cart_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
  Active,
  Saved,
  Checkout,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Cart {
  pub id: Uuid,
  pub customer_id: Uuid,
  pub restaurant_id: Uuid,
  pub status: CartStatus,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartItem {
  pub id: Uuid,
  pub cart_id: Uuid,
  pub dish_id: Uuid,
  pub quantity: i32,
}

/// Cart line joined with its dish, as rendered to the customer and used for
/// totals at checkout.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartLine {
  pub id: Uuid,
  pub dish_id: Uuid,
  pub dish_name: String,
  pub price_cents: i64,
  pub quantity: i32,
}

impl CartLine {
  pub fn line_total_cents(&self) -> i64 {
    self.price_cents * i64::from(self.quantity)
  }
}

pub fn cart_total_cents(lines: &[CartLine]) -> i64 {
  lines.iter().map(CartLine::line_total_cents).sum()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn totals_sum_per_line() {
    let lines = vec![
      CartLine {
        id: Uuid::new_v4(),
        dish_id: Uuid::new_v4(),
        dish_name: "Pho".into(),
        price_cents: 5_000,
        quantity: 2,
      },
      CartLine {
        id: Uuid::new_v4(),
        dish_id: Uuid::new_v4(),
        dish_name: "Spring rolls".into(),
        price_cents: 3_500,
        quantity: 1,
      },
    ];
    assert_eq!(cart_total_cents(&lines), 13_500);
    assert_eq!(cart_total_cents(&[]), 0);
  }
}
