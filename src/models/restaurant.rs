// src/models/restaurant.rs

use chrono::NaiveTime;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "restaurant_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RestaurantStatus {
  Pending,
  Approved,
  Rejected,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Restaurant {
  pub id: Uuid,
  pub name: String,
  pub owner_id: Uuid,
  pub address: Option<String>,
  pub open_hour: Option<String>,
  pub close_hour: Option<String>,
  pub status: RestaurantStatus,
  pub rating_point: f64,
}

impl Restaurant {
  /// Whether the restaurant is currently taking orders, judged from its
  /// "HH:MM" opening hours. Missing or malformed hours read as closed.
  pub fn is_open_at(&self, now: NaiveTime) -> bool {
    let (Some(open), Some(close)) = (&self.open_hour, &self.close_hour) else {
      return false;
    };
    match (
      NaiveTime::parse_from_str(open, "%H:%M"),
      NaiveTime::parse_from_str(close, "%H:%M"),
    ) {
      (Ok(open), Ok(close)) => open <= now && now <= close,
      _ => false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn restaurant(open: Option<&str>, close: Option<&str>) -> Restaurant {
    Restaurant {
      id: Uuid::new_v4(),
      name: "Test Kitchen".to_string(),
      owner_id: Uuid::new_v4(),
      address: None,
      open_hour: open.map(String::from),
      close_hour: close.map(String::from),
      status: RestaurantStatus::Approved,
      rating_point: 0.0,
    }
  }

  #[test]
  fn open_within_hours() {
    let r = restaurant(Some("08:00"), Some("22:00"));
    assert!(r.is_open_at(NaiveTime::from_hms_opt(12, 0, 0).unwrap()));
    assert!(!r.is_open_at(NaiveTime::from_hms_opt(23, 0, 0).unwrap()));
    assert!(!r.is_open_at(NaiveTime::from_hms_opt(7, 59, 0).unwrap()));
  }

  #[test]
  fn malformed_or_missing_hours_read_as_closed() {
    let r = restaurant(Some("8am"), Some("late"));
    assert!(!r.is_open_at(NaiveTime::from_hms_opt(12, 0, 0).unwrap()));
    let r = restaurant(None, None);
    assert!(!r.is_open_at(NaiveTime::from_hms_opt(12, 0, 0).unwrap()));
  }
}
