// src/state.rs

use crate::config::AppConfig;
use parking_lot::RwLock;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub config: Arc<AppConfig>,
  /// Waiting time applied to newly checked-out orders, adjustable by admins
  /// at runtime without a restart.
  pub waiting_time_minutes: Arc<RwLock<i32>>,
}

impl AppState {
  pub fn new(db_pool: PgPool, config: Arc<AppConfig>) -> Self {
    let waiting_time_minutes = Arc::new(RwLock::new(config.default_waiting_time_minutes));
    Self {
      db_pool,
      config,
      waiting_time_minutes,
    }
  }

  pub fn current_waiting_time_minutes(&self) -> i32 {
    *self.waiting_time_minutes.read()
  }

  pub fn set_waiting_time_minutes(&self, minutes: i32) {
    *self.waiting_time_minutes.write() = minutes;
  }
}
