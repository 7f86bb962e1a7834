// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub app_base_url: String,

  // Payment gateway (signed redirect/callback protocol)
  pub gateway_pay_url: String,
  pub gateway_merchant_code: String,
  pub gateway_hash_secret: String,
  pub gateway_return_url: String,

  // Order lifecycle
  pub default_waiting_time_minutes: i32,
  pub sweep_interval_secs: u64,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

    let gateway_pay_url =
      get_env("GATEWAY_PAY_URL").unwrap_or_else(|_| "https://sandbox.gateway.example/paymentv2/vpcpay.html".to_string());
    let gateway_merchant_code = get_env("GATEWAY_MERCHANT_CODE").unwrap_or_else(|_| "DEMOTMN1".to_string());
    // The HMAC secret has no sane default; refuse to start without it.
    let gateway_hash_secret = get_env("GATEWAY_HASH_SECRET")?;
    let gateway_return_url =
      get_env("GATEWAY_RETURN_URL").unwrap_or_else(|_| format!("{}/api/v1/payment/return", app_base_url));

    let default_waiting_time_minutes = get_env("DEFAULT_WAITING_TIME_MINUTES")
      .unwrap_or_else(|_| "30".to_string())
      .parse::<i32>()
      .map_err(|e| AppError::Config(format!("Invalid DEFAULT_WAITING_TIME_MINUTES: {}", e)))?;
    let sweep_interval_secs = get_env("SWEEP_INTERVAL_SECS")
      .unwrap_or_else(|_| "60".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid SWEEP_INTERVAL_SECS: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      app_base_url,
      gateway_pay_url,
      gateway_merchant_code,
      gateway_hash_secret,
      gateway_return_url,
      default_waiting_time_minutes,
      sweep_interval_secs,
    })
  }
}
