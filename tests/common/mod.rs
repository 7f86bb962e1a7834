// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub const TEST_SECRET: &str = "test-hash-secret";

/// A representative callback parameter set, before signing.
pub fn callback_params(txn_ref: &str, amount_cents: i64, response_code: &str) -> BTreeMap<String, String> {
  let mut params = BTreeMap::new();
  params.insert("vnp_TmnCode".to_string(), "DEMOTMN1".to_string());
  params.insert("vnp_Amount".to_string(), amount_cents.to_string());
  params.insert("vnp_TxnRef".to_string(), txn_ref.to_string());
  params.insert("vnp_ResponseCode".to_string(), response_code.to_string());
  params.insert("vnp_OrderInfo".to_string(), "Order test".to_string());
  params.insert("vnp_PayDate".to_string(), "20260101120000".to_string());
  params
}

/// Signs the parameter set the way the gateway would before calling back.
pub fn signed_callback_params(txn_ref: &str, amount_cents: i64, response_code: &str) -> BTreeMap<String, String> {
  let mut params = callback_params(txn_ref, amount_cents, response_code);
  let signature = foodcourt::gateway::sign(&params, TEST_SECRET);
  params.insert(foodcourt::gateway::PARAM_SECURE_HASH.to_string(), signature);
  params
}
