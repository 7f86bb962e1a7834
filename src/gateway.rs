// src/gateway.rs

//! Signed redirect/callback protocol for the third-party payment gateway.
//!
//! The gateway contract: every request and callback carries a flat set of
//! `vnp_*` query parameters plus a `vnp_SecureHash`, an HMAC-SHA512 over the
//! remaining parameters sorted by key and form-urlencoded. Both sides compute
//! the same canonical string, so verification is a constant-time MAC check.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use rand_core::{OsRng, RngCore};
use sha2::Sha512;
use uuid::Uuid;

type HmacSha512 = Hmac<Sha512>;

pub const PARAM_SECURE_HASH: &str = "vnp_SecureHash";
pub const PARAM_SECURE_HASH_TYPE: &str = "vnp_SecureHashType";
pub const PARAM_TXN_REF: &str = "vnp_TxnRef";
pub const PARAM_AMOUNT: &str = "vnp_Amount";
pub const PARAM_RESPONSE_CODE: &str = "vnp_ResponseCode";

/// Gateway response code meaning the transaction succeeded.
pub const RESPONSE_CODE_SUCCESS: &str = "00";

/// Reply codes for the server-to-server notification (IPN) endpoint. The
/// gateway keys retries off these, so "already confirmed" and "confirm
/// received" both stop the retry loop while signaling different outcomes.
pub mod ipn_code {
  pub const CONFIRMED: &str = "00";
  pub const ORDER_NOT_FOUND: &str = "01";
  pub const ALREADY_CONFIRMED: &str = "02";
  pub const INVALID_AMOUNT: &str = "04";
  pub const INVALID_SIGNATURE: &str = "97";
}

/// The canonical string both sides sign: parameters sorted by key,
/// form-urlencoded, with the hash parameters themselves left out.
fn canonical_query(params: &BTreeMap<String, String>) -> String {
  let mut ser = form_urlencoded::Serializer::new(String::new());
  for (key, value) in params {
    if key == PARAM_SECURE_HASH || key == PARAM_SECURE_HASH_TYPE {
      continue;
    }
    ser.append_pair(key, value);
  }
  ser.finish()
}

/// Hex HMAC-SHA512 signature over the canonical parameter string.
pub fn sign(params: &BTreeMap<String, String>, secret: &str) -> String {
  let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
  mac.update(canonical_query(params).as_bytes());
  hex::encode(mac.finalize().into_bytes())
}

/// Constant-time verification of the `vnp_SecureHash` carried by a callback.
/// Missing or non-hex signatures fail closed.
pub fn verify_signature(params: &BTreeMap<String, String>, secret: &str) -> bool {
  let Some(received) = params.get(PARAM_SECURE_HASH) else {
    return false;
  };
  let Ok(received_raw) = hex::decode(received) else {
    return false;
  };
  let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
  mac.update(canonical_query(params).as_bytes());
  mac.verify_slice(&received_raw).is_ok()
}

/// Mints a fresh transaction reference for one checkout attempt. The epoch
/// second and random suffix keep references unique across retries for the
/// same order.
pub fn new_txn_ref(order_id: Uuid) -> String {
  let mut suffix = [0u8; 4];
  OsRng.fill_bytes(&mut suffix);
  let mut order_short = order_id.simple().to_string();
  order_short.truncate(8);
  format!("OD{}-{}-{}", order_short, Utc::now().timestamp(), hex::encode(suffix))
}

/// Everything the redirect URL needs besides static gateway configuration.
#[derive(Debug)]
pub struct PaymentRequest<'a> {
  pub merchant_code: &'a str,
  pub amount_cents: i64,
  pub txn_ref: &'a str,
  pub order_info: String,
  pub client_ip: String,
  pub return_url: &'a str,
  pub created_at: DateTime<Utc>,
}

/// Builds the signed gateway URL the customer is redirected to.
pub fn build_payment_url(pay_url: &str, secret: &str, request: &PaymentRequest<'_>) -> String {
  let mut params = BTreeMap::new();
  params.insert("vnp_Version".to_string(), "2.1.0".to_string());
  params.insert("vnp_Command".to_string(), "pay".to_string());
  params.insert("vnp_TmnCode".to_string(), request.merchant_code.to_string());
  params.insert(PARAM_AMOUNT.to_string(), request.amount_cents.to_string());
  params.insert("vnp_CurrCode".to_string(), "VND".to_string());
  params.insert(PARAM_TXN_REF.to_string(), request.txn_ref.to_string());
  params.insert("vnp_OrderInfo".to_string(), request.order_info.clone());
  params.insert("vnp_OrderType".to_string(), "other".to_string());
  params.insert("vnp_Locale".to_string(), "vn".to_string());
  params.insert("vnp_IpAddr".to_string(), request.client_ip.clone());
  params.insert(
    "vnp_CreateDate".to_string(),
    request.created_at.format("%Y%m%d%H%M%S").to_string(),
  );
  params.insert("vnp_ReturnUrl".to_string(), request.return_url.to_string());
  params.insert(PARAM_SECURE_HASH_TYPE.to_string(), "HmacSHA512".to_string());

  let signature = sign(&params, secret);
  params.insert(PARAM_SECURE_HASH.to_string(), signature);

  let mut ser = form_urlencoded::Serializer::new(String::new());
  for (key, value) in &params {
    ser.append_pair(key, value);
  }
  format!("{}?{}", pay_url, ser.finish())
}

/// The callback's echoed amount, if present and numeric.
pub fn callback_amount(params: &BTreeMap<String, String>) -> Option<i64> {
  params.get(PARAM_AMOUNT)?.parse().ok()
}

pub fn callback_txn_ref(params: &BTreeMap<String, String>) -> Option<&str> {
  params.get(PARAM_TXN_REF).map(String::as_str)
}

pub fn is_success_code(params: &BTreeMap<String, String>) -> bool {
  params.get(PARAM_RESPONSE_CODE).map(String::as_str) == Some(RESPONSE_CODE_SUCCESS)
}
