// tests/gateway_tests.rs
mod common;

use std::collections::BTreeMap;

use common::*;
use foodcourt::gateway::{
  self, PaymentRequest, PARAM_SECURE_HASH, PARAM_SECURE_HASH_TYPE,
};
use uuid::Uuid;

#[test]
fn signature_roundtrip_verifies() {
  setup_tracing();
  let params = signed_callback_params("OD1234-1-abcd", 15_000, "00");
  assert!(gateway::verify_signature(&params, TEST_SECRET));
}

#[test]
fn tampered_parameter_fails_verification() {
  setup_tracing();
  let mut params = signed_callback_params("OD1234-1-abcd", 15_000, "00");
  params.insert("vnp_Amount".to_string(), "1".to_string());
  assert!(!gateway::verify_signature(&params, TEST_SECRET));
}

#[test]
fn added_parameter_fails_verification() {
  let mut params = signed_callback_params("OD1234-1-abcd", 15_000, "00");
  params.insert("vnp_Extra".to_string(), "surprise".to_string());
  assert!(!gateway::verify_signature(&params, TEST_SECRET));
}

#[test]
fn wrong_secret_fails_verification() {
  let params = signed_callback_params("OD1234-1-abcd", 15_000, "00");
  assert!(!gateway::verify_signature(&params, "some-other-secret"));
}

#[test]
fn missing_or_malformed_hash_fails_closed() {
  let unsigned = callback_params("OD1234-1-abcd", 15_000, "00");
  assert!(!gateway::verify_signature(&unsigned, TEST_SECRET));

  let mut bad_hex = unsigned.clone();
  bad_hex.insert(PARAM_SECURE_HASH.to_string(), "not-hex!".to_string());
  assert!(!gateway::verify_signature(&bad_hex, TEST_SECRET));
}

#[test]
fn hash_parameters_are_excluded_from_the_signed_string() {
  // The gateway echoes vnp_SecureHashType back on callbacks; its presence
  // must not change the signature.
  let without = callback_params("OD1234-1-abcd", 15_000, "00");
  let mut with = without.clone();
  with.insert(PARAM_SECURE_HASH_TYPE.to_string(), "HmacSHA512".to_string());
  assert_eq!(gateway::sign(&without, TEST_SECRET), gateway::sign(&with, TEST_SECRET));
}

#[test]
fn signature_is_hex_sha512_sized() {
  let params = callback_params("OD1234-1-abcd", 15_000, "00");
  let signature = gateway::sign(&params, TEST_SECRET);
  assert_eq!(signature.len(), 128);
  assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn payment_url_carries_a_verifiable_signature() {
  setup_tracing();
  let txn_ref = gateway::new_txn_ref(Uuid::new_v4());
  let request = PaymentRequest {
    merchant_code: "DEMOTMN1",
    amount_cents: 250_000,
    txn_ref: &txn_ref,
    order_info: "Order test".to_string(),
    client_ip: "203.0.113.7".to_string(),
    return_url: "http://localhost:8080/api/v1/payment/return",
    created_at: chrono::Utc::now(),
  };
  let url = gateway::build_payment_url("https://gateway.example/pay", TEST_SECRET, &request);

  let (base, query) = url.split_once('?').expect("URL has a query string");
  assert_eq!(base, "https://gateway.example/pay");

  // Parse the query back the way the gateway would and re-verify.
  let params: BTreeMap<String, String> = form_urlencoded::parse(query.as_bytes())
    .map(|(k, v)| (k.into_owned(), v.into_owned()))
    .collect();
  assert!(gateway::verify_signature(&params, TEST_SECRET));
  assert_eq!(params.get("vnp_Amount").map(String::as_str), Some("250000"));
  assert_eq!(params.get("vnp_TxnRef").map(String::as_str), Some(txn_ref.as_str()));
  assert_eq!(params.get("vnp_Command").map(String::as_str), Some("pay"));
}

#[test]
fn txn_refs_are_unique_per_attempt() {
  let order_id = Uuid::new_v4();
  let first = gateway::new_txn_ref(order_id);
  let second = gateway::new_txn_ref(order_id);
  assert!(first.starts_with("OD"));
  assert_ne!(first, second, "two checkout attempts must never share a reference");
}

#[test]
fn callback_helpers_read_the_expected_fields() {
  let params = callback_params("OD1234-1-abcd", 15_000, "00");
  assert_eq!(gateway::callback_amount(&params), Some(15_000));
  assert_eq!(gateway::callback_txn_ref(&params), Some("OD1234-1-abcd"));
  assert!(gateway::is_success_code(&params));

  let failed = callback_params("OD1234-1-abcd", 15_000, "24");
  assert!(!gateway::is_success_code(&failed));

  let mut garbled = params.clone();
  garbled.insert("vnp_Amount".to_string(), "lots".to_string());
  assert_eq!(gateway::callback_amount(&garbled), None);
}
