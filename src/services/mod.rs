// src/services/mod.rs

//! Business workflows over the shared relational store. Handlers stay thin;
//! each multi-step mutation here runs inside a request-scoped transaction.

pub mod auth_service;
pub mod cart_service;
pub mod checkout_service;
pub mod notification_service;
pub mod order_service;
pub mod rating_service;
pub mod restaurant_service;
