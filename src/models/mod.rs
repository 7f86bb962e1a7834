// src/models/mod.rs

//! Contains data structures representing database entities.

pub mod cart;
pub mod dish;
pub mod notification;
pub mod order;
pub mod payment;
pub mod rating;
pub mod restaurant;
pub mod user;

// Re-export the model structs for convenient access
pub use cart::{Cart, CartItem, CartLine, CartStatus};
pub use dish::Dish;
pub use notification::Notification;
pub use order::{Order, OrderStatus};
pub use payment::{Payment, PaymentStatus, Refund, RefundStatus};
pub use rating::OrderRating;
pub use restaurant::{Restaurant, RestaurantStatus};
pub use user::{Role, User};
