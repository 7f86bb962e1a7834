// src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{
  admin_handlers, auth_handlers, cart_handlers, checkout_handlers, notification_handlers, order_handlers,
  owner_handlers, payment_handlers, restaurant_handlers,
};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// This function is called in `lib.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Authentication Routes
      .service(
        web::scope("/auth")
          .route("/register", web::post().to(auth_handlers::register_handler))
          .route("/login", web::post().to(auth_handlers::login_handler)),
      )
      // Browsing Routes
      .service(
        web::scope("/restaurants")
          .route("", web::get().to(restaurant_handlers::list_restaurants_handler))
          .route("/{restaurant_id}", web::get().to(restaurant_handlers::get_restaurant_handler))
          .route(
            "/{restaurant_id}/menu",
            web::get().to(restaurant_handlers::restaurant_menu_handler),
          ),
      )
      // Cart Routes
      .service(
        web::scope("/cart")
          .route("/items/{item_id}", web::put().to(cart_handlers::update_cart_item_handler))
          .route(
            "/items/{item_id}",
            web::delete().to(cart_handlers::remove_cart_item_handler),
          )
          .route("/{restaurant_id}", web::get().to(cart_handlers::get_cart_handler))
          .route(
            "/{restaurant_id}/items",
            web::post().to(cart_handlers::add_cart_item_handler),
          ),
      )
      // Checkout Route
      .service(web::scope("/checkout").route(
        "/{restaurant_id}",
        web::post().to(checkout_handlers::start_checkout_handler),
      ))
      // Payment Gateway Callback Routes (return = user-facing, ipn = server-to-server)
      .service(
        web::scope("/payment")
          .route("/return", web::get().to(payment_handlers::payment_return_handler))
          .route("/ipn", web::get().to(payment_handlers::payment_ipn_handler)),
      )
      // Customer Order Routes
      .service(
        web::scope("/orders")
          .route("", web::get().to(order_handlers::list_my_orders_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_order_handler))
          .route("/{order_id}/cancel", web::post().to(order_handlers::cancel_order_handler))
          .route("/{order_id}/rate", web::post().to(order_handlers::rate_order_handler)),
      )
      // Owner Routes
      .service(
        web::scope("/owner")
          .route("/orders", web::get().to(owner_handlers::owner_orders_handler))
          .route(
            "/orders/{order_id}/approve",
            web::post().to(owner_handlers::approve_order_handler),
          )
          .route(
            "/orders/{order_id}/cancel",
            web::post().to(owner_handlers::owner_cancel_order_handler),
          ),
      )
      // Admin Routes
      .service(
        web::scope("/admin")
          .route("/orders", web::get().to(admin_handlers::admin_orders_handler))
          .route(
            "/orders/{order_id}/complete",
            web::post().to(admin_handlers::complete_order_handler),
          )
          .route("/waiting-time", web::put().to(admin_handlers::set_waiting_time_handler)),
      )
      // Notification Routes
      .service(
        web::scope("/notifications")
          .route("/feed", web::get().to(notification_handlers::feed_handler))
          .route("/read", web::post().to(notification_handlers::mark_read_handler))
          .route("/read-all", web::post().to(notification_handlers::mark_all_read_handler))
          .route(
            "/{notification_id}/read",
            web::post().to(notification_handlers::mark_read_one_handler),
          ),
      ),
  );
}
