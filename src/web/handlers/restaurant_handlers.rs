// src/web/handlers/restaurant_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::restaurant_service;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ListRestaurantsQuery {
  pub search: Option<String>,
}

#[instrument(name = "handler::list_restaurants", skip(app_state, query))]
pub async fn list_restaurants_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListRestaurantsQuery>,
) -> Result<HttpResponse, AppError> {
  let restaurants = restaurant_service::list_restaurants(&app_state.db_pool, query.search.as_deref()).await?;
  Ok(HttpResponse::Ok().json(json!({ "restaurants": restaurants })))
}

#[instrument(name = "handler::get_restaurant", skip(app_state, path), fields(restaurant_id = %path.as_ref()))]
pub async fn get_restaurant_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let restaurant = restaurant_service::get_restaurant(&app_state.db_pool, path.into_inner()).await?;
  let is_open = restaurant.is_open_at(Local::now().time());
  Ok(HttpResponse::Ok().json(json!({
      "restaurant": restaurant,
      "isOpen": is_open,
  })))
}

#[instrument(name = "handler::restaurant_menu", skip(app_state, path), fields(restaurant_id = %path.as_ref()))]
pub async fn restaurant_menu_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let restaurant_id = path.into_inner();
  // 404 for unknown restaurants rather than an empty menu.
  restaurant_service::get_restaurant(&app_state.db_pool, restaurant_id).await?;
  let dishes = restaurant_service::available_menu(&app_state.db_pool, restaurant_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "dishes": dishes })))
}
