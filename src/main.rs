// src/main.rs

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  foodcourt::run().await
}
