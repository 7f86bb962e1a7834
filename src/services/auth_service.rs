// src/services/auth_service.rs

//! Password hashing and user lookup. Session/cookie management is not this
//! service's job; request identity arrives through the `AuthenticatedUser`
//! extractor and is resolved to a [`User`] here.

use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{Role, User};

/// Hashes a plain-text password using Argon2 with a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| {
      error!(error = %e, "Argon2 password hashing failed.");
      AppError::Internal(format!("Password hashing process failed: {}", e))
    })
}

/// Verifies a plain-text password against a stored Argon2 hash.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool> {
  let parsed = PasswordHash::new(stored_hash).map_err(|e| {
    error!(error = %e, "Failed to parse stored password hash.");
    AppError::Internal(format!("Invalid stored password hash format: {}", e))
  })?;
  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: passwords do not match.");
      Ok(false)
    }
    Err(e) => Err(AppError::Internal(format!("Password verification process failed: {}", e))),
  }
}

#[instrument(name = "auth_service::register_user", skip(pool, password), fields(%email))]
pub async fn register_user(
  pool: &PgPool,
  name: &str,
  email: &str,
  phone: Option<&str>,
  password: &str,
  role: Role,
) -> Result<User> {
  if role == Role::Admin {
    return Err(AppError::Forbidden("Admin accounts cannot be self-registered.".to_string()));
  }
  let password_hash = hash_password(password)?;

  let inserted = sqlx::query_as::<_, User>(
    "INSERT INTO users (name, email, password_hash, phone, role) \
     VALUES ($1, $2, $3, $4, $5) \
     RETURNING id, name, email, password_hash, phone, role, created_at",
  )
  .bind(name)
  .bind(email)
  .bind(&password_hash)
  .bind(phone)
  .bind(role)
  .fetch_one(pool)
  .await;

  match inserted {
    Ok(user) => Ok(user),
    Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
      Err(AppError::Validation(format!("Email '{}' is already registered.", email)))
    }
    Err(e) => Err(AppError::Sqlx(e)),
  }
}

#[instrument(name = "auth_service::login", skip(pool, password), fields(%email))]
pub async fn login(pool: &PgPool, email: &str, password: &str) -> Result<User> {
  let user: Option<User> =
    sqlx::query_as("SELECT id, name, email, password_hash, phone, role, created_at FROM users WHERE email = $1")
      .bind(email)
      .fetch_optional(pool)
      .await?;

  let Some(user) = user else {
    return Err(AppError::Auth("Invalid email or password.".to_string()));
  };
  if !verify_password(&user.password_hash, password)? {
    return Err(AppError::Auth("Invalid email or password.".to_string()));
  }
  Ok(user)
}

pub async fn fetch_user(pool: &PgPool, user_id: Uuid) -> Result<User> {
  sqlx::query_as("SELECT id, name, email, password_hash, phone, role, created_at FROM users WHERE id = $1")
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::Auth(format!("Unknown user {}.", user_id)))
}

/// Loads the user and checks their role, the guard in front of every
/// role-restricted handler.
pub async fn require_role(pool: &PgPool, user_id: Uuid, role: Role) -> Result<User> {
  let user = fetch_user(pool, user_id).await?;
  if user.role != role {
    return Err(AppError::Forbidden(format!("This action requires the {:?} role.", role)));
  }
  Ok(user)
}
