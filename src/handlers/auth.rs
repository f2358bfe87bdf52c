use actix_web::{web, HttpResponse};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::errors::AppError;
use crate::models::user::NewUser;
use crate::utils::validation::{validate_username, validate_payload};

// Missing fields deserialize as empty strings so they are reported alongside
// every other violation instead of failing JSON parsing.
#[derive(Deserialize, Serialize, Validate, Default)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(custom = "validate_username")]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Deserialize, Serialize, Validate, Default)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Serialize)]
pub struct SignupResponse {
    message: &'static str,
    user_id: Uuid,
}

#[derive(Serialize)]
pub struct LoginResponse {
    message: &'static str,
}

pub async fn signup(
    state: web::Data<AppState>,
    req: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    let mut req = req.into_inner();
    req.email = req.email.trim().to_string();
    validate_payload(&req)?;

    // Cheap early rejection; the unique index still settles concurrent signups.
    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists.".to_string()));
    }

    // Argon2 is deliberately slow; keep it off the async workers.
    let hashing = state.hashing.clone();
    let password = req.password;
    let password_hash = web::block(move || hashing.hash(&password)).await??;

    let user_id = state
        .users
        .insert(NewUser {
            username: req.username.trim().to_string(),
            email: req.email,
            password_hash,
        })
        .await?;

    info!("User {} signed up", user_id);
    Ok(HttpResponse::Created().json(SignupResponse {
        message: "User created successfully.",
        user_id,
    }))
}

/// Unknown email and wrong password produce the same response.
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    validate_payload(&req)?;

    let Some(user) = state.users.find_by_email(&req.email).await? else {
        debug!("Login rejected: no account for the supplied email");
        return Err(AppError::InvalidCredentials);
    };

    let hashing = state.hashing.clone();
    let password = req.password;
    let stored = user.password;
    let matches = web::block(move || hashing.verify(&password, &stored)).await?;
    if !matches {
        debug!("Login rejected: password mismatch for user {}", user.id);
        return Err(AppError::InvalidCredentials);
    }

    info!("User {} ({}) logged in", user.id, user.username);
    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful.",
    }))
}
