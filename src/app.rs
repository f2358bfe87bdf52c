use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, Resource};

use crate::db::{EmployeeRepository, UserRepository};
use crate::errors::AppError;
use crate::handlers;
use crate::utils::password::PasswordHashing;

/// Process-wide state shared by every worker. Built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub hashing: PasswordHashing,
}

/// Method, path, status and latency for every inbound request.
pub fn request_logger() -> Logger {
    Logger::new("Incoming request: %r -> %s (%Dms)")
}

/// Only the configured front-end origin may call the API from a browser.
pub fn cors(frontend_url: &str) -> Cors {
    Cors::default()
        .allowed_origin(frontend_url)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600)
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid JSON body: {err}")).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid query string: {err}")).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid path: {err}")).into())
}

/// A resource whose unsupported methods get the same plain-text 404 as
/// unknown paths, instead of an empty 405.
fn resource(path: &str) -> Resource {
    web::resource(path).default_service(web::to(handlers::not_found))
}

/// Mounts every route. `/search` is registered ahead of `/{id}` so the literal
/// segment is never parsed as an identifier.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(resource("/").route(web::get().to(handlers::index)))
        .service(
            web::scope("/api/auth")
                .service(resource("/signup").route(web::post().to(handlers::auth::signup)))
                .service(resource("/login").route(web::post().to(handlers::auth::login))),
        )
        .service(
            web::scope("/api/employees")
                .service(
                    resource("")
                        .route(web::get().to(handlers::employee::get_employees))
                        .route(web::post().to(handlers::employee::create_employee)),
                )
                .service(
                    resource("/search")
                        .route(web::get().to(handlers::employee::search_employees)),
                )
                .service(
                    resource("/{id}")
                        .route(web::get().to(handlers::employee::get_employee))
                        .route(web::put().to(handlers::employee::update_employee))
                        .route(web::delete().to(handlers::employee::delete_employee)),
                ),
        )
        .default_service(web::to(handlers::not_found));
}
