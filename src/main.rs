mod app;
mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod utils;

use std::io;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use crate::app::AppState;
use crate::config::Config;
use crate::db::postgres::{PgEmployeeRepository, PgUserRepository};
use crate::utils::password::PasswordHashing;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{context}: {err}"))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|err| startup_error("Invalid configuration", err))?;

    let hashing = PasswordHashing::new(config.hash_iterations, config.hash_memory_kib)
        .map_err(|err| startup_error("Invalid password hashing parameters", err))?;

    // The pool connects lazily; an unreachable database is logged by `prepare`
    // and surfaces later as per-request 500s.
    let pool = db::create_pool(&config)
        .map_err(|err| startup_error("Invalid DATABASE_URL", err))?;
    db::prepare(&pool).await;

    let state = web::Data::new(AppState {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        employees: Arc::new(PgEmployeeRepository::new(pool)),
        hashing,
    });

    let (host, port) = config.bind_address();
    let frontend_url = config.frontend_url.clone();
    info!("Server is running at http://{}:{}", host, port);
    info!("Accepting cross-origin requests from {}", frontend_url);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(app::cors(&frontend_url))
            .wrap(app::request_logger())
            .configure(app::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
