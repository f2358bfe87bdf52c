//! Persistence ports for the two record stores and the PostgreSQL pool that
//! backs them in production.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use log::{error, info};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::models::employee::{Employee, EmployeeChanges, NewEmployee};
use crate::models::user::{NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate record: {0}")]
    Duplicate(String),
    #[error(transparent)]
    Backend(#[from] sqlx::Error),
}

/// Case-insensitive filters for employee search. At least one should be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub position: Option<String>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores the account and returns its generated id. Fails with
    /// [`StoreError::Duplicate`] when the email is already registered.
    async fn insert(&self, user: NewUser) -> Result<Uuid, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Employee>, StoreError>;

    /// Substring match on each supplied filter, ANDed together.
    async fn search(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, StoreError>;

    async fn insert(&self, employee: NewEmployee) -> Result<Uuid, StoreError>;

    /// Returns `false` when no employee has this id.
    async fn update(&self, id: Uuid, changes: &EmployeeChanges) -> Result<bool, StoreError>;

    /// Returns `false` when no employee has this id.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Builds the pool without connecting, so the server can start while the
/// database is down. Only a malformed connection string fails here.
pub fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_lazy(&config.database_url)
}

/// Applies the embedded migrations. Failure is logged and not fatal; requests
/// will surface store errors individually until the database is reachable.
pub async fn prepare(pool: &PgPool) {
    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => info!("Connected to the database; schema is up to date"),
        Err(err) => error!("Error connecting to the database: {}", err),
    }
}
