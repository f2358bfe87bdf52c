use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{EmployeeFilter, EmployeeRepository, StoreError, UserRepository};
use crate::models::employee::{Employee, EmployeeChanges, NewEmployee};
use crate::models::user::{NewUser, User};

const EMPLOYEE_COLUMNS: &str =
    "id, first_name, last_name, email, position, department, salary, date_of_joining";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: NewUser) -> Result<Uuid, StoreError> {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (username, email, password) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Duplicate("Email already exists.".to_string())
            }
            other => StoreError::Backend(other),
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[derive(Clone)]
pub struct PgEmployeeRepository {
    pool: PgPool,
}

impl PgEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `%term%` with LIKE metacharacters escaped, so the term matches literally.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl EmployeeRepository for PgEmployeeRepository {
    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        let employees =
            sqlx::query_as::<_, Employee>(&format!("SELECT {EMPLOYEE_COLUMNS} FROM employees"))
                .fetch_all(&self.pool)
                .await?;
        Ok(employees)
    }

    async fn search(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, StoreError> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees \
             WHERE ($1::text IS NULL OR department ILIKE $1) \
             AND ($2::text IS NULL OR position ILIKE $2)"
        );
        let employees = sqlx::query_as::<_, Employee>(&sql)
            .bind(filter.department.as_deref().map(contains_pattern))
            .bind(filter.position.as_deref().map(contains_pattern))
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn insert(&self, employee: NewEmployee) -> Result<Uuid, StoreError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO employees \
             (first_name, last_name, email, position, department, salary, date_of_joining) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(employee.salary)
        .bind(employee.date_of_joining)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(&self, id: Uuid, changes: &EmployeeChanges) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE employees SET \
             first_name = COALESCE($2, first_name), \
             last_name = COALESCE($3, last_name), \
             email = COALESCE($4, email), \
             position = COALESCE($5, position), \
             department = COALESCE($6, department), \
             salary = COALESCE($7, salary), \
             date_of_joining = COALESCE($8, date_of_joining) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(changes.first_name.as_deref())
        .bind(changes.last_name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.position.as_deref())
        .bind(changes.department.as_deref())
        .bind(changes.salary)
        .bind(changes.date_of_joining)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
