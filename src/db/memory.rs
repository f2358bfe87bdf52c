//! In-memory repositories used by handler tests. They follow the PostgreSQL
//! adapter's observable behaviour: generated ids, case-insensitive email
//! uniqueness and case-insensitive substring search.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EmployeeFilter, EmployeeRepository, StoreError, UserRepository};
use crate::models::employee::{Employee, EmployeeChanges, NewEmployee};
use crate::models::user::{NewUser, User};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
    inserts: AtomicUsize,
}

impl MemoryUserRepository {
    pub async fn all(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    /// Number of `insert` calls, successful or not.
    pub fn insert_attempts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<Uuid, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StoreError::Duplicate("Email already exists.".to_string()));
        }
        let id = Uuid::new_v4();
        users.push(User {
            id,
            username: user.username,
            email: user.email,
            password: user.password_hash,
        });
        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryEmployeeRepository {
    employees: RwLock<Vec<Employee>>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn apply(changes: &EmployeeChanges, employee: &mut Employee) {
    if let Some(v) = &changes.first_name {
        employee.first_name = v.clone();
    }
    if let Some(v) = &changes.last_name {
        employee.last_name = v.clone();
    }
    if let Some(v) = &changes.email {
        employee.email = v.clone();
    }
    if let Some(v) = &changes.position {
        employee.position = v.clone();
    }
    if let Some(v) = &changes.department {
        employee.department = v.clone();
    }
    if let Some(v) = changes.salary {
        employee.salary = v;
    }
    if let Some(v) = changes.date_of_joining {
        employee.date_of_joining = v;
    }
}

#[async_trait]
impl EmployeeRepository for MemoryEmployeeRepository {
    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(self.employees.read().await.clone())
    }

    async fn search(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, StoreError> {
        let matches = |field: &str, term: &Option<String>| {
            term.as_deref()
                .map_or(true, |term| contains_ignore_case(field, term))
        };
        Ok(self
            .employees
            .read()
            .await
            .iter()
            .filter(|e| matches(&e.department, &filter.department) && matches(&e.position, &filter.position))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, StoreError> {
        Ok(self.employees.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn insert(&self, employee: NewEmployee) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        self.employees.write().await.push(Employee {
            id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            position: employee.position,
            department: employee.department,
            salary: employee.salary,
            date_of_joining: employee.date_of_joining,
        });
        Ok(id)
    }

    async fn update(&self, id: Uuid, changes: &EmployeeChanges) -> Result<bool, StoreError> {
        let mut employees = self.employees.write().await;
        match employees.iter_mut().find(|e| e.id == id) {
            Some(employee) => {
                apply(changes, employee);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut employees = self.employees.write().await;
        let before = employees.len();
        employees.retain(|e| e.id != id);
        Ok(employees.len() < before)
    }
}
