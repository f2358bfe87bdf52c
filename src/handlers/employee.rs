use actix_web::{web, HttpResponse};
use log::info;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::db::EmployeeFilter;
use crate::errors::AppError;
use crate::models::employee::EmployeePayload;

#[derive(Deserialize)]
pub struct SearchParams {
    department: Option<String>,
    position: Option<String>,
}

impl SearchParams {
    /// Blank terms count as absent.
    fn into_filter(self) -> Option<EmployeeFilter> {
        let clean = |term: Option<String>| {
            term.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
        };
        let filter = EmployeeFilter {
            department: clean(self.department),
            position: clean(self.position),
        };
        if filter.department.is_none() && filter.position.is_none() {
            None
        } else {
            Some(filter)
        }
    }
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid employee id".to_string()))
}

fn not_found() -> AppError {
    AppError::NotFound("Employee not found".to_string())
}

pub async fn get_employees(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let employees = state.employees.list().await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn search_employees(
    state: web::Data<AppState>,
    query: web::Query<SearchParams>,
) -> Result<HttpResponse, AppError> {
    let filter = query
        .into_inner()
        .into_filter()
        .ok_or_else(|| AppError::BadRequest("No search criteria provided".to_string()))?;

    let employees = state.employees.search(&filter).await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn get_employee(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&id)?;
    let employee = state.employees.find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn create_employee(
    state: web::Data<AppState>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, AppError> {
    let new_employee = payload.into_inner().into_new()?;
    let employee_id = state.employees.insert(new_employee).await?;

    info!("Employee {} created", employee_id);
    Ok(HttpResponse::Created().json(json!({
        "message": "Employee created successfully.",
        "employee_id": employee_id,
    })))
}

/// Supplied fields go through the same validators as create; absent ones keep
/// their stored values.
pub async fn update_employee(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&id)?;
    let changes = payload.into_inner().into_changes()?;
    if changes.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    if !state.employees.update(id, &changes).await? {
        return Err(not_found());
    }

    info!("Employee {} updated", id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee details updated successfully.",
    })))
}

pub async fn delete_employee(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&id)?;
    if !state.employees.delete(id).await? {
        return Err(not_found());
    }

    info!("Employee {} deleted", id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully.",
    })))
}
