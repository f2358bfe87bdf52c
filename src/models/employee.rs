use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::utils::validation::{collect, date_field, email_field, numeric_field, text_field};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub salary: f64,
    pub date_of_joining: NaiveDate,
}

/// A fully validated employee ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub salary: f64,
    pub date_of_joining: NaiveDate,
}

/// Validated partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
    pub date_of_joining: Option<NaiveDate>,
}

impl EmployeeChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Raw request body for both create and update. Fields stay untyped until
/// validation so that every violation can be reported at once instead of
/// failing on the first mistyped field. Unknown keys are ignored.
#[derive(Deserialize, Debug, Default)]
pub struct EmployeePayload {
    pub first_name: Option<Value>,
    pub last_name: Option<Value>,
    pub email: Option<Value>,
    pub position: Option<Value>,
    pub department: Option<Value>,
    pub salary: Option<Value>,
    pub date_of_joining: Option<Value>,
}

impl EmployeePayload {
    fn check(&self, required: bool) -> Result<EmployeeChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let changes = EmployeeChanges {
            first_name: collect(&mut errors, "first_name", self.first_name.as_ref(), required, text_field),
            last_name: collect(&mut errors, "last_name", self.last_name.as_ref(), required, text_field),
            email: collect(&mut errors, "email", self.email.as_ref(), required, email_field),
            position: collect(&mut errors, "position", self.position.as_ref(), required, text_field),
            department: collect(&mut errors, "department", self.department.as_ref(), required, text_field),
            salary: collect(&mut errors, "salary", self.salary.as_ref(), required, numeric_field),
            date_of_joining: collect(
                &mut errors,
                "date_of_joining",
                self.date_of_joining.as_ref(),
                required,
                date_field,
            ),
        };
        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(errors)
        }
    }

    /// Create path: every field must be present and well-formed.
    pub fn into_new(self) -> Result<NewEmployee, ValidationErrors> {
        let changes = self.check(true)?;
        match changes {
            EmployeeChanges {
                first_name: Some(first_name),
                last_name: Some(last_name),
                email: Some(email),
                position: Some(position),
                department: Some(department),
                salary: Some(salary),
                date_of_joining: Some(date_of_joining),
            } => Ok(NewEmployee {
                first_name,
                last_name,
                email,
                position,
                department,
                salary,
                date_of_joining,
            }),
            // check(true) already reported any absent field.
            _ => Err(ValidationErrors::new()),
        }
    }

    /// Update path: only the supplied fields are validated, with the same rules.
    pub fn into_changes(self) -> Result<EmployeeChanges, ValidationErrors> {
        self.check(false)
    }
}
