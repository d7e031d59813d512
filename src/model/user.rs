use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::role::Role;

/// Raw `users` row without the password hash.
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: u64,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub base_salary: f64,
    pub created_at: DateTime<Utc>,
}

/// A staff member.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 1,
    "employeeId": "ALM-014",
    "name": "Jane Doe",
    "email": "jane.doe@company.com",
    "role": "EMPLOYEE",
    "baseSalary": 0.0,
    "createdAt": "2024-01-01T00:00:00Z"
}))]
pub struct User {
    pub id: u64,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub base_salary: f64,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = strum::ParseError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            employee_id: row.employee_id,
            name: row.name,
            email: row.email,
            role: row.role.parse()?,
            base_salary: row.base_salary,
            created_at: row.created_at,
        })
    }
}
