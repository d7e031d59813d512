use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// New tasks start here; the dashboard offers "mark done" only for pending tasks.
    #[default]
    Pending,
    InProgress,
    Done,
}

/// `tasks` row joined with its assignee.
#[derive(Debug, sqlx::FromRow)]
pub struct TaskRow {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub assignee_id: u64,
    pub created_at: DateTime<Utc>,
    pub assignee_name: String,
    pub assignee_employee_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "ALM-014")]
    pub employee_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 3,
    "title": "Prepare monthly report",
    "description": "Quick task from dashboard",
    "status": "PENDING",
    "assigneeId": 1,
    "createdAt": "2024-03-02T05:00:00Z",
    "assignee": { "name": "Jane Doe", "employeeId": "ALM-014" }
}))]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub assignee_id: u64,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    pub assignee: Assignee,
}

impl TryFrom<TaskRow> for Task {
    type Error = strum::ParseError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status.parse()?,
            assignee_id: row.assignee_id,
            created_at: row.created_at,
            assignee: Assignee {
                name: row.assignee_name,
                employee_id: row.assignee_employee_id,
            },
        })
    }
}
