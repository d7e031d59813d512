use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::error::{ApiError, IntegrityViolation, integrity_violation};
use crate::model::task::{Task, TaskRow, TaskStatus};

const TASK_SELECT: &str = r#"
    SELECT
        t.id,
        t.title,
        t.description,
        t.status,
        t.assignee_id,
        t.created_at,
        u.name AS assignee_name,
        u.employee_id AS assignee_employee_id
    FROM tasks t
    JOIN users u ON u.id = t.assignee_id
"#;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    #[schema(example = "Prepare monthly report")]
    pub title: String,
    #[schema(example = "Quick task from dashboard")]
    pub description: Option<String>,
    #[schema(example = 1)]
    pub assignee_id: u64,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateTaskStatus {
    pub status: TaskStatus,
}

fn to_task(row: TaskRow) -> Result<Task, ApiError> {
    let id = row.id;
    Task::try_from(row).map_err(|e| {
        error!(error = %e, task_id = id, "Unreadable task row");
        ApiError::Internal("Failed to read task".into())
    })
}

async fn fetch_task(pool: &MySqlPool, task_id: u64) -> Result<Option<Task>, ApiError> {
    let sql = format!("{} WHERE t.id = ?", TASK_SELECT);

    let row = sqlx::query_as::<_, TaskRow>(&sql)
        .bind(task_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            error!(error = %e, task_id, "Failed to fetch task");
            ApiError::Internal("Failed to fetch task".into())
        })?;

    row.map(to_task).transpose()
}

/// All tasks, newest first
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "Task board", body = [Task]),
        (status = 500, description = "Failed to fetch tasks")
    ),
    tag = "Task"
)]
pub async fn list_tasks(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let sql = format!("{} ORDER BY t.created_at DESC, t.id DESC", TASK_SELECT);

    let rows = sqlx::query_as::<_, TaskRow>(&sql)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch tasks");
            ApiError::Internal("Failed to fetch tasks".into())
        })?;

    let tasks = rows
        .into_iter()
        .map(to_task)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Create a task
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Title missing", body = Object, example = json!({
            "error": "Task title must not be empty"
        })),
        (status = 404, description = "Assignee not found"),
        (status = 500, description = "Failed to create task")
    ),
    tag = "Task"
)]
pub async fn create_task(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateTask>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    let title = payload.title.trim();

    if title.is_empty() {
        return Err(ApiError::BadRequest("Task title must not be empty".into()));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO tasks (title, description, status, assignee_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(title)
    .bind(payload.description.as_deref())
    .bind(TaskStatus::default().to_string())
    .bind(payload.assignee_id)
    .execute(pool.get_ref())
    .await;

    let task_id = match result {
        Ok(done) => done.last_insert_id(),
        Err(e) if integrity_violation(&e) == Some(IntegrityViolation::MissingReference) => {
            return Err(ApiError::NotFound("Assignee not found".into()));
        }
        Err(e) => {
            error!(error = %e, assignee_id = payload.assignee_id, "Failed to create task");
            return Err(ApiError::Internal("Failed to create task".into()));
        }
    };

    info!(task_id, assignee_id = payload.assignee_id, "Task created");

    let task = fetch_task(pool.get_ref(), task_id)
        .await?
        .ok_or_else(|| ApiError::Internal("Failed to create task".into()))?;

    Ok(HttpResponse::Created().json(task))
}

/// Move a task to another column of the board
#[utoipa::path(
    patch,
    path = "/api/tasks/{task_id}/status",
    params(
        ("task_id" = u64, Path, description = "Task to update")
    ),
    request_body = UpdateTaskStatus,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Task not found", body = Object, example = json!({
            "error": "Task not found"
        })),
        (status = 500, description = "Failed to update")
    ),
    tag = "Task"
)]
pub async fn update_task_status(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateTaskStatus>,
) -> Result<HttpResponse, ApiError> {
    let task_id = path.into_inner();
    let status = payload.status;

    sqlx::query("UPDATE tasks SET status = ? WHERE id = ?")
        .bind(status.to_string())
        .bind(task_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, task_id, "Failed to update task status");
            ApiError::Internal("Failed to update".into())
        })?;

    // rows_affected is 0 for an unchanged status too, so existence is checked by reading back
    let task = fetch_task(pool.get_ref(), task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}
