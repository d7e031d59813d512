use actix_web::{HttpResponse, web};
use sqlx::MySqlPool;
use tracing::error;

use crate::error::ApiError;
use crate::model::user::{User, UserRow};

fn to_user(row: UserRow) -> Result<User, ApiError> {
    let id = row.id;
    User::try_from(row).map_err(|e| {
        error!(error = %e, user_id = id, "Unreadable user row");
        ApiError::Internal("Failed to fetch users from database".into())
    })
}

/// All users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Every registered user", body = [User]),
        (status = 500, description = "Failed to fetch users from database")
    ),
    tag = "User"
)]
pub async fn list_users(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, employee_id, name, email, role, base_salary, created_at
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch users");
        ApiError::Internal("Failed to fetch users from database".into())
    })?;

    let users = rows
        .into_iter()
        .map(to_user)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HttpResponse::Ok().json(users))
}
