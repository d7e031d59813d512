use crate::api::attendance::{
    AttendanceStatusResponse, AttendanceUser, CheckInRequest, TodayAttendanceRecord,
    TodayAttendanceResponse,
};
use crate::api::kpi::{KpiQuery, KpiStatusResponse};
use crate::api::task::{CreateTask, UpdateTaskStatus};
use crate::model::attendance::{AbsenceInfo, AttendanceRecord, LateStatus, PresenceStatus};
use crate::model::role::Role;
use crate::model::task::{Assignee, Task, TaskStatus};
use crate::model::user::User;
use utoipa::OpenApi;
use utoipa::openapi;

/// Prefix the handler annotations are written against.
const DOCUMENTED_PREFIX: &str = "/api";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Office Portal API",
        version = "1.0.0",
        description = r#"
## Office Portal

Backend for the office dashboard: daily attendance check-in, monthly KPI
scores and a shared task board.

### Key Features
- **Attendance**
  - Check in once per office day (Asia/Dhaka, UTC+6)
  - Today's status per user and the whole office
- **KPI**
  - KPI-1 Attendance and KPI-2 Timeliness, each scored 0-10 per month
- **Tasks**
  - Create tasks, list the board, move tasks between statuses

### Response Format
- JSON, camelCase field names
- Errors are returned as `{ "error": "..." }`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::health::health,
        crate::api::user::list_users,

        crate::api::attendance::check_in,
        crate::api::attendance::attendance_status,
        crate::api::attendance::attendance_today,

        crate::api::kpi::kpi_status,

        crate::api::task::list_tasks,
        crate::api::task::create_task,
        crate::api::task::update_task_status
    ),
    components(
        schemas(
            User,
            Role,
            PresenceStatus,
            AbsenceInfo,
            LateStatus,
            AttendanceRecord,
            CheckInRequest,
            AttendanceStatusResponse,
            AttendanceUser,
            TodayAttendanceRecord,
            TodayAttendanceResponse,
            KpiQuery,
            KpiStatusResponse,
            TaskStatus,
            Assignee,
            Task,
            CreateTask,
            UpdateTaskStatus
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "User", description = "Staff directory"),
        (name = "Attendance", description = "Attendance check-in and daily status"),
        (name = "KPI", description = "Monthly KPI scoring"),
        (name = "Task", description = "Office task board"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// The OpenAPI document with every path moved under `api_prefix`.
    pub fn with_prefix(api_prefix: &str) -> openapi::OpenApi {
        let mut doc = Self::openapi();
        let prefix = api_prefix.trim_end_matches('/');

        let paths = std::mem::take(&mut doc.paths.paths);
        doc.paths.paths = paths
            .into_iter()
            .map(|(path, item)| {
                let rest = path.strip_prefix(DOCUMENTED_PREFIX).unwrap_or(&path);
                (format!("{}{}", prefix, rest), item)
            })
            .collect();

        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/health",
            "/api/users",
            "/api/attendance/check-in",
            "/api/attendance/status/{user_id}",
            "/api/attendance/today",
            "/api/kpi/status/{user_id}",
            "/api/tasks",
            "/api/tasks/{task_id}/status",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn paths_follow_configured_prefix() {
        let doc = ApiDoc::with_prefix("/office/v1/");
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/office/v1/health"));
        assert!(paths.contains_key("/office/v1/kpi/status/{user_id}"));
        assert!(paths.contains_key("/office/v1/tasks/{task_id}/status"));
        assert!(paths.keys().all(|p| p.starts_with("/office/v1/")));
        assert_eq!(paths.len(), ApiDoc::openapi().paths.paths.len());
    }

    #[test]
    fn default_prefix_leaves_paths_unchanged() {
        let doc = ApiDoc::with_prefix("/api");
        let original = ApiDoc::openapi();
        assert!(doc.paths.paths.keys().eq(original.paths.paths.keys()));
    }
}
