use actix_web::{HttpResponse, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{FromRow, MySqlPool};
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use crate::error::{ApiError, IntegrityViolation, integrity_violation};
use crate::kpi::KpiPolicy;
use crate::model::attendance::{AttendanceRecord, AttendanceRow, PresenceStatus};
use crate::utils::office_day::{normalize_to_office_day, office_today};

const ATTENDANCE_COLUMNS: &str =
    "id, user_id, record_date, entry_time, presence_status, absence_info, late_status";

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    #[schema(example = 7)]
    pub user_id: u64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStatusResponse {
    pub checked_in: bool,
    pub data: Option<AttendanceRecord>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceUser {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "ALM-014")]
    pub employee_id: String,
    #[schema(example = "jane.doe@company.com")]
    pub email: String,
}

#[derive(Serialize, ToSchema)]
pub struct TodayAttendanceRecord {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub user: AttendanceUser,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodayAttendanceResponse {
    #[schema(example = "2024-03-02")]
    pub date: String,
    #[schema(example = 1)]
    pub total_present: usize,
    pub records: Vec<TodayAttendanceRecord>,
}

#[derive(FromRow)]
struct TodayRow {
    #[sqlx(flatten)]
    attendance: AttendanceRow,
    user_name: String,
    user_employee_id: String,
    user_email: String,
}

fn to_record(row: AttendanceRow) -> Result<AttendanceRecord, ApiError> {
    let id = row.id;
    AttendanceRecord::try_from(row).map_err(|e| {
        error!(error = %e, attendance_id = id, "Unreadable attendance row");
        ApiError::Internal("Failed to read attendance".into())
    })
}

pub(crate) async fn user_exists(pool: &MySqlPool, user_id: u64) -> Result<bool, ApiError> {
    sqlx::query_scalar::<_, u64>("SELECT id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map(|id| id.is_some())
        .map_err(|e| {
            error!(error = %e, user_id, "Failed to look up user");
            ApiError::Internal("Failed to look up user".into())
        })
}

pub(crate) async fn fetch_record_for_day(
    pool: &MySqlPool,
    user_id: u64,
    day: NaiveDate,
) -> Result<Option<AttendanceRecord>, ApiError> {
    let sql = format!(
        "SELECT {} FROM attendance WHERE user_id = ? AND record_date = ?",
        ATTENDANCE_COLUMNS
    );

    let row = sqlx::query_as::<_, AttendanceRow>(&sql)
        .bind(user_id)
        .bind(day)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            error!(error = %e, user_id, %day, "Failed to fetch attendance");
            ApiError::Internal("Failed to fetch status".into())
        })?;

    row.map(to_record).transpose()
}

/// Records for `user_id` with `record_date` in `[start, end)`.
pub(crate) async fn fetch_records_between(
    pool: &MySqlPool,
    user_id: u64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<AttendanceRecord>, ApiError> {
    let sql = format!(
        r#"
        SELECT {}
        FROM attendance
        WHERE user_id = ?
        AND record_date >= ?
        AND record_date < ?
        ORDER BY record_date
        "#,
        ATTENDANCE_COLUMNS
    );

    let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            error!(error = %e, user_id, %start, %end, "Failed to fetch attendance range");
            ApiError::Internal("Failed to fetch attendance".into())
        })?;

    rows.into_iter().map(to_record).collect()
}

/// Writes the office-day row for a check-in happening at `now`.
async fn insert_check_in(
    pool: &MySqlPool,
    user_id: u64,
    now: DateTime<Utc>,
) -> Result<AttendanceRecord, ApiError> {
    let day = normalize_to_office_day(now);
    let late_status = KpiPolicy::default().arrival_status(day, now);

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (user_id, record_date, entry_time, presence_status, late_status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(day)
    .bind(now)
    .bind(PresenceStatus::Present.to_string())
    .bind(late_status.to_string())
    .execute(pool)
    .await;

    match result {
        Ok(done) => {
            info!(user_id, %day, late_status = %late_status, "Checked in");
            Ok(AttendanceRecord {
                id: done.last_insert_id(),
                user_id,
                record_date: day,
                entry_time: Some(now),
                presence_status: PresenceStatus::Present,
                absence_info: None,
                late_status,
            })
        }
        Err(e) => match integrity_violation(&e) {
            Some(IntegrityViolation::DuplicateKey) => {
                Err(ApiError::Conflict("Already checked in today".into()))
            }
            Some(IntegrityViolation::MissingReference) => {
                Err(ApiError::NotFound("User not found".into()))
            }
            None => {
                error!(error = %e, user_id, "Check-in failed");
                Err(ApiError::Internal("Failed to check in".into()))
            }
        },
    }
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body = CheckInRequest,
    responses(
        (status = 201, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully",
            "data": {
                "id": 42,
                "userId": 7,
                "recordDate": "2024-03-02",
                "entryTime": "2024-03-02T03:55:00Z",
                "presenceStatus": "PRESENT",
                "absenceInfo": null,
                "lateStatus": "TIMELY"
            }
        })),
        (status = 404, description = "User not found"),
        (status = 409, description = "Already checked in today", body = Object, example = json!({
            "error": "Already checked in today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
#[instrument(name = "attendance_check_in", skip(pool, payload), fields(user_id = payload.user_id))]
pub async fn check_in(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CheckInRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = payload.user_id;

    if !user_exists(pool.get_ref(), user_id).await? {
        return Err(ApiError::NotFound("User not found".into()));
    }

    let record = insert_check_in(pool.get_ref(), user_id, Utc::now()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Checked in successfully",
        "data": record
    })))
}

/// Today's attendance status for one user
#[utoipa::path(
    get,
    path = "/api/attendance/status/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User to look up")
    ),
    responses(
        (status = 200, description = "Status for the current office day", body = AttendanceStatusResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn attendance_status(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let record = fetch_record_for_day(pool.get_ref(), user_id, office_today()).await?;

    Ok(HttpResponse::Ok().json(AttendanceStatusResponse {
        checked_in: record.is_some(),
        data: record,
    }))
}

/// Every attendance row for the current office day
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses(
        (status = 200, description = "Attendance for the current office day", body = TodayAttendanceResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn attendance_today(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let today = office_today();

    let rows = sqlx::query_as::<_, TodayRow>(
        r#"
        SELECT
            a.id,
            a.user_id,
            a.record_date,
            a.entry_time,
            a.presence_status,
            a.absence_info,
            a.late_status,
            u.name AS user_name,
            u.employee_id AS user_employee_id,
            u.email AS user_email
        FROM attendance a
        JOIN users u ON u.id = a.user_id
        WHERE a.record_date = ?
        ORDER BY a.entry_time
        "#,
    )
    .bind(today)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, %today, "Failed to fetch today's attendance");
        ApiError::Internal("Failed to fetch attendance".into())
    })?;

    let records = rows
        .into_iter()
        .map(|row| {
            Ok(TodayAttendanceRecord {
                record: to_record(row.attendance)?,
                user: AttendanceUser {
                    name: row.user_name,
                    employee_id: row.user_employee_id,
                    email: row.user_email,
                },
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(HttpResponse::Ok().json(TodayAttendanceResponse {
        date: today.format("%Y-%m-%d").to_string(),
        total_present: records.len(),
        records,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::LateStatus;

    #[test]
    fn today_record_flattens_attendance_fields() {
        let record = TodayAttendanceRecord {
            record: AttendanceRecord {
                id: 42,
                user_id: 7,
                record_date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                entry_time: None,
                presence_status: PresenceStatus::Present,
                absence_info: None,
                late_status: LateStatus::Timely,
            },
            user: AttendanceUser {
                name: "Jane Doe".into(),
                employee_id: "ALM-014".into(),
                email: "jane.doe@company.com".into(),
            },
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["recordDate"], "2024-03-02");
        assert_eq!(json["user"]["employeeId"], "ALM-014");
    }

    #[test]
    fn status_response_uses_checked_in_key() {
        let json = serde_json::to_value(AttendanceStatusResponse {
            checked_in: false,
            data: None,
        })
        .unwrap();
        assert_eq!(json, json!({ "checkedIn": false, "data": null }));
    }

    #[test]
    fn check_in_request_reads_camel_case() {
        let req: CheckInRequest = serde_json::from_str(r#"{"userId": 7}"#).unwrap();
        assert_eq!(req.user_id, 7);
    }
}
