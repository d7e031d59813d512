use actix_web::{HttpResponse, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::{debug, instrument};
use utoipa::{IntoParams, ToSchema};

use super::attendance::fetch_records_between;
use crate::error::ApiError;
use crate::kpi::{KpiResult, PENDING_RULES, compute_kpi};
use crate::utils::office_day::{month_bounds, office_year_month};

#[derive(Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct KpiQuery {
    /// Calendar year; defaults to the current office year
    #[schema(example = 2024)]
    pub year: Option<i32>,
    /// Month 1-12; defaults to the current office month
    #[schema(example = 3)]
    pub month: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "userId": 7,
    "month": 3,
    "year": 2024,
    "totalDaysLogged": 21,
    "absentDays": 1,
    "uninformedLateDays": 2,
    "kpi1Attendance": 8.0,
    "kpi2Timeliness": 9.75,
    "totalSoFar": 17.75,
    "pending": ["KPI3-9 - future sprints"]
}))]
pub struct KpiStatusResponse {
    pub user_id: u64,
    pub month: u32,
    pub year: i32,
    pub total_days_logged: usize,
    pub absent_days: usize,
    pub uninformed_late_days: usize,
    pub kpi1_attendance: f64,
    pub kpi2_timeliness: f64,
    pub total_so_far: f64,
    pub pending: Vec<String>,
}

impl KpiStatusResponse {
    fn new(user_id: u64, year: i32, month: u32, result: KpiResult) -> Self {
        Self {
            user_id,
            month,
            year,
            total_days_logged: result.total_days_logged,
            absent_days: result.absent_days,
            uninformed_late_days: result.uninformed_late_days,
            kpi1_attendance: result.kpi1_attendance,
            kpi2_timeliness: result.kpi2_timeliness,
            total_so_far: result.kpi1_attendance + result.kpi2_timeliness,
            pending: PENDING_RULES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Month selected by the query, falling back to the office month containing `now`.
fn resolve_month(
    query: &KpiQuery,
    now: DateTime<Utc>,
) -> Result<(i32, u32, NaiveDate, NaiveDate), ApiError> {
    let (current_year, current_month) = office_year_month(now);
    let year = query.year.unwrap_or(current_year);
    let month = query.month.unwrap_or(current_month);

    let (start, end) = month_bounds(year, month)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid month {}-{}", year, month)))?;

    Ok((year, month, start, end))
}

/// Monthly KPI scores for one user
#[utoipa::path(
    get,
    path = "/api/kpi/status/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User to score"),
        KpiQuery
    ),
    responses(
        (status = 200, description = "KPI scores for the month", body = KpiStatusResponse),
        (status = 400, description = "Invalid year or month", body = Object, example = json!({
            "error": "Invalid month 2024-13"
        })),
        (status = 500, description = "Failed to calculate KPI")
    ),
    tag = "KPI"
)]
#[instrument(name = "kpi_status", skip(pool, query))]
pub async fn kpi_status(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<KpiQuery>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let (year, month, start, end) = resolve_month(&query, Utc::now())?;

    let records = fetch_records_between(pool.get_ref(), user_id, start, end).await?;
    let result = compute_kpi(&records, start, end);

    debug!(
        user_id,
        year,
        month,
        kpi1 = result.kpi1_attendance,
        kpi2 = result.kpi2_timeliness,
        "KPI computed"
    );

    Ok(HttpResponse::Ok().json(KpiStatusResponse::new(user_id, year, month, result)))
}
