use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenceStatus {
    Present,
    Absent,
}

/// Qualifies an `ABSENT` day.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AbsenceInfo {
    Uninformed,
    Granted,
    Informed,
}

/// Qualifies a `PRESENT` day.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LateStatus {
    Timely,
    LateAuto,
    LateUninformed,
}

impl LateStatus {
    /// Late arrivals nobody was told about ahead of time.
    pub fn is_uninformed_late(self) -> bool {
        matches!(self, LateStatus::LateAuto | LateStatus::LateUninformed)
    }
}

/// Raw `attendance` row; enum columns are stored as their upper snake case names.
#[derive(Debug, sqlx::FromRow)]
pub struct AttendanceRow {
    pub id: u64,
    pub user_id: u64,
    pub record_date: NaiveDate,
    pub entry_time: Option<DateTime<Utc>>,
    pub presence_status: String,
    pub absence_info: Option<String>,
    pub late_status: String,
}

/// One user's attendance for one office day.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 42,
    "userId": 7,
    "recordDate": "2024-03-02",
    "entryTime": "2024-03-02T05:40:00Z",
    "presenceStatus": "PRESENT",
    "absenceInfo": null,
    "lateStatus": "LATE_AUTO"
}))]
pub struct AttendanceRecord {
    pub id: u64,
    pub user_id: u64,
    #[schema(value_type = String, format = "date")]
    pub record_date: NaiveDate,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub entry_time: Option<DateTime<Utc>>,
    pub presence_status: PresenceStatus,
    pub absence_info: Option<AbsenceInfo>,
    pub late_status: LateStatus,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = strum::ParseError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            record_date: row.record_date,
            entry_time: row.entry_time,
            presence_status: row.presence_status.parse()?,
            // unrecognised values count as "unset" when scoring
            absence_info: row.absence_info.and_then(|s| s.parse().ok()),
            late_status: row.late_status.parse()?,
        })
    }
}
