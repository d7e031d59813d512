use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::model::attendance::LateStatus;
use crate::utils::office_day::day_boundary;

/// Starting (and maximum) score of every KPI.
pub const KPI_BASELINE: f64 = 10.0;
pub const KPI_FLOOR: f64 = 0.0;

pub const UNINFORMED_ABSENCE_PENALTY: f64 = 2.0;
pub const GRANTED_ABSENCE_PENALTY: f64 = 0.0;
/// Informed absences and absences with no recorded reason.
pub const OTHER_ABSENCE_PENALTY: f64 = 1.0;

/// Office opens this long after the stored UTC-midnight day boundary
/// (05:00 UTC, i.e. 11:00 in the office).
pub const OFFICE_OPEN_OFFSET_HOURS: i64 = 5;
pub const LATE_BLOCK_MINUTES: i64 = 30;
pub const LATE_BLOCK_PENALTY: f64 = 0.25;

/// Scoring rules not implemented yet; reported alongside every score.
pub const PENDING_RULES: [&str; 4] = [
    "KPI2: Informed late with promiseTime - needs late approval system",
    "KPI2: Granted late tracking - needs admin approval UI",
    "KPI2: Overtime bonus - needs check-out system",
    "KPI3-9 - future sprints",
];

/// Deduction rules for the attendance and timeliness scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiPolicy {
    pub baseline: f64,
    pub floor: f64,
    pub uninformed_absence_penalty: f64,
    pub granted_absence_penalty: f64,
    pub other_absence_penalty: f64,
    pub office_open_offset: Duration,
    pub late_block: Duration,
    pub late_block_penalty: f64,
}

impl Default for KpiPolicy {
    fn default() -> Self {
        Self {
            baseline: KPI_BASELINE,
            floor: KPI_FLOOR,
            uninformed_absence_penalty: UNINFORMED_ABSENCE_PENALTY,
            granted_absence_penalty: GRANTED_ABSENCE_PENALTY,
            other_absence_penalty: OTHER_ABSENCE_PENALTY,
            office_open_offset: Duration::hours(OFFICE_OPEN_OFFSET_HOURS),
            late_block: Duration::minutes(LATE_BLOCK_MINUTES),
            late_block_penalty: LATE_BLOCK_PENALTY,
        }
    }
}

impl KpiPolicy {
    /// Office-open instant for a stored attendance day.
    pub fn office_open(&self, record_date: NaiveDate) -> DateTime<Utc> {
        day_boundary(record_date) + self.office_open_offset
    }

    /// Whether an arrival at `entry` on `record_date` counts as late.
    pub fn is_late(&self, record_date: NaiveDate, entry: DateTime<Utc>) -> bool {
        entry > self.office_open(record_date)
    }

    /// Status recorded at check-in; arrivals after office open are flagged automatically.
    pub fn arrival_status(&self, record_date: NaiveDate, entry: DateTime<Utc>) -> LateStatus {
        if self.is_late(record_date, entry) {
            LateStatus::LateAuto
        } else {
            LateStatus::Timely
        }
    }

    /// Number of complete late blocks between office open and `entry`.
    pub fn late_blocks(&self, record_date: NaiveDate, entry: DateTime<Utc>) -> i64 {
        let late_ms = (entry - self.office_open(record_date))
            .num_milliseconds()
            .max(0);
        let block_ms = self.late_block.num_milliseconds();
        if block_ms <= 0 {
            return 0;
        }
        late_ms / block_ms
    }

    pub fn clamp(&self, score: f64) -> f64 {
        score.clamp(self.floor, self.baseline)
    }
}
