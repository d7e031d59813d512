use chrono::NaiveDate;
use serde::Serialize;

use super::policy::KpiPolicy;
use crate::model::attendance::{AbsenceInfo, AttendanceRecord, PresenceStatus};

/// Scores for one user over one month, plus the counts they were built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiResult {
    pub kpi1_attendance: f64,
    pub kpi2_timeliness: f64,
    pub total_days_logged: usize,
    pub absent_days: usize,
    pub uninformed_late_days: usize,
}

/// Scores `records` falling inside `[month_start, month_end)` with the default policy.
pub fn compute_kpi(
    records: &[AttendanceRecord],
    month_start: NaiveDate,
    month_end: NaiveDate,
) -> KpiResult {
    KpiPolicy::default().score(records, month_start, month_end)
}

impl KpiPolicy {
    pub fn score(
        &self,
        records: &[AttendanceRecord],
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> KpiResult {
        let in_month: Vec<&AttendanceRecord> = records
            .iter()
            .filter(|r| r.record_date >= month_start && r.record_date < month_end)
            .collect();

        let mut kpi1 = self.baseline;
        let mut absent_days = 0;
        for record in in_month
            .iter()
            .filter(|r| r.presence_status == PresenceStatus::Absent)
        {
            absent_days += 1;
            kpi1 -= self.absence_penalty(record.absence_info);
        }

        let mut kpi2 = self.baseline;
        let mut uninformed_late_days = 0;
        for record in in_month
            .iter()
            .filter(|r| r.late_status.is_uninformed_late())
        {
            uninformed_late_days += 1;
            if let Some(entry) = record.entry_time {
                let blocks = self.late_blocks(record.record_date, entry);
                kpi2 -= blocks as f64 * self.late_block_penalty;
            }
        }

        KpiResult {
            kpi1_attendance: self.clamp(kpi1),
            kpi2_timeliness: self.clamp(kpi2),
            total_days_logged: in_month.len(),
            absent_days,
            uninformed_late_days,
        }
    }

    fn absence_penalty(&self, info: Option<AbsenceInfo>) -> f64 {
        match info {
            Some(AbsenceInfo::Uninformed) => self.uninformed_absence_penalty,
            Some(AbsenceInfo::Granted) => self.granted_absence_penalty,
            Some(AbsenceInfo::Informed) | None => self.other_absence_penalty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::LateStatus;
    use crate::utils::office_day::month_bounds;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn march() -> (NaiveDate, NaiveDate) {
        month_bounds(2024, 3).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn open(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 5, 0, 0).unwrap()
    }

    fn absent(d: u32, info: Option<AbsenceInfo>) -> AttendanceRecord {
        AttendanceRecord {
            id: d as u64,
            user_id: 7,
            record_date: date(d),
            entry_time: None,
            presence_status: PresenceStatus::Absent,
            absence_info: info,
            late_status: LateStatus::Timely,
        }
    }

    fn present(d: u32, late: LateStatus, entry: Option<DateTime<Utc>>) -> AttendanceRecord {
        AttendanceRecord {
            id: 100 + d as u64,
            user_id: 7,
            record_date: date(d),
            entry_time: entry,
            presence_status: PresenceStatus::Present,
            absence_info: None,
            late_status: late,
        }
    }

    fn score(records: &[AttendanceRecord]) -> KpiResult {
        let (start, end) = march();
        compute_kpi(records, start, end)
    }

    #[test]
    fn empty_month_keeps_baseline() {
        let result = score(&[]);
        assert_eq!(result.kpi1_attendance, 10.0);
        assert_eq!(result.kpi2_timeliness, 10.0);
        assert_eq!(result.total_days_logged, 0);
        assert_eq!(result.absent_days, 0);
        assert_eq!(result.uninformed_late_days, 0);
    }

    #[test]
    fn absence_penalties_follow_absence_info() {
        assert_eq!(score(&[absent(1, Some(AbsenceInfo::Uninformed))]).kpi1_attendance, 8.0);
        assert_eq!(score(&[absent(1, Some(AbsenceInfo::Granted))]).kpi1_attendance, 10.0);
        assert_eq!(score(&[absent(1, Some(AbsenceInfo::Informed))]).kpi1_attendance, 9.0);
        assert_eq!(score(&[absent(1, None)]).kpi1_attendance, 9.0);
    }

    #[test]
    fn granted_absence_still_counts_as_absent_day() {
        let result = score(&[absent(1, Some(AbsenceInfo::Granted)), absent(2, None)]);
        assert_eq!(result.absent_days, 2);
        assert_eq!(result.kpi1_attendance, 9.0);
    }

    #[test]
    fn attendance_score_never_drops_below_zero() {
        let records: Vec<_> = (1..=8)
            .map(|d| absent(d, Some(AbsenceInfo::Uninformed)))
            .collect();
        let result = score(&records);
        assert_eq!(result.kpi1_attendance, 0.0);
        assert_eq!(result.absent_days, 8);
    }

    #[test]
    fn forty_five_minutes_late_costs_one_block() {
        let entry = open(4) + Duration::minutes(45);
        let result = score(&[present(4, LateStatus::LateAuto, Some(entry))]);
        assert_eq!(result.kpi2_timeliness, 9.75);
        assert_eq!(result.uninformed_late_days, 1);
    }

    #[test]
    fn arrival_at_open_costs_nothing() {
        let result = score(&[present(4, LateStatus::LateAuto, Some(open(4)))]);
        assert_eq!(result.kpi2_timeliness, 10.0);
    }

    #[test]
    fn early_arrival_flagged_late_costs_nothing() {
        let entry = open(4) - Duration::hours(2);
        let result = score(&[present(4, LateStatus::LateUninformed, Some(entry))]);
        assert_eq!(result.kpi2_timeliness, 10.0);
    }

    #[test]
    fn missing_entry_time_is_skipped_but_counted() {
        let result = score(&[present(4, LateStatus::LateUninformed, None)]);
        assert_eq!(result.kpi2_timeliness, 10.0);
        assert_eq!(result.uninformed_late_days, 1);
    }

    #[test]
    fn timely_records_are_never_penalised() {
        let entry = open(4) + Duration::hours(3);
        let result = score(&[present(4, LateStatus::Timely, Some(entry))]);
        assert_eq!(result.kpi2_timeliness, 10.0);
        assert_eq!(result.uninformed_late_days, 0);
    }

    #[test]
    fn one_record_has_no_per_record_cap() {
        // 20 hours late: 40 blocks, 10 points, clamped at zero
        let entry = open(4) + Duration::hours(20);
        let result = score(&[present(4, LateStatus::LateAuto, Some(entry))]);
        assert_eq!(result.kpi2_timeliness, 0.0);

        // 3 hours late: 6 blocks
        let entry = open(5) + Duration::hours(3);
        let result = score(&[present(5, LateStatus::LateAuto, Some(entry))]);
        assert_eq!(result.kpi2_timeliness, 8.5);
    }

    #[test]
    fn records_outside_the_month_are_ignored() {
        let february = AttendanceRecord {
            record_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            ..absent(1, Some(AbsenceInfo::Uninformed))
        };
        let april = AttendanceRecord {
            record_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            ..absent(1, Some(AbsenceInfo::Uninformed))
        };
        let result = score(&[february, april, absent(31, None)]);
        assert_eq!(result.total_days_logged, 1);
        assert_eq!(result.kpi1_attendance, 9.0);
    }

    #[test]
    fn mixed_month_scores_both_kpis_independently_of_order() {
        let mut records = vec![
            absent(1, Some(AbsenceInfo::Uninformed)),
            absent(2, Some(AbsenceInfo::Informed)),
            absent(3, Some(AbsenceInfo::Granted)),
            present(4, LateStatus::LateAuto, Some(open(4) + Duration::minutes(95))),
            present(5, LateStatus::LateUninformed, Some(open(5) + Duration::minutes(30))),
            present(6, LateStatus::Timely, Some(open(6))),
        ];

        let forward = score(&records);
        assert_eq!(forward.kpi1_attendance, 7.0);
        assert_eq!(forward.kpi2_timeliness, 9.0);
        assert_eq!(forward.total_days_logged, 6);
        assert_eq!(forward.absent_days, 3);
        assert_eq!(forward.uninformed_late_days, 2);

        records.reverse();
        assert_eq!(score(&records), forward);
        records.swap(0, 3);
        assert_eq!(score(&records), forward);
    }

    #[test]
    fn scores_stay_in_range() {
        let mut records = Vec::new();
        for d in 1..=31 {
            records.push(if d % 2 == 0 {
                absent(d, Some(AbsenceInfo::Uninformed))
            } else {
                present(d, LateStatus::LateAuto, Some(open(d) + Duration::hours(d as i64)))
            });
        }
        let result = score(&records);
        assert!((0.0..=10.0).contains(&result.kpi1_attendance));
        assert!((0.0..=10.0).contains(&result.kpi2_timeliness));
    }
}
