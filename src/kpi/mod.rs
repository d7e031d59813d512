//! Monthly KPI scoring over attendance records.

pub mod policy;
pub mod scorer;

pub use policy::{KpiPolicy, PENDING_RULES};
pub use scorer::{compute_kpi, KpiResult};
