pub mod attendance;
pub mod health;
pub mod kpi;
pub mod task;
pub mod user;
