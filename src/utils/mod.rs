pub mod office_day;
pub mod password;
