pub mod dashboard;
pub mod session_report;
