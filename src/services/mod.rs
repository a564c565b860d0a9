pub mod ai;
pub mod interviewer;
pub mod resume;
pub mod uploads;
pub mod vapi;
