pub mod evaluation;
pub mod models;
