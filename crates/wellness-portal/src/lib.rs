pub mod care;
pub mod config;
pub mod error;
pub mod telemetry;
