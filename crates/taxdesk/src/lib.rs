pub mod config;
pub mod error;
pub mod pricing;
pub mod reports;
pub mod telemetry;
