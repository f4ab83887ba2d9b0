pub mod adapters;
pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod telemetry;
