pub mod api;
pub mod breakdown;
pub mod clock;
pub mod config;
pub mod ml;
pub mod report;
pub mod telemetry;
pub mod utils;
