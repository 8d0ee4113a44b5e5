pub mod client;
pub mod config;
pub mod errors;
pub mod orchestrator;
pub mod plan;
pub mod report;
pub mod resolver;
pub mod ui;
