//! Tool definitions module.
//!
//! Each tool is defined in its own module for better maintainability.

pub mod health;
pub mod serviceplex;

pub use health::HealthPingTool;
pub use serviceplex::{GetContractParams, GetContractTool, ServiceplexClient};
