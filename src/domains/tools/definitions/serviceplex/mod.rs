//! Serviceplex contract-management tools.
//!
//! - `client`: the shared HTTP client for the downstream API
//! - `contract`: contract lookup by WBS code

pub mod client;
pub mod contract;

pub use client::ServiceplexClient;
pub use contract::{GetContractParams, GetContractTool};
