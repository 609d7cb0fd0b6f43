pub mod catalog;
pub mod compare;
pub mod error;
pub mod filter;
pub mod handoff;
pub mod mcp_api;
pub mod model;
pub mod present;
pub mod redis;
pub mod showcase;
pub mod submission;
