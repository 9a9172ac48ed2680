// Library root: exposes the pipeline for integration tests and the binary.
// The binary entry point is src/main.rs.

pub mod config;
pub mod error;
pub mod export;
pub mod leads;
pub mod llm;
pub mod logger;
pub mod outreach;
pub mod stats;
