pub mod common;
pub mod config;
pub mod ingest;
pub mod prompts;
pub mod refine;
