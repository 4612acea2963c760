//! Core types and trait definitions for the banzuke sync pipeline.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod basho;
pub mod error;
pub mod history;
pub mod kimarite;
pub mod raw;
pub mod rikishi;
pub mod run_log;
pub mod source;
pub mod store;
pub mod transform;

pub use error::{Error, Result};
