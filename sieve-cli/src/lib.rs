//! Command-line front end for the Sieve kernel
//!
//! The binary lives in `main.rs`; commands and configuration are exposed here
//! so integration tests can drive them directly.

pub mod commands;
pub mod config;
