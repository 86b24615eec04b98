//! Shared building blocks - errors and configuration

pub mod config;
pub mod errors;
