//! Shared configuration and tracing setup for the token service
//!
//! This crate provides the process-level plumbing used by the other crates:
//! - Configuration management following 12-factor principles
//! - Tracing subscriber initialisation

pub mod config;
pub mod telemetry;

pub use config::Config;
pub use telemetry::init_tracing;
