//! Coverhound - Multi-provider cover and poster lookup
//!
//! This library crate exposes the lookup pipeline and configuration for the
//! CLI and for integration testing.

pub mod config;
pub mod lookup;
