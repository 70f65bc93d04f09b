//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Principal extraction from headers set by the upstream auth gateway
//! - Client IP resolution behind reverse proxies
//! - Environment-backed configuration helpers

pub mod client;
pub mod config;
