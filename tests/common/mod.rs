//! Common test utilities and helpers
//!
//! This module provides shared functionality used across integration tests:
//! - Binary path resolution (via `get_cmext_binary`)
//! - Project and fake tool fixtures (via `helpers`)

pub(crate) mod helpers;

// Re-export get_cmext_binary for convenient access
pub(crate) use helpers::get_cmext_binary;
