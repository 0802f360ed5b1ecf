//! Integration test suite for csvmap
//!
//! End-to-end tests that run the `csvmap` binary against files in a temporary
//! project directory.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **lifecycle**: prepare, render and parse across consecutive requests
//! - **keys**: field-name listing and decoding
//! - **check**: checking sample CSV files against an element
//! - **config**: settings file lookup and overrides
//! - **error_scenarios**: configuration faults and their reporting

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod check;
mod config;
mod error_scenarios;
mod keys;
mod lifecycle;
