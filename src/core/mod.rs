//! Core types for csvmap
//!
//! Error handling lives here: [`CsvMapError`] for configuration faults,
//! [`ErrorContext`] and [`user_friendly_error`] for presenting them on the
//! command line.

pub mod error;

pub use error::{CsvMapError, ErrorContext, user_friendly_error};
