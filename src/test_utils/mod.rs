//! Test utilities for csvmap
//!
//! Shared by unit tests and the integration suite (through the `test-utils`
//! feature): logging setup plus fixtures for element markup and submissions.
//!
//! # Example
//!
//! ```rust,no_run
//! use csvmap::keys::InstanceSeed;
//! use csvmap::test_utils::{ElementFixture, SubmissionFixture};
//!
//! let element = ElementFixture::columns("id, score");
//! let data = SubmissionFixture::new(element.config(InstanceSeed::ColumnNames))
//!     .csv("id,score\n1,2\n")
//!     .select_identity()
//!     .question_data();
//! assert_eq!(data.submitted_answers.len(), 3);
//! ```

pub mod fixtures;

pub use fixtures::{ElementFixture, SubmissionFixture, encode_csv};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` if given, otherwise
/// `RUST_LOG` if set, otherwise installs nothing.
///
/// ```bash
/// RUST_LOG=csvmap=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
