//! csvmap - single CSV upload with column mapping
//!
//! Server side of the `<pl-single-csv-upload>` question element. A learner
//! uploads one CSV file and, for every column the question requires, picks the
//! header of their file that holds it. The element answers three lifecycle
//! calls from the page host:
//!
//! 1. **prepare** registers the element's required column names in the
//!    page-wide registry carried by the request;
//! 2. **render** draws the upload control with one selector per required
//!    column, restoring an earlier answer if there is one;
//! 3. **parse** moves the submitted payload and selections under the
//!    element's file name and reports every defect it finds.
//!
//! Form-field names are derived deterministically from the element's
//! declaration so that render and the following parse agree without shared
//! state (see [`keys`]).
//!
//! # Stored Answer
//!
//! ```json
//! {
//!   "scores.csv": {
//!     "content": "<base-64 file>",
//!     "column_names": { "student": "Student ID", "score": "Total" }
//!   }
//! }
//! ```
//!
//! # Modules
//!
//! - [`element`] - the three lifecycle calls and their building blocks
//! - [`keys`] - instance ids and form-field names
//! - [`clist`] - the comma-list dialect shared by attributes and CSV headers
//! - [`host`] - typed view of the host's question data
//! - [`templating`] - Tera rendering of the upload control
//! - [`config`] - `csvmap.toml` settings
//! - [`cli`] - the `csvmap` binary's commands
//! - [`core`] - error types and user-facing error reporting
//!
//! # Command Line
//!
//! ```bash
//! csvmap prepare --element question.html --data data.json
//! csvmap render --element question.html
//! csvmap parse --element question.html --data submitted.json --strict
//! csvmap keys --element question.html
//! csvmap check --element question.html --csv sample.csv
//! ```

// Element lifecycle
pub mod clist;
pub mod element;
pub mod host;
pub mod keys;

// Presentation
pub mod templating;

// Supporting modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
