//! Constants shared across csvmap.
//!
//! The field-name pieces here form the wire contract with the browser-side
//! script that builds the upload form. Changing any of them breaks submissions
//! from pages rendered before the change.

/// Tag name of the element handled by this crate.
pub const ELEMENT_TAG: &str = "pl-single-csv-upload";

/// Prefix of every form field owned by a widget instance.
pub const FIELD_PREFIX: &str = "_single_csv_upload_";

/// Separator between the instance part and the encoded column name.
pub const COLUMN_SEPARATOR: &str = "_col_";

/// Attribute holding the required column names.
pub const ATTR_COLUMN_NAMES: &str = "column-names";

/// Attribute holding the declared file name.
pub const ATTR_FILE_NAME: &str = "file-name";

/// Key in `params` where every element on the page registers its required columns.
pub const REQUIRED_COLUMNS_PARAM: &str = "_required_column_names";

/// Key in `params` where declared file names are registered.
pub const FILE_NAMES_PARAM: &str = "_single_csv_upload_file_names";

/// Default format-error channel for file submissions.
pub const FILES_ERROR_KEY: &str = "_files";

/// Number of instance-id hex digits used in the default file name.
pub const DEFAULT_FILE_NAME_ID_LEN: usize = 12;

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "CSVMAP_CONFIG";

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "csvmap.toml";
