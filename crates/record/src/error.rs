//! Error types for record descriptors and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building descriptors or loading generator configuration.
#[derive(Debug, Error)]
pub enum RecordError {
	/// Two fields of one record share a name.
	#[error("duplicate field `{field}` in record `{record}`")]
	DuplicateField {
		/// Record the field belongs to.
		record: String,
		/// The repeated field name.
		field: String,
	},

	/// The configured primary key does not name a field of the record.
	#[error("primary key `{key}` is not a field of record `{record}`")]
	UnknownPrimaryKey {
		/// Record the key was configured for.
		record: String,
		/// The unmatched key.
		key: String,
	},

	/// A comparator spelling is not one of the supported comparators.
	#[error("unknown comparator: {0} (expected one of eq, ne, like, gt, lt)")]
	UnknownComparator(String),

	/// A configuration value is out of range.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// TOML syntax or shape error.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

/// Result type for descriptor and configuration operations.
pub type Result<T> = std::result::Result<T, RecordError>;
