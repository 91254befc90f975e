//! Terminal errors of one generation request.

use recgen_record::RecordError;
use thiserror::Error;

/// Why generation of a record could not complete.
#[derive(Debug, Error)]
pub enum GenerateError {
	/// A descriptor value required by a requested capability is missing or invalid.
	#[error("configuration error for record `{record}`: {reason}")]
	Configuration {
		/// Record being generated (may be empty for store-only requests).
		record: String,
		reason: String,
	},

	/// A field type has no known representation, or does not support a requested comparator.
	#[error("unsupported type `{type_name}` for field `{record}.{field}`{}", detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
	UnsupportedType {
		record: String,
		field: String,
		type_name: String,
		detail: Option<String>,
	},

	/// Assembly would have produced structurally invalid output. Always a defect.
	#[error("internal assembly error: {0}")]
	InternalAssembly(String),

	#[error(transparent)]
	Record(#[from] RecordError),
}

/// Copyable classification of a [`GenerateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	Configuration,
	UnsupportedType,
	InternalAssembly,
	Record,
}

impl GenerateError {
	pub(crate) fn configuration(record: &str, reason: impl Into<String>) -> Self {
		Self::Configuration {
			record: record.to_string(),
			reason: reason.into(),
		}
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Configuration { .. } => ErrorKind::Configuration,
			Self::UnsupportedType { .. } => ErrorKind::UnsupportedType,
			Self::InternalAssembly(_) => ErrorKind::InternalAssembly,
			Self::Record(_) => ErrorKind::Record,
		}
	}
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerateError>;
