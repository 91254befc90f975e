//! TOML generator configuration.
//!
//! A configuration file names package-wide defaults and any number of
//! `[[record]]` tables, each with its requested capabilities and ordered
//! `[[record.field]]` entries:
//!
//! ```toml
//! package = "library"
//! dialect = "postgres"
//!
//! [[record]]
//! name = "Author"
//! capabilities = ["store", "queryable", "deleteable"]
//!
//! [[record.field]]
//! name = "ID"
//! type = "int"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::capability::{Capability, CapabilitySet};
use crate::descriptor::{DEFAULT_PACKAGE, RecordDescriptor};
use crate::error::{RecordError, Result};
use crate::field::FieldDescriptor;
use crate::types::{Comparator, Dialect};

/// Default bound of each aggregation queue.
pub const DEFAULT_SINK_CAPACITY: usize = 16;

/// Top-level generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
	/// Package header of every generated unit.
	#[serde(default = "default_package")]
	pub package: String,
	/// Default placeholder dialect for records that do not set one.
	#[serde(default)]
	pub dialect: Dialect,
	/// Bound of each import/method queue per generation request.
	#[serde(default = "default_sink_capacity")]
	pub sink_capacity: usize,
	#[serde(default, rename = "record")]
	pub records: Vec<RecordConfig>,
}

/// One `[[record]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordConfig {
	pub name: String,
	pub table: Option<String>,
	pub store: Option<String>,
	pub update_prefix: Option<String>,
	pub primary_key: Option<String>,
	pub dialect: Option<Dialect>,
	#[serde(default)]
	pub capabilities: Vec<Capability>,
	#[serde(default, rename = "field")]
	pub fields: Vec<FieldConfig>,
}

/// One `[[record.field]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
	pub name: String,
	#[serde(rename = "type")]
	pub type_name: String,
	pub column: Option<String>,
	#[serde(default)]
	pub comparators: Vec<Comparator>,
}

fn default_package() -> String {
	DEFAULT_PACKAGE.to_string()
}

const fn default_sink_capacity() -> usize {
	DEFAULT_SINK_CAPACITY
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self {
			package: default_package(),
			dialect: Dialect::default(),
			sink_capacity: DEFAULT_SINK_CAPACITY,
			records: Vec::new(),
		}
	}
}

impl GeneratorConfig {
	/// Parses and validates a configuration document.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		let config: Self = toml::from_str(text)?;
		config.validate()?;
		tracing::debug!(records = config.records.len(), package = %config.package, "record.config.parsed");
		Ok(config)
	}

	/// Reads and parses a configuration file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|error| RecordError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&text)
	}

	fn validate(&self) -> Result<()> {
		if self.sink_capacity == 0 {
			return Err(RecordError::InvalidConfig("sink_capacity must be > 0".to_string()));
		}
		Ok(())
	}
}

impl RecordConfig {
	/// Builds the descriptor, inheriting package and dialect from `defaults`.
	pub fn descriptor(&self, defaults: &GeneratorConfig) -> Result<RecordDescriptor> {
		let mut builder = RecordDescriptor::builder(self.name.clone())
			.package(defaults.package.clone())
			.dialect(self.dialect.unwrap_or(defaults.dialect));

		if let Some(table) = &self.table {
			builder = builder.table(table.clone());
		}
		if let Some(store) = &self.store {
			builder = builder.store(store.clone());
		}
		if let Some(prefix) = &self.update_prefix {
			builder = builder.update_prefix(prefix.clone());
		}
		if let Some(key) = &self.primary_key {
			builder = builder.primary_key(key.clone());
		}

		builder.fields(self.fields.iter().map(FieldConfig::descriptor)).build()
	}

	/// Requested capabilities; an empty list requests all of them.
	pub fn capability_set(&self) -> CapabilitySet {
		if self.capabilities.is_empty() {
			CapabilitySet::all()
		} else {
			self.capabilities.iter().copied().collect()
		}
	}
}

impl FieldConfig {
	fn descriptor(&self) -> FieldDescriptor {
		let mut field = FieldDescriptor::new(self.name.clone(), self.type_name.clone());
		if let Some(column) = &self.column {
			field = field.with_column(column.clone());
		}
		if !self.comparators.is_empty() {
			field = field.with_comparators(self.comparators.iter().copied());
		}
		field
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use pretty_assertions::assert_eq;

	use super::*;

	const LIBRARY: &str = r#"
package = "library"
dialect = "postgres"
sink_capacity = 4

[[record]]
name = "Author"
capabilities = ["store", "deleteable"]

[[record.field]]
name = "ID"
type = "int"

[[record.field]]
name = "Name"
type = "string"
comparators = ["eq", "like"]

[[record]]
name = "Book"
table = "library.books"
dialect = "generic"

[[record.field]]
name = "Title"
type = "string"
column = "book_title"
"#;

	#[test]
	fn parses_records_in_order() {
		let config = GeneratorConfig::from_toml_str(LIBRARY).unwrap();
		assert_eq!(config.package, "library");
		assert_eq!(config.sink_capacity, 4);
		assert_eq!(config.records.len(), 2);

		let author = config.records[0].descriptor(&config).unwrap();
		assert_eq!(author.package(), "library");
		assert_eq!(author.dialect(), Dialect::Postgres);
		assert_eq!(author.table_name(), "authors");
		assert_eq!(author.fields()[1].comparators(), &[Comparator::Eq, Comparator::Like]);
		assert_eq!(
			config.records[0].capability_set(),
			CapabilitySet::STORE | CapabilitySet::DELETEABLE
		);

		let book = config.records[1].descriptor(&config).unwrap();
		assert_eq!(book.dialect(), Dialect::Generic);
		assert_eq!(book.table_name(), "library.books");
		assert_eq!(book.fields()[0].column(), "book_title");
		assert_eq!(config.records[1].capability_set(), CapabilitySet::all());
	}

	#[test]
	fn defaults_apply_to_empty_document() {
		let config = GeneratorConfig::from_toml_str("").unwrap();
		assert_eq!(config, GeneratorConfig::default());
	}

	#[test]
	fn zero_sink_capacity_is_rejected() {
		let err = GeneratorConfig::from_toml_str("sink_capacity = 0").unwrap_err();
		assert!(matches!(err, RecordError::InvalidConfig(_)));
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let err = GeneratorConfig::from_toml_str("[[record]]\nname = \"A\"\ncolour = \"red\"").unwrap_err();
		assert!(matches!(err, RecordError::Toml(_)));
	}

	#[test]
	fn unknown_comparator_is_a_parse_error() {
		let text = "[[record]]\nname = \"A\"\n[[record.field]]\nname = \"X\"\ntype = \"int\"\ncomparators = [\"between\"]";
		assert!(matches!(GeneratorConfig::from_toml_str(text), Err(RecordError::Toml(_))));
	}

	#[test]
	fn load_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(LIBRARY.as_bytes()).unwrap();
		let config = GeneratorConfig::load(file.path()).unwrap();
		assert_eq!(config.records[1].name, "Book");
	}

	#[test]
	fn load_reports_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let missing = dir.path().join("recgen.toml");
		let err = GeneratorConfig::load(&missing).unwrap_err();
		assert!(matches!(err, RecordError::Io { ref path, .. } if *path == missing));
	}
}
