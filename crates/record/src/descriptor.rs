use std::collections::HashSet;

use crate::error::{RecordError, Result};
use crate::field::FieldDescriptor;
use crate::ident;
use crate::types::Dialect;

/// Package name used when the scanner does not supply one.
pub const DEFAULT_PACKAGE: &str = "models";
/// Prefix of generated per-field update methods when none is configured.
pub const DEFAULT_UPDATE_PREFIX: &str = "Update";
/// Identifying column used when a record has no `ID` field and no configured key.
pub const DEFAULT_KEY_COLUMN: &str = "id";

/// Declarative description of one database-backed record type.
///
/// Built once per generation request and read-only afterwards. Names are
/// stored as given; whether they are usable for a particular capability is
/// decided at generation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
	record_name: String,
	table_name: String,
	store_name: String,
	update_method_prefix: String,
	package: String,
	dialect: Dialect,
	primary_key: Option<String>,
	fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
	/// Starts a descriptor for `record_name`. An empty name is allowed for store-only requests.
	pub fn builder(record_name: impl Into<String>) -> RecordBuilder {
		RecordBuilder {
			record_name: record_name.into(),
			table_name: None,
			store_name: None,
			update_method_prefix: None,
			package: None,
			dialect: Dialect::default(),
			primary_key: None,
			fields: Vec::new(),
		}
	}

	pub fn record_name(&self) -> &str {
		&self.record_name
	}

	pub fn table_name(&self) -> &str {
		&self.table_name
	}

	pub fn store_name(&self) -> &str {
		&self.store_name
	}

	pub fn update_method_prefix(&self) -> &str {
		&self.update_method_prefix
	}

	pub fn package(&self) -> &str {
		&self.package
	}

	pub fn dialect(&self) -> Dialect {
		self.dialect
	}

	/// Fields in declaration order.
	pub fn fields(&self) -> &[FieldDescriptor] {
		&self.fields
	}

	/// Unexported struct implementing the store interface (`AuthorStore` -> `authorStore`).
	pub fn store_type_name(&self) -> String {
		ident::unexported(&self.store_name)
	}

	/// Plural record name used in method names (`Author` -> `Authors`).
	pub fn plural_name(&self) -> String {
		format!("{}s", self.record_name)
	}

	/// The field identifying a row: the configured key, else a field named `ID`.
	pub fn key_field(&self) -> Option<&FieldDescriptor> {
		let key = self.primary_key.as_deref().unwrap_or("ID");
		self.fields.iter().find(|field| field.name() == key)
	}

	/// Column used by delete and update statements to identify rows.
	pub fn key_column(&self) -> String {
		self.key_field().map_or_else(|| DEFAULT_KEY_COLUMN.to_string(), FieldDescriptor::column)
	}
}

/// Builder for [`RecordDescriptor`]; fills naming defaults and checks field structure.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
	record_name: String,
	table_name: Option<String>,
	store_name: Option<String>,
	update_method_prefix: Option<String>,
	package: Option<String>,
	dialect: Dialect,
	primary_key: Option<String>,
	fields: Vec<FieldDescriptor>,
}

impl RecordBuilder {
	pub fn table(mut self, table: impl Into<String>) -> Self {
		self.table_name = Some(table.into());
		self
	}

	/// Sets the store name. An explicit empty value is kept and rejected at generation time.
	pub fn store(mut self, store: impl Into<String>) -> Self {
		self.store_name = Some(store.into());
		self
	}

	pub fn update_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.update_method_prefix = Some(prefix.into());
		self
	}

	pub fn package(mut self, package: impl Into<String>) -> Self {
		self.package = Some(package.into());
		self
	}

	pub fn dialect(mut self, dialect: Dialect) -> Self {
		self.dialect = dialect;
		self
	}

	pub fn primary_key(mut self, field: impl Into<String>) -> Self {
		self.primary_key = Some(field.into());
		self
	}

	/// Appends one field; declaration order is preserved.
	pub fn field(mut self, field: FieldDescriptor) -> Self {
		self.fields.push(field);
		self
	}

	pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
		self.fields.extend(fields);
		self
	}

	/// Finalizes the descriptor.
	///
	/// Fails on duplicate field names and on a primary key that names no field.
	pub fn build(self) -> Result<RecordDescriptor> {
		let mut seen = HashSet::new();
		for field in &self.fields {
			if !seen.insert(field.name()) {
				return Err(RecordError::DuplicateField {
					record: self.record_name.clone(),
					field: field.name().to_string(),
				});
			}
		}

		if let Some(key) = &self.primary_key
			&& !seen.contains(key.as_str())
		{
			return Err(RecordError::UnknownPrimaryKey {
				record: self.record_name.clone(),
				key: key.clone(),
			});
		}

		let table_name = self.table_name.unwrap_or_else(|| {
			if self.record_name.is_empty() {
				String::new()
			} else {
				ident::table_name(&self.record_name)
			}
		});
		let store_name = self.store_name.unwrap_or_else(|| {
			if self.record_name.is_empty() {
				String::new()
			} else {
				format!("{}Store", self.record_name)
			}
		});

		tracing::trace!(record = %self.record_name, table = %table_name, store = %store_name, fields = self.fields.len(), "record.descriptor.build");

		Ok(RecordDescriptor {
			record_name: self.record_name,
			table_name,
			store_name,
			update_method_prefix: self.update_method_prefix.unwrap_or_else(|| DEFAULT_UPDATE_PREFIX.to_string()),
			package: self.package.unwrap_or_else(|| DEFAULT_PACKAGE.to_string()),
			dialect: self.dialect,
			primary_key: self.primary_key,
			fields: self.fields,
		})
	}
}
