use crate::ident;
use crate::types::{Comparator, SemanticType};

/// One field of a record, as described by its source annotation.
///
/// The type spelling is kept verbatim and resolved on demand, so an
/// unsupported type surfaces from the generator that needs it rather than
/// at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
	name: String,
	type_name: String,
	column: Option<String>,
	comparators: Vec<Comparator>,
}

impl FieldDescriptor {
	/// Creates a field offering equality lookups only.
	pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			type_name: type_name.into(),
			column: None,
			comparators: vec![Comparator::Eq],
		}
	}

	/// Overrides the column the field maps to.
	pub fn with_column(mut self, column: impl Into<String>) -> Self {
		self.column = Some(column.into());
		self
	}

	/// Replaces the comparator set. Repeats are dropped, first occurrence wins.
	pub fn with_comparators(mut self, comparators: impl IntoIterator<Item = Comparator>) -> Self {
		self.comparators.clear();
		for comparator in comparators {
			if !self.comparators.contains(&comparator) {
				self.comparators.push(comparator);
			}
		}
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// Explicit column override, if any.
	pub fn column_override(&self) -> Option<&str> {
		self.column.as_deref()
	}

	/// Column name, falling back to the snake_case field name.
	pub fn column(&self) -> String {
		self.column.clone().unwrap_or_else(|| ident::column_name(&self.name))
	}

	pub fn comparators(&self) -> &[Comparator] {
		&self.comparators
	}

	/// Resolves the type spelling; `None` when it has no known representation.
	pub fn semantic_type(&self) -> Option<SemanticType> {
		SemanticType::parse(&self.type_name)
	}
}
