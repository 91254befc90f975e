//! Semantic field types, query comparators, and placeholder dialects.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::RecordError;

/// Primitive value kinds a field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
	Integer,
	String,
	Boolean,
	Float,
}

impl Primitive {
	fn from_spelling(spelling: &str) -> Option<Self> {
		match spelling {
			"int" | "int64" | "integer" => Some(Self::Integer),
			"string" => Some(Self::String),
			"bool" | "boolean" => Some(Self::Boolean),
			"float64" | "float" => Some(Self::Float),
			_ => None,
		}
	}

	/// Returns `true` for integer and float kinds.
	pub const fn is_numeric(self) -> bool {
		matches!(self, Self::Integer | Self::Float)
	}

	const fn go_type(self) -> &'static str {
		match self {
			Self::Integer => "int",
			Self::String => "string",
			Self::Boolean => "bool",
			Self::Float => "float64",
		}
	}

	const fn nullable_go_type(self) -> &'static str {
		match self {
			Self::Integer => "sql.NullInt64",
			Self::String => "sql.NullString",
			Self::Boolean => "sql.NullBool",
			Self::Float => "sql.NullFloat64",
		}
	}
}

/// Resolved type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
	Plain(Primitive),
	Nullable(Primitive),
}

impl SemanticType {
	/// Resolves a type spelling from a field annotation.
	///
	/// Accepts the target spellings (`int`, `sql.NullInt64`, ...) and the
	/// descriptive ones (`integer`, `nullable-integer`, `nullable integer`).
	/// Returns `None` for anything else; callers decide how to report it.
	pub fn parse(spelling: &str) -> Option<Self> {
		let spelling = spelling.trim();
		match spelling {
			"sql.NullInt64" => return Some(Self::Nullable(Primitive::Integer)),
			"sql.NullString" => return Some(Self::Nullable(Primitive::String)),
			"sql.NullBool" => return Some(Self::Nullable(Primitive::Boolean)),
			"sql.NullFloat64" => return Some(Self::Nullable(Primitive::Float)),
			_ => {}
		}

		if let Some(inner) = spelling.strip_prefix("nullable-").or_else(|| spelling.strip_prefix("nullable ")) {
			return Primitive::from_spelling(inner.trim()).map(Self::Nullable);
		}

		Primitive::from_spelling(spelling).map(Self::Plain)
	}

	pub const fn primitive(self) -> Primitive {
		match self {
			Self::Plain(p) | Self::Nullable(p) => p,
		}
	}

	pub const fn is_nullable(self) -> bool {
		matches!(self, Self::Nullable(_))
	}

	/// Type spelling used in generated signatures.
	pub const fn go_type(self) -> &'static str {
		match self {
			Self::Plain(p) => p.go_type(),
			Self::Nullable(p) => p.nullable_go_type(),
		}
	}
}

/// Comparison offered by a generated finder method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
	Eq,
	Ne,
	Like,
	Gt,
	Lt,
}

impl Comparator {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Eq => "eq",
			Self::Ne => "ne",
			Self::Like => "like",
			Self::Gt => "gt",
			Self::Lt => "lt",
		}
	}

	/// Suffix appended to the finder method name.
	pub const fn method_suffix(self) -> &'static str {
		match self {
			Self::Eq => "",
			Self::Ne => "Not",
			Self::Like => "Like",
			Self::Gt => "GreaterThan",
			Self::Lt => "LessThan",
		}
	}

	pub const fn sql_operator(self) -> &'static str {
		match self {
			Self::Eq => "=",
			Self::Ne => "<>",
			Self::Like => "LIKE",
			Self::Gt => ">",
			Self::Lt => "<",
		}
	}

	/// Whether this comparison is meaningful for a field of type `ty`.
	pub const fn accepts(self, ty: SemanticType) -> bool {
		match self {
			Self::Eq | Self::Ne => true,
			Self::Like => matches!(ty.primitive(), Primitive::String),
			Self::Gt | Self::Lt => ty.primitive().is_numeric(),
		}
	}
}

impl fmt::Display for Comparator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Comparator {
	type Err = RecordError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"eq" => Ok(Self::Eq),
			"ne" => Ok(Self::Ne),
			"like" => Ok(Self::Like),
			"gt" => Ok(Self::Gt),
			"lt" => Ok(Self::Lt),
			other => Err(RecordError::UnknownComparator(other.to_string())),
		}
	}
}

/// Bind placeholder style of the target database driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
	/// `?` placeholders (MySQL, SQLite).
	#[default]
	Generic,
	/// Numbered `$n` placeholders.
	Postgres,
}

impl Dialect {
	/// Placeholder for the bind parameter at 1-based `position`.
	pub fn placeholder(self, position: usize) -> String {
		match self {
			Self::Generic => "?".to_string(),
			Self::Postgres => format!("${position}"),
		}
	}

	/// Go expression producing the placeholder for a loop index `index_var`,
	/// where the first generated placeholder is bind position `first`.
	pub fn placeholder_expr(self, index_var: &str, first: usize) -> String {
		match self {
			Self::Generic => "\"?\"".to_string(),
			Self::Postgres => format!("fmt.Sprintf(\"$%d\", {index_var}+{first})"),
		}
	}
}
