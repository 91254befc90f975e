//! Identifier checks and naming conventions shared by descriptors and generators.

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

/// Reserved words of the target language; none may be used as a bare identifier.
const GO_KEYWORDS: &[&str] = &[
	"break",
	"case",
	"chan",
	"const",
	"continue",
	"default",
	"defer",
	"else",
	"fallthrough",
	"for",
	"func",
	"go",
	"goto",
	"if",
	"import",
	"interface",
	"map",
	"package",
	"range",
	"return",
	"select",
	"struct",
	"switch",
	"type",
	"var",
];

/// Returns `true` when `name` is a usable identifier in generated source.
pub fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	let Some(first) = chars.next() else {
		return false;
	};
	if !(first.is_ascii_alphabetic() || first == '_') {
		return false;
	}
	chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !GO_KEYWORDS.contains(&name)
}

/// Returns `true` when `name` is a plain or schema-qualified SQL name (`authors`, `library.authors`).
pub fn is_sql_name(name: &str) -> bool {
	!name.is_empty()
		&& name.split('.').all(|segment| {
			let mut chars = segment.chars();
			matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_') && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		})
}

/// Column name derived from a field name (`UniversityID` -> `university_id`).
pub fn column_name(field: &str) -> String {
	field.to_snake_case()
}

/// Table name derived from a record name (`Author` -> `authors`).
pub fn table_name(record: &str) -> String {
	format!("{}s", record.to_snake_case())
}

/// Unexported type name backing a store interface (`BookStore` -> `bookStore`).
pub fn unexported(name: &str) -> String {
	name.to_lower_camel_case()
}

/// Exported form of a type name (`authorStore` -> `AuthorStore`).
pub fn exported(name: &str) -> String {
	name.to_upper_camel_case()
}
