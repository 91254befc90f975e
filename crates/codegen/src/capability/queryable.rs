use recgen_record::{Capability, Comparator, FieldDescriptor, RecordDescriptor, SemanticType};

use super::{CapabilityGenerator, CapabilityOutput, FMT, RECEIVER, SQL, column_list, push_log, resolve_all};
use crate::error::{GenerateError, Result};
use crate::method::MethodDeclaration;
use crate::source::{Lines, quote};

/// Counting, finders per field comparator, and per-column selects.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryableGenerator;

type Typed<'a> = (&'a FieldDescriptor, SemanticType);

impl CapabilityGenerator for QueryableGenerator {
	fn capability(&self) -> Capability {
		Capability::Queryable
	}

	fn render(&self, record: &RecordDescriptor) -> Result<CapabilityOutput> {
		let fields = resolve_all(record)?;
		for (field, ty) in &fields {
			if let Some(comparator) = field.comparators().iter().find(|c| !c.accepts(*ty)) {
				return Err(GenerateError::UnsupportedType {
					record: record.record_name().to_string(),
					field: field.name().to_string(),
					type_name: field.type_name().to_string(),
					detail: Some(format!("comparator `{comparator}` is not defined for this type")),
				});
			}
		}

		let mut output = CapabilityOutput::default();
		output.methods.push(count(record));
		if fields.is_empty() {
			return Ok(output);
		}

		output.fragment = scanner(record, &fields);
		output.imports = [SQL, FMT].into_iter().map(String::from).collect();
		output.methods.push(find_all(record, &fields));
		for (field, ty) in &fields {
			for comparator in field.comparators() {
				output.methods.push(find_by(record, &fields, field, *ty, *comparator));
			}
		}
		for (field, ty) in &fields {
			output.methods.push(select_column(record, field, *ty));
		}
		Ok(output)
	}

	fn method_names(&self, record: &RecordDescriptor) -> Vec<String> {
		let mut names = vec![count_name(record)];
		if record.fields().is_empty() {
			return names;
		}
		names.push(find_all_name(record));
		for field in record.fields() {
			names.extend(field.comparators().iter().map(|comparator| find_by_name(record, field, *comparator)));
		}
		names.extend(record.fields().iter().map(|field| select_name(record, field)));
		names
	}
}

fn count_name(record: &RecordDescriptor) -> String {
	format!("Count{}", record.plural_name())
}

fn find_all_name(record: &RecordDescriptor) -> String {
	format!("Find{}", record.plural_name())
}

fn find_by_name(record: &RecordDescriptor, field: &FieldDescriptor, comparator: Comparator) -> String {
	format!("Find{}By{}{}", record.plural_name(), field.name(), comparator.method_suffix())
}

fn select_name(record: &RecordDescriptor, field: &FieldDescriptor) -> String {
	format!("Select{}{}s", record.record_name(), field.name())
}

fn scanner_name(record: &RecordDescriptor) -> String {
	format!("scan{}", record.plural_name())
}

fn select_prefix(record: &RecordDescriptor, fields: &[Typed<'_>]) -> String {
	format!("SELECT {} FROM {}", column_list(fields), record.table_name())
}

fn scanner(record: &RecordDescriptor, fields: &[Typed<'_>]) -> String {
	let name = record.record_name();
	let targets = fields.iter().map(|(field, _)| format!("&record.{}", field.name())).collect::<Vec<_>>().join(", ");

	let mut lines = Lines::new();
	lines.line(format!("// {} reads every remaining row into {name} values and closes rows.", scanner_name(record)));
	lines.open(format!("func {}(rows *sql.Rows) ([]*{name}, error) {{", scanner_name(record)));
	lines.line("defer rows.Close()");
	lines.blank();
	lines.line(format!("var records []*{name}"));
	lines.blank();
	lines.open("for rows.Next() {");
	lines.line(format!("record := &{name}{{}}"));
	lines.blank();
	lines.open(format!("if e := rows.Scan({targets}); e != nil {{"));
	lines.line(format!("return nil, fmt.Errorf(\"scan {}: %w\", e)", record.table_name()));
	lines.close("}");
	lines.blank();
	lines.line("records = append(records, record)");
	lines.close("}");
	lines.blank();
	lines.line("return records, rows.Err()");
	lines.close("}");
	lines.render()
}

fn count(record: &RecordDescriptor) -> MethodDeclaration {
	let table = record.table_name();
	let name = count_name(record);

	let mut body = Lines::new();
	body.line(format!("statement := {}", quote(&format!("SELECT COUNT(*) FROM {table}"))));
	push_log(&mut body);
	body.blank();
	body.line("var count int");
	body.blank();
	body.open(format!("if e := {RECEIVER}.QueryRow(statement).Scan(&count); e != nil {{"));
	body.line(format!("return -1, fmt.Errorf(\"count {table}: %w\", e)"));
	body.close("}");
	body.blank();
	body.line("return count, nil");

	MethodDeclaration::new(Capability::Queryable, name.clone())
		.doc(format!("{name} returns the number of rows in {table}."))
		.results(["int", "error"])
		.body(body.into_lines())
		.imports([FMT])
}

fn find_all(record: &RecordDescriptor, fields: &[Typed<'_>]) -> MethodDeclaration {
	let dialect = record.dialect();
	let name = find_all_name(record);
	let statement = format!("{} LIMIT {} OFFSET {}", select_prefix(record, fields), dialect.placeholder(1), dialect.placeholder(2));

	let mut body = Lines::new();
	body.line(format!("statement := {}", quote(&statement)));
	push_log(&mut body);
	body.blank();
	push_query(&mut body, record, "limit, offset", &format!("find {}", record.table_name()));

	MethodDeclaration::new(Capability::Queryable, name.clone())
		.doc(format!("{name} returns up to limit rows of {}, skipping the first offset.", record.table_name()))
		.param("limit", "int")
		.param("offset", "int")
		.results([format!("[]*{}", record.record_name()), "error".to_string()])
		.body(body.into_lines())
		.imports([SQL, FMT])
}

fn find_by(record: &RecordDescriptor, fields: &[Typed<'_>], field: &FieldDescriptor, ty: SemanticType, comparator: Comparator) -> MethodDeclaration {
	let name = find_by_name(record, field, comparator);
	let param = if comparator == Comparator::Like { "pattern" } else { "value" };
	let column = field.column();
	let prefix = select_prefix(record, fields);
	let statement = format!("{prefix} WHERE {column} {} {}", comparator.sql_operator(), record.dialect().placeholder(1));
	let context = format!("find {} by {column}", record.table_name());

	let mut body = Lines::new();
	body.line(format!("statement := {}", quote(&statement)));

	// A NULL operand never satisfies = or <>, so an invalid value switches to IS [NOT] NULL.
	let null_test = match comparator {
		Comparator::Eq => Some("IS NULL"),
		Comparator::Ne => Some("IS NOT NULL"),
		_ => None,
	};
	match null_test.filter(|_| ty.is_nullable()) {
		Some(test) => {
			body.line(format!("args := []interface{{}}{{{param}}}"));
			body.blank();
			body.open(format!("if !{param}.Valid {{"));
			body.line(format!("statement = {}", quote(&format!("{prefix} WHERE {column} {test}"))));
			body.line("args = nil");
			body.close("}");
			body.blank();
			push_log(&mut body);
			body.blank();
			push_query(&mut body, record, "args...", &context);
		}
		None => {
			push_log(&mut body);
			body.blank();
			push_query(&mut body, record, param, &context);
		}
	}

	let doc = match comparator {
		Comparator::Eq => format!("{name} returns the rows of {} whose {column} equals {param}.", record.table_name()),
		Comparator::Ne => format!("{name} returns the rows of {} whose {column} differs from {param}.", record.table_name()),
		Comparator::Like => format!("{name} returns the rows of {} whose {column} matches the LIKE {param}.", record.table_name()),
		Comparator::Gt => format!("{name} returns the rows of {} whose {column} is greater than {param}.", record.table_name()),
		Comparator::Lt => format!("{name} returns the rows of {} whose {column} is less than {param}.", record.table_name()),
	};

	MethodDeclaration::new(Capability::Queryable, name)
		.doc(doc)
		.param(param, ty.go_type())
		.results([format!("[]*{}", record.record_name()), "error".to_string()])
		.body(body.into_lines())
		.imports([SQL, FMT])
}

fn select_column(record: &RecordDescriptor, field: &FieldDescriptor, ty: SemanticType) -> MethodDeclaration {
	let table = record.table_name();
	let column = field.column();
	let name = select_name(record, field);
	let go_type = ty.go_type();

	let mut body = Lines::new();
	body.line(format!("statement := {}", quote(&format!("SELECT {column} FROM {table}"))));
	push_log(&mut body);
	body.blank();
	body.line(format!("rows, e := {RECEIVER}.Query(statement)"));
	body.open("if e != nil {");
	body.line(format!("return nil, fmt.Errorf(\"select {table}.{column}: %w\", e)"));
	body.close("}");
	body.blank();
	body.line("defer rows.Close()");
	body.blank();
	body.line(format!("var values []{go_type}"));
	body.blank();
	body.open("for rows.Next() {");
	body.line(format!("var value {go_type}"));
	body.blank();
	body.open("if e := rows.Scan(&value); e != nil {");
	body.line(format!("return nil, fmt.Errorf(\"scan {table}.{column}: %w\", e)"));
	body.close("}");
	body.blank();
	body.line("values = append(values, value)");
	body.close("}");
	body.blank();
	body.line("return values, rows.Err()");

	let mut imports = vec![FMT];
	if ty.is_nullable() {
		imports.push(SQL);
	}

	MethodDeclaration::new(Capability::Queryable, name.clone())
		.doc(format!("{name} returns the {column} column of every row in {table}."))
		.results([format!("[]{go_type}"), "error".to_string()])
		.body(body.into_lines())
		.imports(imports)
}

fn push_query(body: &mut Lines, record: &RecordDescriptor, args: &str, context: &str) {
	body.line(format!("rows, e := {RECEIVER}.Query(statement, {args})"));
	body.open("if e != nil {");
	body.line(format!("return nil, fmt.Errorf(\"{context}: %w\", e)"));
	body.close("}");
	body.blank();
	body.line(format!("return {}(rows)", scanner_name(record)));
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use recgen_record::Dialect;

	use super::*;
	use crate::error::ErrorKind;

	fn author() -> RecordDescriptor {
		RecordDescriptor::builder("Author")
			.field(FieldDescriptor::new("ID", "int").with_comparators([Comparator::Eq, Comparator::Gt]))
			.field(FieldDescriptor::new("Name", "string").with_comparators([Comparator::Eq, Comparator::Like]))
			.field(FieldDescriptor::new("UniversityID", "sql.NullInt64"))
			.build()
			.unwrap()
	}

	#[test]
	fn methods_follow_field_and_comparator_order() {
		let output = QueryableGenerator.render(&author()).unwrap();
		let names: Vec<_> = output.methods.iter().map(|m| m.name.as_str()).collect();
		assert_eq!(
			names,
			vec![
				"CountAuthors",
				"FindAuthors",
				"FindAuthorsByID",
				"FindAuthorsByIDGreaterThan",
				"FindAuthorsByName",
				"FindAuthorsByNameLike",
				"FindAuthorsByUniversityID",
				"SelectAuthorIDs",
				"SelectAuthorNames",
				"SelectAuthorUniversityIDs",
			]
		);
		assert!(output.fragment.starts_with("// scanAuthors reads"));
		assert!(output.fragment.contains("rows.Scan(&record.ID, &record.Name, &record.UniversityID)"));
	}

	#[test]
	fn nullable_equality_switches_to_is_null() {
		let output = QueryableGenerator.render(&author()).unwrap();
		let method = output.methods.iter().find(|m| m.name == "FindAuthorsByUniversityID").unwrap();
		assert_eq!(method.signature(), "FindAuthorsByUniversityID(value sql.NullInt64) ([]*Author, error)");
		assert!(method.body.iter().any(|l| l.contains("WHERE university_id IS NULL")));
	}

	#[test]
	fn like_takes_a_pattern() {
		let output = QueryableGenerator.render(&author()).unwrap();
		let method = output.methods.iter().find(|m| m.name == "FindAuthorsByNameLike").unwrap();
		assert_eq!(method.signature(), "FindAuthorsByNameLike(pattern string) ([]*Author, error)");
		assert!(method.body[0].contains("WHERE name LIKE ?"));
	}

	#[test]
	fn postgres_limit_offset() {
		let record = RecordDescriptor::builder("Author").dialect(Dialect::Postgres).field(FieldDescriptor::new("ID", "int")).build().unwrap();
		let output = QueryableGenerator.render(&record).unwrap();
		let find = output.methods.iter().find(|m| m.name == "FindAuthors").unwrap();
		assert_eq!(find.body[0], "statement := \"SELECT id FROM authors LIMIT $1 OFFSET $2\"");
	}

	#[test]
	fn no_fields_yields_count_only() {
		let record = RecordDescriptor::builder("Tag").build().unwrap();
		let output = QueryableGenerator.render(&record).unwrap();
		assert_eq!(output.methods.len(), 1);
		assert!(output.fragment.is_empty());
		assert_eq!(output.all_imports().into_iter().collect::<Vec<_>>(), vec!["fmt"]);
	}

	#[test]
	fn unknown_type_fails() {
		let record = RecordDescriptor::builder("Author").field(FieldDescriptor::new("Shape", "complex128")).build().unwrap();
		assert_eq!(QueryableGenerator.render(&record).unwrap_err().kind(), ErrorKind::UnsupportedType);
	}

	#[test]
	fn comparator_type_mismatch_fails() {
		let record = RecordDescriptor::builder("Author")
			.field(FieldDescriptor::new("Age", "int").with_comparators([Comparator::Like]))
			.build()
			.unwrap();
		let err = QueryableGenerator.render(&record).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::UnsupportedType);
		assert!(err.to_string().contains("comparator `like`"));
	}
}
