use recgen_record::{Capability, FieldDescriptor, RecordDescriptor, ident};

use super::{CapabilityGenerator, CapabilityOutput, FMT, SQL, STRINGS, push_empty_guard, push_exec, push_placeholders, resolve_all};
use crate::error::{GenerateError, Result};
use crate::method::MethodDeclaration;
use crate::source::{Lines, quote};

/// One update method per non-identifying field.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateableGenerator;

impl CapabilityGenerator for UpdateableGenerator {
	fn capability(&self) -> Capability {
		Capability::Updateable
	}

	fn render(&self, record: &RecordDescriptor) -> Result<CapabilityOutput> {
		let prefix = record.update_method_prefix();
		if !ident::is_identifier(prefix) {
			return Err(GenerateError::configuration(record.record_name(), format!("update method prefix {prefix:?} is not a valid identifier")));
		}

		let fields = resolve_all(record)?;
		let key_column = record.key_column();
		let table = record.table_name();
		let dialect = record.dialect();

		let mut methods = Vec::new();
		for (field, ty) in fields.iter().filter(|(field, _)| !is_key(record, field)) {
			let column = field.column();
			let name = method_name(record, field);

			let mut body = Lines::new();
			push_empty_guard(&mut body, "ids");
			body.blank();
			push_placeholders(&mut body, dialect, "ids", 2);
			body.blank();
			body.line(format!(
				"statement := fmt.Sprintf({}, strings.Join(placeholders, \", \"))",
				quote(&format!("UPDATE {table} SET {column} = {} WHERE {key_column} IN (%s)", dialect.placeholder(1)))
			));
			push_exec(&mut body, "append([]interface{}{value}, ids...)...", &format!("update {table}.{column}"));

			methods.push(
				MethodDeclaration::new(Capability::Updateable, name.clone())
					.doc(format!("{name} sets {column} to value on the rows of {table} whose {key_column} matches one of ids."))
					.param("value", ty.go_type())
					.param("ids", "...interface{}")
					.results(["int64", "error"])
					.body(body.into_lines())
					.imports([SQL, FMT, STRINGS]),
			);
		}

		Ok(CapabilityOutput {
			methods,
			..CapabilityOutput::default()
		})
	}

	fn method_names(&self, record: &RecordDescriptor) -> Vec<String> {
		record.fields().iter().filter(|field| !is_key(record, field)).map(|field| method_name(record, field)).collect()
	}
}

fn is_key(record: &RecordDescriptor, field: &FieldDescriptor) -> bool {
	record.key_field().is_some_and(|key| key.name() == field.name())
}

fn method_name(record: &RecordDescriptor, field: &FieldDescriptor) -> String {
	format!("{}{}{}", record.update_method_prefix(), record.record_name(), field.name())
}
