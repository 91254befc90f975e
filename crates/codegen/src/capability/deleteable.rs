use recgen_record::{Capability, RecordDescriptor};

use super::{CapabilityGenerator, CapabilityOutput, FMT, SQL, STRINGS, push_empty_guard, push_exec, push_placeholders};
use crate::error::Result;
use crate::method::MethodDeclaration;
use crate::source::{Lines, quote};

/// Delete by identifying column. Never inspects field types.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteableGenerator;

impl CapabilityGenerator for DeleteableGenerator {
	fn capability(&self) -> Capability {
		Capability::Deleteable
	}

	fn render(&self, record: &RecordDescriptor) -> Result<CapabilityOutput> {
		let table = record.table_name();
		let column = record.key_column();
		let name = method_name(record);

		let mut body = Lines::new();
		push_empty_guard(&mut body, "ids");
		body.blank();
		push_placeholders(&mut body, record.dialect(), "ids", 1);
		body.blank();
		body.line(format!(
			"statement := fmt.Sprintf({}, strings.Join(placeholders, \", \"))",
			quote(&format!("DELETE FROM {table} WHERE {column} IN (%s)"))
		));
		push_exec(&mut body, "ids...", &format!("delete {table}"));

		let method = MethodDeclaration::new(Capability::Deleteable, name.clone())
			.doc(format!("{name} deletes the rows of {table} whose {column} matches one of ids and reports how many were removed."))
			.param("ids", "...interface{}")
			.results(["int64", "error"])
			.body(body.into_lines())
			.imports([SQL, FMT, STRINGS]);

		Ok(CapabilityOutput {
			methods: vec![method],
			..CapabilityOutput::default()
		})
	}

	fn method_names(&self, record: &RecordDescriptor) -> Vec<String> {
		vec![method_name(record)]
	}
}

fn method_name(record: &RecordDescriptor) -> String {
	format!("Delete{}", record.plural_name())
}
