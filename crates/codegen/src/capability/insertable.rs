use recgen_record::{Capability, Dialect, RecordDescriptor};

use super::{CapabilityGenerator, CapabilityOutput, FMT, SQL, STRINGS, column_list, push_exec, resolve_all};
use crate::error::Result;
use crate::method::MethodDeclaration;
use crate::source::{Lines, quote};

/// Multi-row insert of every field.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertableGenerator;

impl CapabilityGenerator for InsertableGenerator {
	fn capability(&self) -> Capability {
		Capability::Insertable
	}

	fn render(&self, record: &RecordDescriptor) -> Result<CapabilityOutput> {
		let fields = resolve_all(record)?;
		if fields.is_empty() {
			return Ok(CapabilityOutput::default());
		}

		let table = record.table_name();
		let name = method_name(record);
		let width = fields.len();
		let values = fields.iter().map(|(field, _)| format!("record.{}", field.name())).collect::<Vec<_>>().join(", ");
		let placeholder = match record.dialect() {
			Dialect::Generic => "\"?\"".to_string(),
			Dialect::Postgres => "fmt.Sprintf(\"$%d\", len(values))".to_string(),
		};

		let mut body = Lines::new();
		body.open("if len(records) == 0 {");
		body.line("return 0, nil");
		body.close("}");
		body.blank();
		body.line("rows := make([]string, 0, len(records))");
		body.line(format!("values := make([]interface{{}}, 0, len(records)*{width})"));
		body.blank();
		body.open("for _, record := range records {");
		body.line(format!("placeholders := make([]string, 0, {width})"));
		body.blank();
		body.open(format!("for _, value := range []interface{{}}{{{values}}} {{"));
		body.line("values = append(values, value)");
		body.line(format!("placeholders = append(placeholders, {placeholder})"));
		body.close("}");
		body.blank();
		body.line("rows = append(rows, \"(\"+strings.Join(placeholders, \", \")+\")\")");
		body.close("}");
		body.blank();
		body.line(format!(
			"statement := fmt.Sprintf({}, strings.Join(rows, \", \"))",
			quote(&format!("INSERT INTO {table} ({}) VALUES %s", column_list(&fields)))
		));
		push_exec(&mut body, "values...", &format!("create {table}"));

		let method = MethodDeclaration::new(Capability::Insertable, name.clone())
			.doc(format!("{name} inserts records into {table} in one statement and reports how many rows were added."))
			.param("records", format!("...{}", record.record_name()))
			.results(["int64", "error"])
			.body(body.into_lines())
			.imports([SQL, FMT, STRINGS]);

		Ok(CapabilityOutput {
			methods: vec![method],
			..CapabilityOutput::default()
		})
	}

	fn method_names(&self, record: &RecordDescriptor) -> Vec<String> {
		if record.fields().is_empty() {
			Vec::new()
		} else {
			vec![method_name(record)]
		}
	}
}

fn method_name(record: &RecordDescriptor) -> String {
	format!("Create{}", record.plural_name())
}
