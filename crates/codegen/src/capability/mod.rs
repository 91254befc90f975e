//! Capability generators.
//!
//! Each access pattern is one generator: given a descriptor it renders its
//! supporting source fragment, the store methods it owns, and the imports
//! both need. [`produce`] renders first and publishes afterwards, so a
//! failing generator leaves no trace in the sinks.

use std::collections::BTreeSet;

use recgen_record::{Capability, Dialect, FieldDescriptor, RecordDescriptor, SemanticType};

use crate::error::{GenerateError, Result};
use crate::method::MethodDeclaration;
use crate::sink::{ProducerSinks, SinkClosed};
use crate::source::Lines;

mod deleteable;
mod insertable;
mod queryable;
mod store;
mod updateable;

pub use deleteable::DeleteableGenerator;
pub use insertable::InsertableGenerator;
pub use queryable::QueryableGenerator;
pub use store::StoreGenerator;
pub(crate) use store::{StoreNames, store_names, validate_store_name};
pub use updateable::UpdateableGenerator;

pub(crate) const SQL: &str = "database/sql";
pub(crate) const FMT: &str = "fmt";
pub(crate) const IO: &str = "io";
pub(crate) const OS: &str = "os";
pub(crate) const STRINGS: &str = "strings";

/// Receiver variable of every generated store method.
pub const RECEIVER: &str = "store";

/// What one capability contributes to a record's output.
#[derive(Debug, Default)]
pub struct CapabilityOutput {
	/// Non-method declarations (types, helpers), newline-terminated; may be empty.
	pub fragment: String,
	/// Imports required by the fragment.
	pub imports: BTreeSet<String>,
	/// Store methods, in field order where fields drive them.
	pub methods: Vec<MethodDeclaration>,
}

impl CapabilityOutput {
	/// Every import this output requires: the fragment's plus each method's.
	pub fn all_imports(&self) -> BTreeSet<String> {
		let mut imports = self.imports.clone();
		for method in &self.methods {
			imports.extend(method.imports.iter().cloned());
		}
		imports
	}
}

/// Common contract of the capability variants.
pub trait CapabilityGenerator: Send + Sync {
	fn capability(&self) -> Capability;

	/// Renders this capability's output without side effects.
	fn render(&self, record: &RecordDescriptor) -> Result<CapabilityOutput>;

	/// Names of the methods [`Self::render`] emits for `record`, without resolving field types.
	fn method_names(&self, _record: &RecordDescriptor) -> Vec<String> {
		Vec::new()
	}
}

/// Generator for `capability`.
pub fn generator(capability: Capability) -> &'static dyn CapabilityGenerator {
	match capability {
		Capability::Store => &StoreGenerator,
		Capability::Queryable => &QueryableGenerator,
		Capability::Insertable => &InsertableGenerator,
		Capability::Updateable => &UpdateableGenerator,
		Capability::Deleteable => &DeleteableGenerator,
	}
}

/// Renders `generator`'s output, publishes its imports and methods, and returns its fragment.
pub async fn produce(generator: &dyn CapabilityGenerator, record: &RecordDescriptor, sinks: &ProducerSinks) -> Result<String> {
	let capability = generator.capability();
	let output = generator.render(record)?;
	let imports = output.all_imports();

	tracing::trace!(
		record = record.record_name(),
		capability = capability.as_str(),
		imports = imports.len(),
		methods = output.methods.len(),
		"codegen.capability.publish"
	);

	for import in imports {
		sinks.imports.send(import).await.map_err(closed)?;
	}
	for method in output.methods {
		sinks.methods.send(method).await.map_err(closed)?;
	}

	Ok(output.fragment)
}

fn closed(err: SinkClosed) -> GenerateError {
	GenerateError::InternalAssembly(err.to_string())
}

/// Resolves a field's type or reports it as unsupported.
pub(crate) fn resolve(record: &RecordDescriptor, field: &FieldDescriptor) -> Result<SemanticType> {
	field.semantic_type().ok_or_else(|| GenerateError::UnsupportedType {
		record: record.record_name().to_string(),
		field: field.name().to_string(),
		type_name: field.type_name().to_string(),
		detail: None,
	})
}

/// Resolves every field, in declaration order.
pub(crate) fn resolve_all<'a>(record: &'a RecordDescriptor) -> Result<Vec<(&'a FieldDescriptor, SemanticType)>> {
	record.fields().iter().map(|field| resolve(record, field).map(|ty| (field, ty))).collect()
}

/// Comma-separated column list in field order.
pub(crate) fn column_list(fields: &[(&FieldDescriptor, SemanticType)]) -> String {
	fields.iter().map(|(field, _)| field.column()).collect::<Vec<_>>().join(", ")
}

pub(crate) fn method_receiver(record: &RecordDescriptor) -> String {
	format!("{RECEIVER} *{}", store_names(record).backing)
}

/// `placeholders := ...` sized to the `list` slice, first bind position `first`.
pub(crate) fn push_placeholders(body: &mut Lines, dialect: Dialect, list: &str, first: usize) {
	body.line(format!("placeholders := make([]string, len({list}))"));
	body.open(format!("for i := range {list} {{"));
	body.line(format!("placeholders[i] = {}", dialect.placeholder_expr("i", first)));
	body.close("}");
}

/// Early return for an empty id list.
pub(crate) fn push_empty_guard(body: &mut Lines, list: &str) {
	body.open(format!("if len({list}) == 0 {{"));
	body.line("return 0, nil");
	body.close("}");
}

pub(crate) fn push_log(body: &mut Lines) {
	body.line(format!("fmt.Fprintln({RECEIVER}, statement)"));
}

/// Logs and executes `statement` with `args`, returning the affected row count.
pub(crate) fn push_exec(body: &mut Lines, args: &str, context: &str) {
	push_log(body);
	body.blank();
	body.open("var (");
	body.line("result sql.Result");
	body.line("e      error");
	body.close(")");
	body.blank();
	body.open(format!("if result, e = {RECEIVER}.Exec(statement, {args}); e != nil {{"));
	body.line(format!("return -1, fmt.Errorf(\"{context}: %w\", e)"));
	body.close("}");
	body.blank();
	body.line("return result.RowsAffected()");
}
