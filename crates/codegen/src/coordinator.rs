//! Request orchestration: validation, sink wiring, producer fan-out, and assembly.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use recgen_record::config::DEFAULT_SINK_CAPACITY;
use recgen_record::{Capability, CapabilitySet, GeneratorConfig, RecordDescriptor, ident};
use tokio::task::JoinSet;

use crate::aggregate::Aggregator;
use crate::assemble::{Assembler, GeneratedUnit};
use crate::capability::{generator, produce, store_names, validate_store_name};
use crate::error::{GenerateError, Result};
use crate::join_set::ProducerSet;
use crate::sink::{self, ProducerSinks};

/// Coordinator tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
	/// Bound of each import/method queue.
	pub sink_capacity: usize,
}

impl Default for CoordinatorConfig {
	fn default() -> Self {
		Self {
			sink_capacity: DEFAULT_SINK_CAPACITY,
		}
	}
}

impl From<&GeneratorConfig> for CoordinatorConfig {
	fn from(config: &GeneratorConfig) -> Self {
		Self {
			sink_capacity: config.sink_capacity,
		}
	}
}

/// One record and the capabilities requested for it.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
	pub record: Arc<RecordDescriptor>,
	pub capabilities: CapabilitySet,
}

impl GenerationRequest {
	pub fn new(record: impl Into<Arc<RecordDescriptor>>, capabilities: CapabilitySet) -> Self {
		Self {
			record: record.into(),
			capabilities,
		}
	}

	/// One request per `[[record]]` table, in file order.
	pub fn from_config(config: &GeneratorConfig) -> Result<Vec<Self>> {
		config
			.records
			.iter()
			.map(|record| Ok(Self::new(record.descriptor(config)?, record.capability_set())))
			.collect()
	}
}

/// Drives generation of one record per request.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coordinator {
	config: CoordinatorConfig,
}

impl Coordinator {
	pub fn new(config: CoordinatorConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> CoordinatorConfig {
		self.config
	}

	/// Generates the unit for `record` with every capability in `capabilities`.
	///
	/// Invalid requests fail before any sink or producer exists. Otherwise
	/// every producer runs to completion before the sinks close; when
	/// several producers fail, the error of the earliest capability in
	/// canonical order is returned.
	pub async fn generate(&self, record: Arc<RecordDescriptor>, capabilities: CapabilitySet) -> Result<GeneratedUnit> {
		validate(&record, capabilities)?;

		let (imports_owner, imports_rx) = sink::channel("imports", self.config.sink_capacity);
		let (methods_owner, methods_rx) = sink::channel("methods", self.config.sink_capacity);
		let aggregator = Aggregator::spawn(imports_rx, methods_rx);

		let mut producers = ProducerSet::new(record.record_name());
		for capability in capabilities.capabilities() {
			let record = Arc::clone(&record);
			let sinks = ProducerSinks {
				imports: imports_owner.sender(),
				methods: methods_owner.sender(),
			};
			producers.spawn(capability, async move { produce(generator(capability), &record, &sinks).await });
		}
		tracing::debug!(record = record.record_name(), producers = producers.len(), "codegen.coordinator.spawn");

		let joined = producers.join_all().await;
		imports_owner.close();
		methods_owner.close();
		let aggregated = aggregator.finish().await;

		let mut fragments = BTreeMap::new();
		let mut failure = None;
		for (capability, outcome) in joined? {
			match outcome {
				Ok(fragment) => {
					fragments.insert(capability, fragment);
				}
				Err(err) => {
					tracing::debug!(record = record.record_name(), capability = capability.as_str(), error = %err, "codegen.coordinator.producer_failed");
					failure.get_or_insert(err);
				}
			}
		}
		if let Some(err) = failure {
			tracing::warn!(record = record.record_name(), error = %err, "codegen.coordinator.failed");
			return Err(err);
		}

		let unit = Assembler::new(&record).render(&fragments, aggregated?)?;
		tracing::info!(record = record.record_name(), bytes = unit.as_bytes().len(), methods = unit.methods().len(), "codegen.coordinator.generated");
		Ok(unit)
	}

	/// Generates every request concurrently; results follow request order.
	///
	/// Records are independent: a failing record never affects another.
	pub async fn generate_batch(&self, requests: Vec<GenerationRequest>) -> Vec<Result<GeneratedUnit>> {
		let count = requests.len();
		let mut set = JoinSet::new();
		for (index, request) in requests.into_iter().enumerate() {
			let coordinator = *self;
			set.spawn(async move { (index, coordinator.generate(request.record, request.capabilities).await) });
		}

		let mut results: Vec<Option<Result<GeneratedUnit>>> = (0..count).map(|_| None).collect();
		while let Some(joined) = set.join_next().await {
			match joined {
				Ok((index, result)) => results[index] = Some(result),
				Err(err) => tracing::error!(error = %err, "codegen.coordinator.batch_join_failed"),
			}
		}

		results
			.into_iter()
			.map(|result| result.unwrap_or_else(|| Err(GenerateError::InternalAssembly("record generation task did not complete".to_string()))))
			.collect()
	}
}

/// Prerequisites of `capabilities` that can be checked without rendering.
fn validate(record: &RecordDescriptor, capabilities: CapabilitySet) -> Result<()> {
	let name = record.record_name();
	if capabilities.is_empty() {
		return Err(GenerateError::configuration(name, "no capabilities requested"));
	}
	if !ident::is_identifier(record.package()) {
		return Err(GenerateError::configuration(name, format!("package {:?} is not a valid identifier", record.package())));
	}
	if capabilities.has(Capability::Store) {
		validate_store_name(record)?;
	}

	if capabilities.capabilities().any(|c| c.is_record_scoped()) {
		if !ident::is_identifier(name) {
			return Err(GenerateError::configuration(name, format!("record name {name:?} is not a valid identifier")));
		}
		if !ident::is_sql_name(record.table_name()) {
			return Err(GenerateError::configuration(name, format!("table name {:?} is not a valid SQL name", record.table_name())));
		}
		for field in record.fields() {
			if !ident::is_identifier(field.name()) {
				return Err(GenerateError::configuration(name, format!("field name {:?} is not a valid identifier", field.name())));
			}
			if let Some(column) = field.column_override()
				&& !ident::is_sql_name(column)
			{
				return Err(GenerateError::configuration(name, format!("column {column:?} of field {} is not a valid SQL name", field.name())));
			}
		}
	}

	let store = store_names(record);
	if !name.is_empty() && (store.interface == name || store.backing == name) {
		return Err(GenerateError::configuration(name, format!("store type {:?} has the same name as the record", store.interface)));
	}

	let mut methods = BTreeSet::new();
	for capability in capabilities.capabilities() {
		for method in generator(capability).method_names(record) {
			if !methods.insert(method.clone()) {
				return Err(GenerateError::configuration(name, format!("method {method} would be generated twice")));
			}
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use recgen_record::FieldDescriptor;
	use rstest::rstest;

	use super::*;
	use crate::error::ErrorKind;

	fn author() -> RecordDescriptor {
		RecordDescriptor::builder("Author")
			.field(FieldDescriptor::new("ID", "int"))
			.field(FieldDescriptor::new("Name", "string"))
			.field(FieldDescriptor::new("UniversityID", "nullable-int"))
			.build()
			.unwrap()
	}

	#[rstest]
	#[case::empty_set(RecordDescriptor::builder("Author").build().unwrap(), CapabilitySet::empty())]
	#[case::empty_store(RecordDescriptor::builder("").store("").build().unwrap(), CapabilitySet::STORE)]
	#[case::record_scoped_without_record(RecordDescriptor::builder("").store("BookStore").build().unwrap(), CapabilitySet::DELETEABLE)]
	#[case::bad_table(RecordDescriptor::builder("Author").table("authors;").build().unwrap(), CapabilitySet::QUERYABLE)]
	#[case::bad_field(RecordDescriptor::builder("Author").field(FieldDescriptor::new("type", "int")).build().unwrap(), CapabilitySet::INSERTABLE)]
	#[case::bad_column(RecordDescriptor::builder("Author").field(FieldDescriptor::new("Name", "string").with_column("full name")).build().unwrap(), CapabilitySet::QUERYABLE)]
	#[case::bad_package(RecordDescriptor::builder("Author").package("my-models").build().unwrap(), CapabilitySet::STORE)]
	#[case::store_named_like_record(RecordDescriptor::builder("Author").store("Author").build().unwrap(), CapabilitySet::DELETEABLE)]
	#[case::backing_named_like_record(RecordDescriptor::builder("author").store("Author").build().unwrap(), CapabilitySet::STORE)]
	#[case::update_prefix_collides(
		RecordDescriptor::builder("Author")
			.update_prefix("Select")
			.field(FieldDescriptor::new("Name", "string"))
			.field(FieldDescriptor::new("Names", "string"))
			.build()
			.unwrap(),
		CapabilitySet::QUERYABLE | CapabilitySet::UPDATEABLE
	)]
	fn invalid_requests_fail_before_spawning(#[case] record: RecordDescriptor, #[case] capabilities: CapabilitySet) {
		assert_eq!(validate(&record, capabilities).unwrap_err().kind(), ErrorKind::Configuration);
	}

	#[test]
	fn store_only_request_needs_no_record_name() {
		let record = RecordDescriptor::builder("").store("BookStore").build().unwrap();
		assert!(validate(&record, CapabilitySet::STORE).is_ok());
	}

	#[rstest]
	#[case::empty("")]
	#[case::unexported("authorStore")]
	fn store_name_is_only_checked_for_the_store_capability(#[case] store: &str) {
		let record = RecordDescriptor::builder("Author").store(store).field(FieldDescriptor::new("ID", "int")).build().unwrap();
		assert!(validate(&record, CapabilitySet::DELETEABLE).is_ok());
		assert_eq!(validate(&record, CapabilitySet::STORE | CapabilitySet::DELETEABLE).unwrap_err().kind(), ErrorKind::Configuration);
	}

	#[tokio::test]
	async fn generates_every_requested_capability() {
		let unit = Coordinator::default().generate(Arc::new(author()), CapabilitySet::all()).await.unwrap();
		assert!(unit.text().contains("type AuthorStore interface {"));
		assert!(unit.methods().iter().any(|m| m == "DeleteAuthors"));
		assert!(unit.methods().iter().any(|m| m == "CreateAuthors"));
		assert!(unit.methods().iter().any(|m| m == "UpdateAuthorName"));
		assert!(unit.methods().windows(2).all(|w| w[0] < w[1]));
	}

	#[tokio::test]
	async fn earliest_failing_capability_wins() {
		let record = RecordDescriptor::builder("Author")
			.update_prefix("not valid")
			.field(FieldDescriptor::new("ID", "int"))
			.field(FieldDescriptor::new("Blob", "[]byte"))
			.build()
			.unwrap();
		let capabilities = CapabilitySet::QUERYABLE | CapabilitySet::UPDATEABLE | CapabilitySet::DELETEABLE;
		let err = Coordinator::default().generate(Arc::new(record), capabilities).await.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::UnsupportedType);
	}

	#[tokio::test]
	async fn capacity_of_one_still_drains() {
		let coordinator = Coordinator::new(CoordinatorConfig { sink_capacity: 1 });
		let unit = coordinator.generate(Arc::new(author()), CapabilitySet::all()).await.unwrap();
		assert_eq!(unit.imports(), &["database/sql", "fmt", "io", "os", "strings"]);
	}

	#[tokio::test]
	async fn batch_results_follow_request_order() {
		let broken = RecordDescriptor::builder("Book").field(FieldDescriptor::new("Cover", "image")).build().unwrap();
		let requests = vec![
			GenerationRequest::new(broken, CapabilitySet::QUERYABLE),
			GenerationRequest::new(author(), CapabilitySet::from(Capability::Deleteable)),
		];
		let results = Coordinator::default().generate_batch(requests).await;
		assert_eq!(results.len(), 2);
		assert_eq!(results[0].as_ref().unwrap_err().kind(), ErrorKind::UnsupportedType);
		assert_eq!(results[1].as_ref().unwrap().methods(), &["DeleteAuthors"]);
	}
}
