//! Continuous draining of the import and method sinks.

use std::collections::{BTreeMap, BTreeSet};

use tokio::task::JoinHandle;

use crate::error::{GenerateError, Result};
use crate::method::MethodDeclaration;
use crate::sink::SinkReceiver;

/// Deduplicated import paths; iteration is lexicographic.
pub type ImportSet = BTreeSet<String>;

/// Aggregated state of one generation request.
#[derive(Debug, Default)]
pub struct Aggregate {
	pub imports: ImportSet,
	/// Methods keyed by name.
	pub methods: BTreeMap<String, MethodDeclaration>,
}

#[derive(Debug, Default)]
struct MethodCollection {
	methods: BTreeMap<String, MethodDeclaration>,
	collisions: Vec<String>,
}

/// Handles to the two draining tasks.
#[derive(Debug)]
pub struct Aggregator {
	imports: JoinHandle<ImportSet>,
	methods: JoinHandle<MethodCollection>,
}

impl Aggregator {
	/// Starts draining both sinks on the current runtime.
	pub fn spawn(mut imports: SinkReceiver<String>, mut methods: SinkReceiver<MethodDeclaration>) -> Self {
		let imports = tokio::spawn(async move {
			let mut set = ImportSet::new();
			while let Some(import) = imports.recv().await {
				set.insert(import);
			}
			tracing::trace!(sink = imports.name(), imports = set.len(), "codegen.aggregate.drained");
			set
		});

		let methods = tokio::spawn(async move {
			let mut collection = MethodCollection::default();
			while let Some(method) = methods.recv().await {
				let name = method.name.clone();
				if collection.methods.insert(name.clone(), method).is_some() {
					tracing::warn!(method = %name, "codegen.aggregate.collision");
					collection.collisions.push(name);
				}
			}
			tracing::trace!(sink = methods.name(), methods = collection.methods.len(), "codegen.aggregate.drained");
			collection
		});

		Self { imports, methods }
	}

	/// Waits for both drains to end. Only returns once both sinks are closed.
	///
	/// A method name published twice is a defect: the last write is kept in
	/// the collection and the request fails with an internal assembly error.
	pub async fn finish(self) -> Result<Aggregate> {
		let imports = self.imports.await.map_err(|err| GenerateError::InternalAssembly(format!("import aggregation failed: {err}")))?;
		let collection = self.methods.await.map_err(|err| GenerateError::InternalAssembly(format!("method aggregation failed: {err}")))?;

		if let Some(name) = collection.collisions.first() {
			return Err(GenerateError::InternalAssembly(format!("method `{name}` was declared more than once")));
		}

		Ok(Aggregate {
			imports,
			methods: collection.methods,
		})
	}
}

#[cfg(test)]
mod tests {
	use recgen_record::Capability;

	use super::*;
	use crate::sink;

	#[tokio::test]
	async fn deduplicates_imports_across_producers() {
		let (imports_owner, imports_rx) = sink::channel("imports", 1);
		let (methods_owner, methods_rx) = sink::channel("methods", 1);
		let aggregator = Aggregator::spawn(imports_rx, methods_rx);

		let mut producers = Vec::new();
		for import in ["fmt", "database/sql", "fmt", "strings", "database/sql"] {
			let tx = imports_owner.sender();
			producers.push(tokio::spawn(async move { tx.send(import.to_string()).await }));
		}
		for producer in producers {
			producer.await.unwrap().unwrap();
		}
		imports_owner.close();
		methods_owner.close();

		let aggregate = aggregator.finish().await.unwrap();
		assert_eq!(aggregate.imports.into_iter().collect::<Vec<_>>(), vec!["database/sql", "fmt", "strings"]);
		assert!(aggregate.methods.is_empty());
	}

	#[tokio::test]
	async fn duplicate_method_is_an_internal_error() {
		let (imports_owner, imports_rx) = sink::channel("imports", 1);
		let (methods_owner, methods_rx) = sink::channel("methods", 1);
		let aggregator = Aggregator::spawn(imports_rx, methods_rx);

		let tx = methods_owner.sender();
		tx.send(MethodDeclaration::new(Capability::Queryable, "FindAuthors")).await.unwrap();
		tx.send(MethodDeclaration::new(Capability::Updateable, "FindAuthors")).await.unwrap();
		drop(tx);
		imports_owner.close();
		methods_owner.close();

		let err = aggregator.finish().await.unwrap_err();
		assert!(err.to_string().contains("FindAuthors"));
	}
}
