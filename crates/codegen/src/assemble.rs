//! Final rendering of one generated unit.
//!
//! Layout, top to bottom:
//! 1. generated-code banner and package header
//! 2. import block, lexicographic
//! 3. store interface listing every method signature, sorted by name
//! 4. the struct implementing the store interface
//! 5. capability fragments in canonical capability order
//! 6. method implementations, sorted by name
//!
//! Sorting happens here, after aggregation, so the bytes never depend on
//! which producer finished first.

use std::collections::BTreeMap;
use std::io::Read;

use bytes::{Buf, Bytes};
use recgen_record::{Capability, RecordDescriptor};

use crate::aggregate::Aggregate;
use crate::capability::{IO, SQL, StoreNames, method_receiver, store_names};
use crate::check::check_unit;
use crate::error::Result;
use crate::source::Lines;

/// First line of every generated unit.
pub const BANNER: &str = "// Code generated by recgen. DO NOT EDIT.";

/// One rendered source unit.
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
	record: String,
	source: Bytes,
	imports: Vec<String>,
	methods: Vec<String>,
}

impl GeneratedUnit {
	/// Record the unit was generated for.
	pub fn record(&self) -> &str {
		&self.record
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.source
	}

	/// The source text.
	pub fn text(&self) -> &str {
		// Built from a `String` in `Assembler::render`.
		std::str::from_utf8(&self.source).unwrap_or_default()
	}

	/// Independent reader over the source; dropping it early has no side effects.
	pub fn reader(&self) -> impl Read + use<> {
		self.source.clone().reader()
	}

	pub fn into_bytes(self) -> Bytes {
		self.source
	}

	/// Imports of the unit, in rendered order.
	pub fn imports(&self) -> &[String] {
		&self.imports
	}

	/// Method names of the unit, in rendered order.
	pub fn methods(&self) -> &[String] {
		&self.methods
	}
}

/// Renders aggregated state into a [`GeneratedUnit`].
#[derive(Debug)]
pub struct Assembler<'a> {
	record: &'a RecordDescriptor,
}

impl<'a> Assembler<'a> {
	pub fn new(record: &'a RecordDescriptor) -> Self {
		Self { record }
	}

	/// Renders the unit. Only call once every producer has finished and both sinks are closed.
	pub fn render(&self, fragments: &BTreeMap<Capability, String>, mut aggregate: Aggregate) -> Result<GeneratedUnit> {
		// The store struct is declared whether or not the Store capability ran.
		aggregate.imports.extend([SQL, IO].map(String::from));

		let mut out = Lines::new();
		out.line(BANNER);
		out.blank();
		out.line(format!("package {}", self.record.package()));
		out.blank();
		out.open("import (");
		for import in &aggregate.imports {
			out.line(format!("\"{import}\""));
		}
		out.close(")");
		out.blank();

		let mut text = out.render();
		text.push_str(&self.body(fragments, &aggregate));
		check_unit(&text, &aggregate.imports)?;

		tracing::debug!(
			record = self.record.record_name(),
			bytes = text.len(),
			imports = aggregate.imports.len(),
			methods = aggregate.methods.len(),
			"codegen.assemble.rendered"
		);

		Ok(GeneratedUnit {
			record: self.record.record_name().to_string(),
			source: Bytes::from(text),
			imports: aggregate.imports.into_iter().collect(),
			methods: aggregate.methods.into_keys().collect(),
		})
	}

	fn body(&self, fragments: &BTreeMap<Capability, String>, aggregate: &Aggregate) -> String {
		let StoreNames { interface, backing } = store_names(self.record);
		let mut sections = Vec::new();

		let mut declaration = Lines::new();
		if self.record.record_name().is_empty() {
			declaration.line(format!("// {interface} is the generated record store."));
		} else {
			declaration.line(format!("// {interface} provides access to {} records stored in {}.", self.record.record_name(), self.record.table_name()));
		}
		if aggregate.methods.is_empty() {
			declaration.line(format!("type {interface} interface{{}}"));
		} else {
			declaration.open(format!("type {interface} interface {{"));
			for method in aggregate.methods.values() {
				declaration.line(method.signature());
			}
			declaration.close("}");
		}
		sections.push(declaration.render());

		let mut store = Lines::new();
		store.open(format!("type {backing} struct {{"));
		store.line("*sql.DB");
		store.line("io.Writer");
		store.close("}");
		sections.push(store.render());

		sections.extend(fragments.values().filter(|fragment| !fragment.is_empty()).cloned());

		let receiver = method_receiver(self.record);
		for method in aggregate.methods.values() {
			let mut lines = Lines::new();
			if !method.doc.is_empty() {
				lines.line(format!("// {}", method.doc));
			}
			lines.open(format!("func ({receiver}) {} {{", method.signature()));
			for statement in &method.body {
				lines.line(statement);
			}
			lines.close("}");
			sections.push(lines.render());
		}

		sections.join("\n")
	}
}
