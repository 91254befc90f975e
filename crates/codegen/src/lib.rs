//! Concurrent generation of typed data-access layers.
//!
//! A generation request pairs a [`RecordDescriptor`] with a set of
//! capabilities. The [`Coordinator`] validates the request, runs one
//! producer task per capability, and drains their imports and methods into
//! two bounded sinks while they run. Once every producer has finished the
//! sinks are closed and the [`Assembler`] renders a single source unit.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use recgen_codegen::{Coordinator, RecordDescriptor, CapabilitySet, FieldDescriptor};
//!
//! # async fn run() -> recgen_codegen::Result<()> {
//! let author = RecordDescriptor::builder("Author")
//! 	.field(FieldDescriptor::new("ID", "int"))
//! 	.field(FieldDescriptor::new("Name", "string"))
//! 	.build()?;
//! let unit = Coordinator::default().generate(Arc::new(author), CapabilitySet::all()).await?;
//! std::io::copy(&mut unit.reader(), &mut std::io::stdout()).ok();
//! # Ok(())
//! # }
//! ```
//!
//! Output is deterministic: imports are lexicographic, fragments follow
//! canonical capability order, and methods are sorted by name, so the
//! bytes never depend on task scheduling.

/// Draining of the import and method sinks.
pub mod aggregate;
/// Rendering and structural checks of the final unit.
pub mod assemble;
/// Per-capability generators and the producer task that publishes their output.
pub mod capability;
mod check;
mod coordinator;
mod error;
mod join_set;
mod method;
/// Bounded per-request sinks.
pub mod sink;
mod source;

pub use aggregate::{Aggregate, Aggregator, ImportSet};
pub use assemble::{Assembler, BANNER, GeneratedUnit};
pub use capability::{CapabilityGenerator, CapabilityOutput};
pub use coordinator::{Coordinator, CoordinatorConfig, GenerationRequest};
pub use error::{ErrorKind, GenerateError, Result};
pub use join_set::ProducerSet;
pub use method::{MethodDeclaration, Param};
pub use recgen_record::{Capability, CapabilitySet, Comparator, Dialect, FieldDescriptor, GeneratorConfig, RecordDescriptor};
pub use sink::{ImportSink, MethodSink, ProducerSinks, SinkClosed};
