//! Record descriptors: the declarative input of access-layer generation.

/// Requested access patterns and their canonical order.
pub mod capability;
/// TOML generator configuration.
pub mod config;
mod descriptor;
/// Descriptor and configuration errors.
pub mod error;
mod field;
/// Identifier checks and naming conventions.
pub mod ident;
/// Semantic field types, comparators, and dialects.
pub mod types;

pub use capability::{Capability, CapabilitySet};
pub use config::{FieldConfig, GeneratorConfig, RecordConfig};
pub use descriptor::{DEFAULT_KEY_COLUMN, DEFAULT_PACKAGE, DEFAULT_UPDATE_PREFIX, RecordBuilder, RecordDescriptor};
pub use error::{RecordError, Result};
pub use field::FieldDescriptor;
pub use types::{Comparator, Dialect, Primitive, SemanticType};
