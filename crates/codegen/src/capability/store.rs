use recgen_record::{Capability, RecordDescriptor, ident};

use super::{CapabilityGenerator, CapabilityOutput, IO, OS, SQL};
use crate::error::{GenerateError, Result};
use crate::source::Lines;

/// Store scaffold: the constructor of the store interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreGenerator;

/// The store name must be an exported identifier so the interface and its
/// unexported backing struct get distinct names.
pub(crate) fn validate_store_name(record: &RecordDescriptor) -> Result<()> {
	let store = record.store_name();
	if !ident::is_identifier(store) {
		return Err(GenerateError::configuration(record.record_name(), format!("store name {store:?} is not a valid identifier")));
	}
	if !store.starts_with(|c: char| c.is_ascii_uppercase()) {
		return Err(GenerateError::configuration(record.record_name(), format!("store name {store:?} must be exported")));
	}
	Ok(())
}

/// Type names of the store interface and of the struct implementing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoreNames {
	pub interface: String,
	pub backing: String,
}

/// Store type names for `record`.
///
/// Uses `store_name` when it is a valid exported identifier. Requests
/// without the Store capability never validate it, so anything else falls
/// back to `<Record>Store`.
pub(crate) fn store_names(record: &RecordDescriptor) -> StoreNames {
	let interface = match validate_store_name(record) {
		Ok(()) => record.store_name().to_string(),
		Err(_) => ident::exported(&format!("{}Store", record.record_name())),
	};
	let backing = ident::unexported(&interface);
	StoreNames { interface, backing }
}

impl CapabilityGenerator for StoreGenerator {
	fn capability(&self) -> Capability {
		Capability::Store
	}

	fn render(&self, record: &RecordDescriptor) -> Result<CapabilityOutput> {
		validate_store_name(record)?;

		let StoreNames { interface: store, backing } = store_names(record);

		let mut lines = Lines::new();
		lines.line(format!("// New{store} returns a {store} backed by db. Executed statements are written"));
		lines.line("// to logger, or to standard output when logger is nil.");
		lines.open(format!("func New{store}(db *sql.DB, logger io.Writer) {store} {{"));
		lines.open("if logger == nil {");
		lines.line("logger = os.Stdout");
		lines.close("}");
		lines.blank();
		lines.line(format!("return &{backing}{{DB: db, Writer: logger}}"));
		lines.close("}");

		Ok(CapabilityOutput {
			fragment: lines.render(),
			imports: [SQL, IO, OS].into_iter().map(String::from).collect(),
			methods: Vec::new(),
		})
	}
}
