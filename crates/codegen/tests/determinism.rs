mod common;

use std::sync::Arc;

use proptest::prelude::*;
use recgen_codegen::{Capability, CapabilitySet, Comparator, Coordinator, CoordinatorConfig, Dialect, FieldDescriptor, RecordDescriptor};

const TYPES: &[&str] = &["int", "int64", "string", "bool", "float64", "sql.NullInt64", "sql.NullString", "nullable-bool", "nullable-float"];
const COMPARATORS: &[Comparator] = &[Comparator::Eq, Comparator::Ne];
const CAPABILITIES: &[Capability] = &Capability::ALL;

fn field_strategy() -> impl Strategy<Value = (&'static str, Vec<Comparator>)> {
	(prop::sample::select(TYPES), prop::collection::vec(prop::sample::select(COMPARATORS), 0..3))
}

fn record_strategy() -> impl Strategy<Value = (RecordDescriptor, CapabilitySet)> {
	(
		"[A-Z][a-z]{2,8}",
		prop::bool::ANY,
		prop::collection::btree_map("[A-Z][a-z]{1,8}", field_strategy(), 0..6),
		prop::collection::vec(prop::sample::select(CAPABILITIES), 1..6),
	)
		.prop_map(|(name, postgres, fields, capabilities)| {
			let dialect = if postgres { Dialect::Postgres } else { Dialect::Generic };
			let mut builder = RecordDescriptor::builder(name).dialect(dialect).field(FieldDescriptor::new("ID", "int"));
			for (field_name, (ty, comparators)) in fields {
				if field_name == "ID" {
					continue;
				}
				let mut field = FieldDescriptor::new(field_name, ty);
				if !comparators.is_empty() {
					field = field.with_comparators(comparators);
				}
				builder = builder.field(field);
			}
			(builder.build().expect("unique field names"), capabilities.into_iter().collect())
		})
}

fn runtime() -> tokio::runtime::Runtime {
	tokio::runtime::Builder::new_multi_thread().worker_threads(4).enable_all().build().expect("runtime")
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(32))]

	#[test]
	fn identical_input_yields_identical_bytes((record, capabilities) in record_strategy(), capacity in 1usize..8) {
		let runtime = runtime();
		let record = Arc::new(record);
		let (first, second, roomy) = runtime.block_on(async {
			let tight = Coordinator::new(CoordinatorConfig { sink_capacity: capacity });
			let first = tight.generate(Arc::clone(&record), capabilities).await;
			let second = tight.generate(Arc::clone(&record), capabilities).await;
			let roomy = Coordinator::default().generate(Arc::clone(&record), capabilities).await;
			(first, second, roomy)
		});

		let first = first.expect("generation succeeds");
		let second = second.expect("generation succeeds");
		let roomy = roomy.expect("generation succeeds");
		prop_assert_eq!(first.as_bytes(), second.as_bytes());
		prop_assert_eq!(first.as_bytes(), roomy.as_bytes());
		common::assert_parses(first.text());
	}
}
