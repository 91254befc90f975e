#![allow(dead_code)]

use recgen_codegen::{FieldDescriptor, RecordDescriptor};
use tree_sitter::Parser;

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::TRACE).try_init();
}

/// Parses `source` with the Go grammar and panics with the first error node.
pub fn assert_parses(source: &str) {
	let mut parser = Parser::new();
	parser.set_language(&tree_sitter_go::LANGUAGE.into()).expect("go grammar");
	let tree = parser.parse(source, None).expect("parse");
	let root = tree.root_node();
	if root.has_error() {
		let mut cursor = root.walk();
		let mut stack = vec![root];
		while let Some(node) = stack.pop() {
			if node.is_error() || node.is_missing() {
				panic!("generated source does not parse at {:?}: {}\n{source}", node.start_position(), node.to_sexp());
			}
			stack.extend(node.children(&mut cursor));
		}
		panic!("generated source does not parse:\n{source}");
	}
}

/// `Author` stored in `authors` with a nullable foreign key.
pub fn author() -> RecordDescriptor {
	RecordDescriptor::builder("Author")
		.table("authors")
		.field(FieldDescriptor::new("ID", "int"))
		.field(FieldDescriptor::new("Name", "string"))
		.field(FieldDescriptor::new("UniversityID", "nullable-int"))
		.build()
		.expect("valid descriptor")
}

pub fn book_store() -> RecordDescriptor {
	RecordDescriptor::builder("").store("BookStore").build().expect("valid descriptor")
}
