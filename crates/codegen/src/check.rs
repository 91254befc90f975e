//! Structural checks of a rendered unit against the Go grammar.

use std::collections::BTreeSet;

use tree_sitter::{Node, Parser};

use crate::error::{GenerateError, Result};

/// Parses `text` and fails when it has a syntax error or an import no code refers to.
pub(crate) fn check_unit<'a>(text: &str, imports: impl IntoIterator<Item = &'a String>) -> Result<()> {
	let mut parser = Parser::new();
	parser
		.set_language(&tree_sitter_go::LANGUAGE.into())
		.map_err(|err| GenerateError::InternalAssembly(format!("go grammar unavailable: {err}")))?;
	let tree = parser
		.parse(text, None)
		.ok_or_else(|| GenerateError::InternalAssembly("parser produced no tree".to_string()))?;

	let root = tree.root_node();
	if root.has_error() {
		let at = first_error(root).map_or(root.start_position(), |node| node.start_position());
		return Err(GenerateError::InternalAssembly(format!("syntax error at line {}, column {}", at.row + 1, at.column + 1)));
	}

	let referenced = package_references(root, text.as_bytes());
	for import in imports {
		let package = import.rsplit('/').next().unwrap_or(import);
		if !referenced.contains(package) {
			return Err(GenerateError::InternalAssembly(format!("import \"{import}\" is never referenced")));
		}
	}
	Ok(())
}

fn first_error(root: Node<'_>) -> Option<Node<'_>> {
	let mut cursor = root.walk();
	let mut stack = vec![root];
	while let Some(node) = stack.pop() {
		if node.is_error() || node.is_missing() {
			return Some(node);
		}
		// Reversed so siblings pop in source order.
		let children: Vec<_> = node.children(&mut cursor).collect();
		stack.extend(children.into_iter().rev());
	}
	None
}

/// Operands of `pkg.Name` selectors and qualified types (`sql.DB`).
fn package_references(root: Node<'_>, source: &[u8]) -> BTreeSet<String> {
	let mut packages = BTreeSet::new();
	let mut cursor = root.walk();
	let mut stack = vec![root];
	while let Some(node) = stack.pop() {
		let package = match node.kind() {
			"selector_expression" => node.child_by_field_name("operand").filter(|operand| operand.kind() == "identifier"),
			"qualified_type" => node.child_by_field_name("package"),
			_ => None,
		};
		if let Some(package) = package
			&& let Ok(name) = package.utf8_text(source)
		{
			packages.insert(name.to_string());
		}
		stack.extend(node.named_children(&mut cursor));
	}
	packages
}
