use std::collections::BTreeSet;

use recgen_record::Capability;

/// One parameter of a generated method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
	pub name: String,
	pub ty: String,
}

impl Param {
	pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
		Self { name: name.into(), ty: ty.into() }
	}
}

/// A store method produced by one capability.
///
/// Rendered twice by the assembler: as an entry of the store interface and
/// as a method on the unexported store struct. Names are unique within one
/// record's output since each capability owns a disjoint name space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
	pub name: String,
	pub capability: Capability,
	pub doc: String,
	pub params: Vec<Param>,
	pub results: Vec<String>,
	/// Statements of the method body, one per line, without the outer indentation.
	pub body: Vec<String>,
	pub imports: BTreeSet<String>,
}

impl MethodDeclaration {
	pub fn new(capability: Capability, name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			capability,
			doc: String::new(),
			params: Vec::new(),
			results: Vec::new(),
			body: Vec::new(),
			imports: BTreeSet::new(),
		}
	}

	pub fn doc(mut self, doc: impl Into<String>) -> Self {
		self.doc = doc.into();
		self
	}

	pub fn param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
		self.params.push(Param::new(name, ty));
		self
	}

	pub fn results<I, S>(mut self, results: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.results = results.into_iter().map(Into::into).collect();
		self
	}

	pub fn body(mut self, body: Vec<String>) -> Self {
		self.body = body;
		self
	}

	pub fn imports<I, S>(mut self, imports: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.imports.extend(imports.into_iter().map(Into::into));
		self
	}

	/// `Name(a int, b string) (int64, error)`
	pub fn signature(&self) -> String {
		let params = self.params.iter().map(|p| format!("{} {}", p.name, p.ty)).collect::<Vec<_>>().join(", ");
		let results = match self.results.as_slice() {
			[] => String::new(),
			[single] => format!(" {single}"),
			many => format!(" ({})", many.join(", ")),
		};
		format!("{}({params}){results}", self.name)
	}
}
