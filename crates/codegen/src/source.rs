//! Line-oriented builder for generated source text.

/// Accumulates tab-indented lines.
#[derive(Debug, Default)]
pub(crate) struct Lines {
	lines: Vec<String>,
	depth: usize,
}

impl Lines {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn line(&mut self, text: impl AsRef<str>) {
		let text = text.as_ref();
		if text.is_empty() {
			self.lines.push(String::new());
		} else {
			self.lines.push(format!("{}{text}", "\t".repeat(self.depth)));
		}
	}

	pub(crate) fn blank(&mut self) {
		self.lines.push(String::new());
	}

	/// Emits `text` and indents following lines.
	pub(crate) fn open(&mut self, text: impl AsRef<str>) {
		self.line(text);
		self.depth += 1;
	}

	/// Dedents and emits `text`.
	pub(crate) fn close(&mut self, text: impl AsRef<str>) {
		self.depth = self.depth.saturating_sub(1);
		self.line(text);
	}

	pub(crate) fn into_lines(self) -> Vec<String> {
		self.lines
	}

	/// Joins the lines, newline-terminated.
	pub(crate) fn render(self) -> String {
		let mut out = self.lines.join("\n");
		out.push('\n');
		out
	}
}

/// Interpreted string literal for `text`.
pub(crate) fn quote(text: &str) -> String {
	let mut out = String::with_capacity(text.len() + 2);
	out.push('"');
	for c in text.chars() {
		match c {
			'"' => out.push_str("\\\""),
			'\\' => out.push_str("\\\\"),
			'\n' => out.push_str("\\n"),
			'\t' => out.push_str("\\t"),
			other => out.push(other),
		}
	}
	out.push('"');
	out
}
