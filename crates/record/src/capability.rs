use std::fmt;

use bitflags::bitflags;
use serde::Deserialize;

/// Access patterns a record can have generated.
///
/// Declaration order is the canonical capability order used wherever output
/// must not depend on scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
	/// Store scaffold: backing struct and constructor.
	Store,
	/// Counting, finder, and column-select methods.
	Queryable,
	/// Multi-row insert.
	Insertable,
	/// Per-field update methods.
	Updateable,
	/// Delete by identifying column.
	Deleteable,
}

impl Capability {
	/// All capabilities in canonical order.
	pub const ALL: [Self; 5] = [Self::Store, Self::Queryable, Self::Insertable, Self::Updateable, Self::Deleteable];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Store => "store",
			Self::Queryable => "queryable",
			Self::Insertable => "insertable",
			Self::Updateable => "updateable",
			Self::Deleteable => "deleteable",
		}
	}

	pub const fn flag(self) -> CapabilitySet {
		match self {
			Self::Store => CapabilitySet::STORE,
			Self::Queryable => CapabilitySet::QUERYABLE,
			Self::Insertable => CapabilitySet::INSERTABLE,
			Self::Updateable => CapabilitySet::UPDATEABLE,
			Self::Deleteable => CapabilitySet::DELETEABLE,
		}
	}

	/// Whether generated methods are scoped to the record (need its name and table).
	pub const fn is_record_scoped(self) -> bool {
		!matches!(self, Self::Store)
	}
}

impl fmt::Display for Capability {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

bitflags! {
	/// Set of requested capabilities for one generation request.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct CapabilitySet: u8 {
		const STORE = 1;
		const QUERYABLE = 1 << 1;
		const INSERTABLE = 1 << 2;
		const UPDATEABLE = 1 << 3;
		const DELETEABLE = 1 << 4;
	}
}

impl CapabilitySet {
	/// Iterates the contained capabilities in canonical order.
	pub fn capabilities(self) -> impl Iterator<Item = Capability> {
		Capability::ALL.into_iter().filter(move |c| self.contains(c.flag()))
	}

	pub fn has(self, capability: Capability) -> bool {
		self.contains(capability.flag())
	}
}

impl From<Capability> for CapabilitySet {
	fn from(capability: Capability) -> Self {
		capability.flag()
	}
}

impl FromIterator<Capability> for CapabilitySet {
	fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
		iter.into_iter().fold(Self::empty(), |set, c| set | c.flag())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn iteration_is_canonical_regardless_of_insertion() {
		let set: CapabilitySet = [Capability::Deleteable, Capability::Store, Capability::Queryable].into_iter().collect();
		let order: Vec<_> = set.capabilities().collect();
		assert_eq!(order, vec![Capability::Store, Capability::Queryable, Capability::Deleteable]);
		assert!(set.has(Capability::Store));
		assert!(!set.has(Capability::Insertable));
	}

	#[test]
	fn only_store_is_not_record_scoped() {
		let scoped: Vec<_> = Capability::ALL.into_iter().filter(|c| !c.is_record_scoped()).collect();
		assert_eq!(scoped, vec![Capability::Store]);
	}
}
