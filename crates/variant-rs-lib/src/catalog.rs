//! # The variant catalog
//!
//! Everything the resolver knows about published packages comes through the [`Catalog`] trait.
//! Fetching and parsing a real package index is left to whoever implements it,
//! [`MemoryCatalog`] is the in-process implementation used by the terminal and the tests.
//!
//! A [`MemoryCatalog`] can be imported from a JSON document (see [`MemoryCatalog::from_json`])
//! and saved as a bincode snapshot to skip the import next time.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

pub mod variant;
pub use variant::*;

pub mod iterator;

pub(crate) mod import;

/// Source of variant records for a resolution run.
///
/// Implementations must return every published (version, platform) pair of `name`
/// and must not change their answer during a run.
pub trait Catalog {
	fn lookup(&self, name: &str) -> Vec<Variant>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
	fn lookup(&self, name: &str) -> Vec<Variant> {
		(**self).lookup(name)
	}
}

/// A catalog held entirely in memory.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryCatalog {
	variants: BTreeMap<String, Vec<Variant>>,
}

impl MemoryCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a variant, replacing an existing one with the same name, version and platform.
	pub fn add_variant(&mut self, variant: Variant) {
		let entry = self.variants.entry(variant.name.clone()).or_default();
		if let Some(existing) = entry.iter_mut().find(|v| v.version == variant.version && v.platform == variant.platform) {
			log::warn!("Replacing duplicate catalog entry {}", variant.id());
			*existing = variant;
		} else {
			entry.push(variant);
		}
	}

	pub fn with_variant(mut self, variant: Variant) -> Self {
		self.add_variant(variant);
		self
	}

	pub fn get_variants(&self) -> impl Iterator<Item = &Variant> {
		self.variants.values().flatten()
	}

	pub fn package_names(&self) -> impl Iterator<Item = &String> {
		self.variants.keys()
	}

	pub fn len(&self) -> usize {
		self.variants.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.variants.is_empty()
	}

	/// Writes the catalog as a bincode snapshot.
	pub fn save_snapshot(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
		let path = path.as_ref();
		log::debug!("Saving catalog snapshot to {}", path.display());
		let data = bincode::serialize(self)?;
		std::fs::write(path, data)?;
		Ok(())
	}

	/// Reads a snapshot written by [`MemoryCatalog::save_snapshot`].
	pub fn load_snapshot(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let path = path.as_ref();
		log::debug!("Loading catalog snapshot from {}", path.display());
		let data = std::fs::read(path)?;
		Ok(bincode::deserialize::<MemoryCatalog>(&data)?)
	}

	/// Reads a JSON catalog document from disk.
	pub fn load_from_json_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let file = std::fs::File::open(path)?;
		let value: serde_json::Value = serde_json::from_reader(std::io::BufReader::new(file))?;
		Self::from_json(&value)
	}
}

impl Catalog for MemoryCatalog {
	fn lookup(&self, name: &str) -> Vec<Variant> {
		self.variants.get(name).cloned().unwrap_or_default()
	}
}

impl FromIterator<Variant> for MemoryCatalog {
	fn from_iter<T: IntoIterator<Item = Variant>>(iter: T) -> Self {
		let mut catalog = MemoryCatalog::new();
		for variant in iter {
			catalog.add_variant(variant);
		}
		catalog
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::platform::PlatformTag;

	fn variant(name: &str, version: &str, platform: PlatformTag) -> Variant {
		Variant::new(name, VariantVersion::new(version).unwrap(), platform)
	}

	#[test]
	fn lookup_unknown_package_is_empty() {
		assert!(MemoryCatalog::new().lookup("missing").is_empty());
	}

	#[test]
	fn duplicate_entries_are_replaced() {
		let catalog: MemoryCatalog = [
			variant("a", "1.0", PlatformTag::Generic),
			variant("a", "1.0", PlatformTag::Generic).with_dependency(Dependency::any("b")),
			variant("a", "1.0", PlatformTag::specific("java").unwrap()),
		].into_iter().collect();

		assert_eq!(catalog.len(), 2);
		let generic = catalog.lookup("a").into_iter().find(|v| v.platform.is_generic()).unwrap();
		assert_eq!(generic.depends, vec![Dependency::any("b")]);
	}

	#[test]
	fn snapshot_reloads_equal_catalog() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("catalog.bin");
		let catalog: MemoryCatalog = [
			variant("a", "1.0", PlatformTag::Generic).with_dependency(Dependency::new("b", VersionBounds::MinOnly(VariantVersion::new("2").unwrap()))),
			variant("b", "2.1", PlatformTag::specific("java").unwrap()),
		].into_iter().collect();

		catalog.save_snapshot(&path).unwrap();
		assert_eq!(MemoryCatalog::load_snapshot(&path).unwrap(), catalog);
	}
}
