//! Various types associated with variants.

use serde::{Serialize, Deserialize};

use crate::platform::PlatformTag;

mod variant_version;
pub use variant_version::VariantVersion;

mod version_bounds;
pub use version_bounds::VersionBounds;
pub use version_bounds::VariantVersionBounds;

/// One platform tagged build of a specific package version.
///
/// Variants are immutable once catalogued. Two variants of the same package and version differ only in `platform`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
	pub name: String,
	pub version: VariantVersion,
	pub platform: PlatformTag,
	/// Direct dependencies in declaration order.
	pub depends: Vec<Dependency>,
}

impl Variant {
	pub fn new(name: impl Into<String>, version: VariantVersion, platform: PlatformTag) -> Self {
		Self {
			name: name.into(),
			version,
			platform,
			depends: Default::default(),
		}
	}

	/// Adds a dependency to the end of the declaration list.
	pub fn with_dependency(mut self, dependency: Dependency) -> Self {
		self.depends.push(dependency);
		self
	}

	pub fn id(&self) -> VariantId {
		VariantId {
			name: self.name.clone(),
			version: self.version.clone(),
			platform: self.platform.clone(),
		}
	}
}

/// A unique identifier for variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantId {
	pub name: String,
	pub version: VariantVersion,
	pub platform: PlatformTag,
}

impl std::fmt::Display for VariantId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {} ({})", self.name, self.version, self.platform)
	}
}

/// A dependency declared by a variant.
///
/// Unlike a [`Requirement`](crate::relationship_resolver::Requirement) it never carries a platform override,
/// a dependency is always resolved by the platform rule of whoever selects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
	pub name: String,
	pub version: VariantVersionBounds,
}

impl Dependency {
	pub fn new(name: impl Into<String>, version: VariantVersionBounds) -> Self {
		Self { name: name.into(), version }
	}

	pub fn any(name: impl Into<String>) -> Self {
		Self::new(name, VersionBounds::Any)
	}
}
