//! Picks the admissible variants of one package.

use crate::catalog::*;
use crate::catalog::iterator::*;
use crate::platform::PlatformTag;

/// Why no variant of a package could be selected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
	/// The catalog has no variant of the package at all.
	#[error("package not found in the catalog")]
	PackageNotFound,
	/// There are no variants within the version bounds.
	#[error("no version within the required bounds")]
	NoCompatibleVersion,
	/// Generic variants were forced but none is within the version bounds.
	#[error("no generic variant within the required bounds")]
	NoGenericVariant,
	/// Versions exist but none is generic or built for the active platform.
	#[error("no variant within the required bounds is installable on the active platform")]
	NoCompatiblePlatform,
}

/// Lists the admissible variants of `name`, best first.
///
/// Variants are ordered by version, highest first. Within a version a variant built for `platform` comes before
/// the generic one. With `force_generic` only generic variants are admissible.
pub fn select_variants(
	catalog: &dyn Catalog,
	name: &str,
	bounds: &VariantVersionBounds,
	force_generic: bool,
	platform: &PlatformTag,
) -> Result<Vec<Variant>, SelectionError> {
	let published = catalog.lookup(name);
	if published.is_empty() {
		return Err(SelectionError::PackageNotFound);
	}

	let within: Vec<&Variant> = published.iter().version_matches(bounds.clone()).collect();
	if within.is_empty() {
		return Err(SelectionError::NoCompatibleVersion);
	}

	let mut admissible: Vec<&Variant> = within.into_iter().platform_matches(platform.clone(), force_generic).collect();
	if admissible.is_empty() {
		return Err(if force_generic { SelectionError::NoGenericVariant } else { SelectionError::NoCompatiblePlatform });
	}

	/* Only host builds survive the platform filter, so generic last is the same as host first */
	admissible.sort_by(|a, b| {
		b.version.cmp(&a.version).then_with(|| a.platform.is_generic().cmp(&b.platform.is_generic()))
	});
	admissible.dedup_by(|a, b| a.version == b.version && a.platform == b.platform);

	log::debug!(
		"Selected {} candidate(s) for {} ({}{}) on {}",
		admissible.len(), name, bounds, if force_generic { ", generic forced" } else { "" }, platform
	);

	Ok(admissible.into_iter().cloned().collect())
}
