//! Various helper functions for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use variant_rs::catalog::*;
use variant_rs::platform::PlatformTag;

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
	#[error("variant-rs error: {0}")]
	VariantRs(#[from] variant_rs::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
}

/// Identifiers of the platforms the fixture catalog publishes builds for.
pub const FIXTURE_PLATFORMS: [&str; 2] = ["java", "windows-mingw"];

/// The host identities every platform test runs under: generic, java and windows-mingw.
pub fn simulated_platforms() -> Result<Vec<PlatformTag>, FixtureError> {
	let mut platforms = vec![PlatformTag::Generic];
	for id in FIXTURE_PLATFORMS {
		platforms.push(PlatformTag::specific(id)?);
	}
	Ok(platforms)
}

/// Catalog document with platform tagged packages.
///
/// - `platform_specific` and `platform_specific_forced` publish 1.0.0 as generic, java and windows-mingw builds.
/// - `depends_on_platform_specific` 1.0.0 is generic and depends on any `platform_specific`.
pub fn platform_catalog_json() -> serde_json::Value {
	let mut variants = Vec::new();
	for name in ["platform_specific", "platform_specific_forced"] {
		variants.push(serde_json::json!({ "name": name, "version": "1.0.0" }));
		for platform in FIXTURE_PLATFORMS {
			variants.push(serde_json::json!({ "name": name, "version": "1.0.0", "platform": platform }));
		}
	}
	variants.push(serde_json::json!({
		"name": "depends_on_platform_specific",
		"version": "1.0.0",
		"depends": [ { "name": "platform_specific" } ],
	}));
	serde_json::json!({ "variants": variants })
}

/// [`platform_catalog_json`] imported into a [`MemoryCatalog`].
pub fn platform_catalog() -> Result<MemoryCatalog, FixtureError> {
	Ok(MemoryCatalog::from_json(&platform_catalog_json())?)
}

/// A temporary directory holding document files, removed when dropped.
pub struct FixtureDir {
	dir: tempfile::TempDir,
}

impl FixtureDir {
	pub fn new() -> Result<Self, FixtureError> {
		Ok(Self { dir: tempfile::tempdir()? })
	}

	pub fn path(&self) -> &std::path::Path {
		self.dir.path()
	}

	/// Writes `value` as `name` inside the directory and returns the full path.
	pub fn write_json(&self, name: &str, value: &serde_json::Value) -> Result<std::path::PathBuf, FixtureError> {
		let path = self.dir.path().join(name);
		std::fs::write(&path, serde_json::to_vec_pretty(value)?)?;
		Ok(path)
	}

	/// Writes raw text, for documents that are meant to be malformed.
	pub fn write_text(&self, name: &str, text: &str) -> Result<std::path::PathBuf, FixtureError> {
		let path = self.dir.path().join(name);
		std::fs::write(&path, text)?;
		Ok(path)
	}
}
