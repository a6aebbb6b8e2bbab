//! Functions and methods for reading catalog types from JSON

use super::*;
use crate::platform::PlatformTag;
use crate::Error::Parse;

type JsonObject = serde_json::Map<String, serde_json::Value>;

pub(crate) fn get_string<'a>(obj: &'a JsonObject, key: &str) -> crate::Result<Option<&'a str>> {
	match obj.get(key) {
		None | Some(serde_json::Value::Null) => Ok(None),
		Some(v) => v.as_str().map(Some).ok_or_else(|| Parse(format!("\"{}\" must be a string", key))),
	}
}

pub(crate) fn get_required_string<'a>(obj: &'a JsonObject, key: &str) -> crate::Result<&'a str> {
	get_string(obj, key)?.ok_or_else(|| Parse(format!("missing required field \"{}\"", key)))
}

/// Reads the `version`, `min_version` and `max_version` fields of `obj`.
pub(crate) fn get_version_bounds(obj: &JsonObject) -> crate::Result<VariantVersionBounds> {
	VariantVersionBounds::new_from_str(
		get_string(obj, "version")?,
		get_string(obj, "min_version")?,
		get_string(obj, "max_version")?,
	)
}

impl Dependency {
	pub fn from_json(v: &serde_json::Value) -> crate::Result<Self> {
		let obj = v.as_object().ok_or_else(|| Parse("dependency must be an object".to_string()))?;
		Ok(Dependency {
			name: get_required_string(obj, "name")?.to_string(),
			version: get_version_bounds(obj)?,
		})
	}
}

impl Variant {
	pub fn from_json(v: &serde_json::Value) -> crate::Result<Self> {
		let obj = v.as_object().ok_or_else(|| Parse("variant must be an object".to_string()))?;

		let name = get_required_string(obj, "name")?;
		let version = VariantVersion::new(get_required_string(obj, "version")?)?;
		/* A variant without a platform is the generic build */
		let platform = match get_string(obj, "platform")? {
			Some(p) => p.parse::<PlatformTag>()?,
			None => PlatformTag::Generic,
		};

		let depends = match obj.get("depends") {
			None | Some(serde_json::Value::Null) => Vec::new(),
			Some(serde_json::Value::Array(arr)) => arr.iter().map(Dependency::from_json).collect::<crate::Result<Vec<_>>>()?,
			Some(_) => return Err(Parse(format!("\"depends\" of {} must be an array", name))),
		};

		Ok(Variant {
			name: name.to_string(),
			version,
			platform,
			depends,
		})
	}
}

impl MemoryCatalog {
	/// Imports a catalog document of the form `{"variants": [ ... ]}`.
	pub fn from_json(v: &serde_json::Value) -> crate::Result<Self> {
		let variants = v.get("variants")
			.and_then(|v| v.as_array())
			.ok_or_else(|| Parse("catalog must contain a \"variants\" array".to_string()))?;

		let mut catalog = MemoryCatalog::new();
		for (i, entry) in variants.iter().enumerate() {
			let variant = Variant::from_json(entry).map_err(|e| Parse(format!("catalog entry {}: {}", i, e)))?;
			catalog.add_variant(variant);
		}
		log::debug!("Imported {} variants of {} packages", catalog.len(), catalog.package_names().count());
		Ok(catalog)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn import_variant_with_dependencies() {
		let json = serde_json::json!({
			"name": "depends_on_platform_specific",
			"version": "1.0.0",
			"depends": [ { "name": "platform_specific", "min_version": "1.0" } ]
		});
		let variant = Variant::from_json(&json).unwrap();
		assert_eq!(variant.platform, PlatformTag::Generic);
		assert_eq!(variant.depends.len(), 1);
		assert!(matches!(variant.depends[0].version, VersionBounds::MinOnly(_)));
	}

	#[test]
	fn import_rejects_missing_version() {
		let json = serde_json::json!({ "name": "a", "platform": "java" });
		assert!(matches!(Variant::from_json(&json), Err(Parse(_))));
	}

	#[test]
	fn import_rejects_explicit_and_min() {
		let json = serde_json::json!({ "name": "a", "version": "1.0", "min_version": "1.0" });
		assert!(Dependency::from_json(&json).is_err());
	}

	#[test]
	fn import_catalog_document() {
		let json = serde_json::json!({ "variants": [
			{ "name": "a", "version": "1.0" },
			{ "name": "a", "version": "1.0", "platform": "java" },
			{ "name": "b", "version": "0.1", "platform": "windows-mingw" },
		]});
		let catalog = MemoryCatalog::from_json(&json).unwrap();
		assert_eq!(catalog.len(), 3);
		assert_eq!(catalog.lookup("a").len(), 2);
	}

	#[test]
	fn import_reports_entry_index() {
		let json = serde_json::json!({ "variants": [ { "name": "a", "version": "1.0" }, { "version": "1.0" } ] });
		match MemoryCatalog::from_json(&json) {
			Err(Parse(msg)) => assert!(msg.starts_with("catalog entry 1")),
			other => panic!("unexpected result {:?}", other),
		}
	}
}
