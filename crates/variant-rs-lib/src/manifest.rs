//! The top level requirement set of a project.

use serde::{Serialize, Deserialize};

use crate::catalog::import::*;
use crate::relationship_resolver::Requirement;
use crate::Error::{Parse, Validation};

/// Requirements in declaration order, at most one per package.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
	requirements: Vec<Requirement>,
}

impl Manifest {
	pub fn new() -> Self {
		Self::default()
	}

	/// # Errors
	/// [`Validation`](crate::Error::Validation) if the package is already required.
	pub fn add_requirement(&mut self, requirement: Requirement) -> crate::Result<()> {
		if self.requirements.iter().any(|r| r.name == requirement.name) {
			return Err(Validation(format!("\"{}\" is required more than once", requirement.name)))
		}
		self.requirements.push(requirement);
		Ok(())
	}

	pub fn with_requirement(mut self, requirement: Requirement) -> crate::Result<Self> {
		self.add_requirement(requirement)?;
		Ok(self)
	}

	pub fn requirements(&self) -> &[Requirement] {
		&self.requirements
	}

	/// Reads a manifest document of the form `{"requirements": [ ... ]}`.
	///
	/// Each entry has a `name`, optional `version`/`min_version`/`max_version` and an optional `force_generic` flag.
	pub fn from_json(v: &serde_json::Value) -> crate::Result<Self> {
		let entries = v.get("requirements")
			.and_then(|v| v.as_array())
			.ok_or_else(|| Parse("manifest must contain a \"requirements\" array".to_string()))?;

		let mut manifest = Manifest::new();
		for (i, entry) in entries.iter().enumerate() {
			let requirement = requirement_from_json(entry).map_err(|e| Parse(format!("requirement {}: {}", i, e)))?;
			manifest.add_requirement(requirement)?;
		}
		Ok(manifest)
	}

	pub fn load_from_json_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let path = path.as_ref();
		log::debug!("Reading manifest from {}", path.display());
		let file = std::fs::File::open(path)?;
		let value: serde_json::Value = serde_json::from_reader(std::io::BufReader::new(file))?;
		Self::from_json(&value)
	}
}

fn requirement_from_json(v: &serde_json::Value) -> crate::Result<Requirement> {
	let obj = v.as_object().ok_or_else(|| Parse("requirement must be an object".to_string()))?;
	let force_generic = match obj.get("force_generic") {
		None | Some(serde_json::Value::Null) => false,
		Some(serde_json::Value::Bool(b)) => *b,
		Some(_) => return Err(Parse("\"force_generic\" must be a boolean".to_string())),
	};
	Ok(Requirement::new(get_required_string(obj, "name")?, get_version_bounds(obj)?).force_generic(force_generic))
}
