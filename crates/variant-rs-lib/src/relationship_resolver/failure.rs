use crate::catalog::*;
use crate::platform::PlatformTag;

use super::Requirement;
use super::SelectionError;

/// Who placed a constraint on a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequiredBy {
	/// A top level requirement.
	Manifest,
	/// A dependency declared by a tentatively selected variant.
	Variant(VariantId),
}

impl std::fmt::Display for RequiredBy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			RequiredBy::Manifest => write!(f, "manifest"),
			RequiredBy::Variant(id) => write!(f, "{}", id),
		}
	}
}

/// One requirement edge placed on a package during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
	pub package: String,
	pub required_by: RequiredBy,
	pub version: VariantVersionBounds,
	pub force_generic: bool,
}

impl Constraint {
	pub(super) fn from_requirement(requirement: &Requirement) -> Self {
		Constraint {
			package: requirement.name.clone(),
			required_by: RequiredBy::Manifest,
			version: requirement.version.clone(),
			force_generic: requirement.force_generic,
		}
	}

	pub fn is_satisfied_by(&self, variant: &Variant) -> bool {
		variant.name == self.package
			&& self.version.is_version_within(&variant.version)
			&& (!self.force_generic || variant.platform.is_generic())
	}

	/// Intersects the bounds of `constraints`, a package is forced generic if any of its own constraints forces it.
	///
	/// `None` when the bounds do not overlap.
	pub(super) fn combine<'a>(constraints: impl IntoIterator<Item = &'a Constraint>) -> Option<(VariantVersionBounds, bool)> {
		let mut bounds = VersionBounds::Any;
		let mut force_generic = false;
		for c in constraints {
			bounds = bounds.inner_join(&c.version)?;
			force_generic |= c.force_generic;
		}
		Some((bounds, force_generic))
	}
}

impl std::fmt::Display for Constraint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.package, self.version)?;
		if self.force_generic {
			write!(f, " (generic forced)")?;
		}
		write!(f, " required by {}", self.required_by)
	}
}

fn format_constraints(constraints: &[Constraint]) -> String {
	constraints.iter()
		.map(|c| c.to_string())
		.collect::<Vec<_>>()
		.join("\n  ")
}

/// These errors abort a resolution run, no partial result is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionFailure {
	/// A requirement admits no catalog entry on its own.
	#[error("no compatible variant of {package} for platform {platform}, {reason}:\n  {}", format_constraints(.constraints))]
	NoCompatibleVariant {
		package: String,
		platform: PlatformTag,
		constraints: Vec<Constraint>,
		reason: SelectionError,
	},
	/// Requirements on one package can not be satisfied together by any combination of candidates.
	#[error("conflicting requirements for {package}:\n  {}", format_constraints(.constraints))]
	UnresolvedConflict {
		package: String,
		constraints: Vec<Constraint>,
	},
	/// Selected variants depend on each other in a loop.
	#[error("cyclic dependency detected: {}", .cycle.join(" -> "))]
	CyclicDependency {
		cycle: Vec<String>,
	},
	/// The search was stopped before finding an answer.
	#[error("resolution abandoned after {limit} attempted assignments")]
	AttemptLimitExceeded {
		limit: usize,
	},
}

impl ResolutionFailure {
	/// Every package named by the diagnostic, sorted and without duplicates.
	pub fn involved_packages(&self) -> Vec<String> {
		let mut names: Vec<String> = match self {
			ResolutionFailure::NoCompatibleVariant { package, constraints, .. }
			| ResolutionFailure::UnresolvedConflict { package, constraints } => {
				std::iter::once(package.clone())
					.chain(constraints.iter().filter_map(|c| match &c.required_by {
						RequiredBy::Variant(id) => Some(id.name.clone()),
						RequiredBy::Manifest => None,
					}))
					.collect()
			},
			ResolutionFailure::CyclicDependency { cycle } => cycle.clone(),
			ResolutionFailure::AttemptLimitExceeded { .. } => Vec::new(),
		};
		names.sort();
		names.dedup();
		names
	}

	/// The constraints behind the failure, empty for failures not caused by constraints.
	pub fn constraints(&self) -> &[Constraint] {
		match self {
			ResolutionFailure::NoCompatibleVariant { constraints, .. }
			| ResolutionFailure::UnresolvedConflict { constraints, .. } => constraints,
			ResolutionFailure::CyclicDependency { .. }
			| ResolutionFailure::AttemptLimitExceeded { .. } => &[],
		}
	}
}
