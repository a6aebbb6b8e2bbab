//! Utilities for getting a valid set of compatible variants to be installed from a list of requirements.
//!
//! # Usage
//! 1. Create a [`ResolverBuilder`]
//! 1. Use the builder to add requirements and choose the platform to resolve for.
//! 1. [`ResolverBuilder::build()`] to get a [`ResolverProcessor`]
//! 1. [`ResolverProcessor::attempt_resolve()`] until it reports [`ResolverStatus::Complete`] or [`ResolverStatus::Failed`].
//! 1. [`ResolverProcessor::finalize()`] to get a [`ResolverFinalized`] to query.
//! 1. [`ResolverFinalized::get_new_packages()`] to list all variants to be installed.
//!
//! # Platform overrides
//!
//! A [`Requirement`] with `force_generic` set only admits generic variants, even when a variant built for the active
//! platform exists. The flag belongs to the requirement it was declared on. Dependencies of the selected variant are
//! resolved by their own platform rule, so forcing one package never changes how its dependencies or siblings resolve.

use serde::{Serialize, Deserialize};

use crate::catalog::*;

mod variant_selector;
pub use variant_selector::select_variants;
pub use variant_selector::SelectionError;

mod expansion;

mod dependency_graph;
pub use dependency_graph::ResolutionGraph;
pub use dependency_graph::ResolutionNode;
pub use dependency_graph::NodeOrigin;
pub use dependency_graph::EdgeData;

mod failure;
pub use failure::ResolutionFailure;
pub use failure::Constraint;
pub use failure::RequiredBy;

mod resolver_builder;
pub use resolver_builder::ResolverBuilder;
mod processing_resolver;
pub use processing_resolver::ResolverProcessor;
pub use processing_resolver::ResolverStatus;
mod finalized_resolver;
pub use finalized_resolver::ResolverFinalized;

/// A requirement that can be given to the resolver to fulfill.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
	pub name: String,
	pub version: VariantVersionBounds,
	/// Only admit generic variants for this requirement.
	pub force_generic: bool,
}

impl Requirement {
	pub fn new(name: impl Into<String>, version: VariantVersionBounds) -> Self {
		Requirement { name: name.into(), version, force_generic: false }
	}

	/// A requirement for any version of `name`.
	pub fn any(name: impl Into<String>) -> Self {
		Self::new(name, VersionBounds::Any)
	}

	pub fn force_generic(mut self, force_generic: bool) -> Self {
		self.force_generic = force_generic;
		self
	}
}
