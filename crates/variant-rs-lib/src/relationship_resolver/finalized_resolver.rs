//! Read only access to a completed resolve.

use super::ResolutionGraph;
use crate::catalog::VariantId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverFinalized {
	graph: ResolutionGraph,
}

impl ResolverFinalized {
	pub(super) fn new(graph: ResolutionGraph) -> Self {
		Self { graph }
	}

	pub fn graph(&self) -> &ResolutionGraph {
		&self.graph
	}

	pub fn get_graph(self) -> ResolutionGraph {
		self.graph
	}

	/// Variants to install, dependencies first.
	pub fn get_new_packages(&self) -> Vec<VariantId> {
		self.graph.get_new_packages()
	}
}
