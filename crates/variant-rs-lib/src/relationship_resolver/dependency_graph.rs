//! The completed resolution as a graph, independent of the search that produced it.

use std::collections::BTreeMap;

use petgraph::prelude::*;
use serde::{Serialize, Deserialize};

use crate::catalog::*;
use crate::platform::PlatformTag;

use super::Requirement;

/// Outcome of a successful resolution.
///
/// A root node stands for the manifest, every other node holds the one variant chosen for a package.
/// Edges carry the constraint that created them so the override stays an attribute of the edge, not of the package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionGraph {
	graph: StableDiGraph<NodeData, EdgeData>,
	root: NodeIndex,
	index: BTreeMap<String, NodeIndex>,
	platform: PlatformTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeData {
	/// Control node giving the manifest a presence in the graph.
	Root,
	Package(ResolutionNode),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionNode {
	pub name: String,
	pub variant: Variant,
	/// The edge that first brought the package into the resolution.
	pub origin: NodeOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeOrigin {
	Requirement(Requirement),
	Dependency {
		from: VariantId,
		version: VariantVersionBounds,
	},
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeData {
	/// A top level requirement from the root node.
	Required {
		version: VariantVersionBounds,
		force_generic: bool,
	},
	/// A dependency declared by the source variant. It never forces a platform.
	Depends(VariantVersionBounds),
}

impl ResolutionGraph {
	pub(super) fn new(platform: PlatformTag) -> Self {
		let mut graph = StableDiGraph::<NodeData, EdgeData>::default();
		let root = graph.add_node(NodeData::Root);
		Self { graph, root, index: Default::default(), platform }
	}

	pub(super) fn add_package(&mut self, node: ResolutionNode) {
		let name = node.name.clone();
		let i = self.graph.add_node(NodeData::Package(node));
		self.index.insert(name, i);
	}

	pub(super) fn add_requirement_edge(&mut self, requirement: &Requirement) {
		if let Some(&target) = self.index.get(&requirement.name) {
			self.graph.add_edge(self.root, target, EdgeData::Required {
				version: requirement.version.clone(),
				force_generic: requirement.force_generic,
			});
		}
	}

	pub(super) fn add_dependency_edge(&mut self, from: &str, dependency: &Dependency) {
		if let (Some(&source), Some(&target)) = (self.index.get(from), self.index.get(&dependency.name)) {
			self.graph.add_edge(source, target, EdgeData::Depends(dependency.version.clone()));
		}
	}

	/// The platform the graph was resolved for.
	pub fn platform(&self) -> &PlatformTag {
		&self.platform
	}

	pub fn get(&self, name: &str) -> Option<&ResolutionNode> {
		self.index.get(name).and_then(|&i| self.node(i))
	}

	/// Shorthand for the variant chosen for `name`.
	pub fn variant(&self, name: &str) -> Option<&Variant> {
		self.get(name).map(|node| &node.variant)
	}

	/// Every resolved package ordered by name.
	pub fn nodes(&self) -> impl Iterator<Item = &ResolutionNode> {
		self.index.values().filter_map(|&i| self.node(i))
	}

	pub fn len(&self) -> usize {
		self.index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	/// Packages `name` directly depends on.
	pub fn dependencies_of(&self, name: &str) -> Vec<&ResolutionNode> {
		let Some(&i) = self.index.get(name) else { return Vec::new() };
		let mut deps: Vec<&ResolutionNode> = self.graph.edges_directed(i, Outgoing)
			.filter_map(|e| self.node(e.target()))
			.collect();
		deps.sort_by(|a, b| a.name.cmp(&b.name));
		deps.dedup_by(|a, b| a.name == b.name);
		deps
	}

	/// Every edge pointing at `name`, from the manifest and from the variants depending on it.
	pub fn requirements_on(&self, name: &str) -> Vec<&EdgeData> {
		let Some(&i) = self.index.get(name) else { return Vec::new() };
		self.graph.edges_directed(i, Incoming).map(|e| e.weight()).collect()
	}

	/// All resolved packages with every package placed after its dependencies.
	pub fn install_order(&self) -> Vec<&ResolutionNode> {
		/* Post order from the root visits dependencies before dependents, the root itself comes last */
		let mut dfs = petgraph::visit::DfsPostOrder::new(&self.graph, self.root);
		let mut order = Vec::with_capacity(self.len());
		while let Some(i) = dfs.next(&self.graph) {
			if let Some(node) = self.node(i) {
				order.push(node);
			}
		}
		order
	}

	/// Identifiers of the variants to be installed, in install order.
	pub fn get_new_packages(&self) -> Vec<VariantId> {
		self.install_order().into_iter().map(|node| node.variant.id()).collect()
	}

	fn node(&self, i: NodeIndex) -> Option<&ResolutionNode> {
		match self.graph.node_weight(i)? {
			NodeData::Package(node) => Some(node),
			NodeData::Root => None,
		}
	}

	fn edge_list(&self) -> Vec<(Option<&str>, &str, &EdgeData)> {
		let name = |i: NodeIndex| self.node(i).map(|n| n.name.as_str());
		self.graph.edge_indices()
			.filter_map(|e| {
				let (source, target) = self.graph.edge_endpoints(e)?;
				Some((name(source), name(target)?, &self.graph[e]))
			})
			.collect()
	}

	/// Both graphs hold the same edges, counting duplicates, in any order.
	fn same_edges(&self, other: &Self) -> bool {
		let ours = self.edge_list();
		let mut theirs = other.edge_list();
		ours.len() == theirs.len() && ours.into_iter().all(|edge| {
			match theirs.iter().position(|e| *e == edge) {
				Some(i) => { theirs.swap_remove(i); true },
				None => false,
			}
		})
	}
}

/* Node indices depend on insertion order so equality compares content */
impl PartialEq for ResolutionGraph {
	fn eq(&self, other: &Self) -> bool {
		self.platform == other.platform
			&& self.nodes().eq(other.nodes())
			&& self.same_edges(other)
	}
}

impl Eq for ResolutionGraph {}

#[cfg(test)]
mod test {
	use super::*;

	fn variant(name: &str) -> Variant {
		Variant::new(name, VariantVersion::new("1.0").unwrap(), PlatformTag::Generic)
	}

	/// manifest -> a -> b -> c, manifest -> c
	fn chain() -> ResolutionGraph {
		let a = variant("a").with_dependency(Dependency::any("b"));
		let b = variant("b").with_dependency(Dependency::any("c"));
		let c = variant("c");
		let mut graph = ResolutionGraph::new(PlatformTag::Generic);
		graph.add_package(ResolutionNode { name: "a".into(), variant: a.clone(), origin: NodeOrigin::Requirement(Requirement::any("a")) });
		graph.add_package(ResolutionNode { name: "b".into(), variant: b.clone(), origin: NodeOrigin::Dependency { from: a.id(), version: VersionBounds::Any } });
		graph.add_package(ResolutionNode { name: "c".into(), variant: c, origin: NodeOrigin::Requirement(Requirement::any("c")) });
		graph.add_requirement_edge(&Requirement::any("a"));
		graph.add_requirement_edge(&Requirement::any("c").force_generic(true));
		graph.add_dependency_edge("a", &Dependency::any("b"));
		graph.add_dependency_edge("b", &Dependency::any("c"));
		graph
	}

	#[test]
	fn install_order_puts_dependencies_first() {
		let graph = chain();
		let order: Vec<&str> = graph.install_order().into_iter().map(|n| n.name.as_str()).collect();
		assert_eq!(order, vec!["c", "b", "a"]);
	}

	#[test]
	fn dependencies_of_lists_direct_only() {
		let graph = chain();
		let deps: Vec<&str> = graph.dependencies_of("a").into_iter().map(|n| n.name.as_str()).collect();
		assert_eq!(deps, vec!["b"]);
		assert!(graph.dependencies_of("c").is_empty());
		assert!(graph.dependencies_of("missing").is_empty());
	}

	#[test]
	fn requirements_on_keeps_edge_override() {
		let graph = chain();
		let edges = graph.requirements_on("c");
		assert_eq!(edges.len(), 2);
		assert!(edges.contains(&&EdgeData::Required { version: VersionBounds::Any, force_generic: true }));
		assert!(edges.contains(&&EdgeData::Depends(VersionBounds::Any)));
	}

	#[test]
	fn root_is_not_a_package() {
		let graph = chain();
		assert_eq!(graph.len(), 3);
		assert_eq!(graph.nodes().count(), 3);
		assert_eq!(graph.get_new_packages().len(), 3);
	}

	#[test]
	fn equality_ignores_insertion_order() {
		let a = chain();
		let mut b = ResolutionGraph::new(PlatformTag::Generic);
		for node in a.nodes().collect::<Vec<_>>().into_iter().rev() {
			b.add_package(node.clone());
		}
		b.add_dependency_edge("b", &Dependency::any("c"));
		b.add_dependency_edge("a", &Dependency::any("b"));
		b.add_requirement_edge(&Requirement::any("c").force_generic(true));
		b.add_requirement_edge(&Requirement::any("a"));
		assert_eq!(a, b);
	}

	#[test]
	fn equality_with_repeated_requirements_ignores_order() {
		let loose = Requirement::any("c");
		let pinned = Requirement::new("c", VersionBounds::Explicit(VariantVersion::new("1.0").unwrap()));

		let mut a = chain();
		a.add_requirement_edge(&loose);
		a.add_requirement_edge(&pinned);
		let mut b = chain();
		b.add_requirement_edge(&pinned);
		b.add_requirement_edge(&loose);
		assert_eq!(a, b);

		let mut c = chain();
		c.add_requirement_edge(&pinned);
		c.add_requirement_edge(&pinned);
		assert_ne!(a, c);
	}

	#[test]
	fn serializes_to_json() {
		let graph = chain();
		let json = serde_json::to_string(&graph).unwrap();
		let back: ResolutionGraph = serde_json::from_str(&json).unwrap();
		assert_eq!(graph, back);
	}
}
