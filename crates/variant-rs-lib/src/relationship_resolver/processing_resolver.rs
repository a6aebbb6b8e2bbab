//! The backtracking search over variant candidates.

use std::collections::HashMap;

use super::*;
use super::expansion::Expansion;
use crate::config::ResolverOptions;
use crate::platform::PlatformTag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverStatus {
	/// The resolve has been successful, every required package has a variant compatible with all its requirements.
	Complete,
	/// The resolver is unable to continue, no combination of candidates satisfies the requirements.
	///
	/// The failure describes the last conflict found before the search ran out of options.
	Failed(ResolutionFailure),
}

/// A package with its ordered candidates and the one currently tried.
#[derive(Debug)]
struct DecisionFrame {
	package: String,
	/// Never empty, the selector fails instead of returning no candidates.
	candidates: Vec<Variant>,
	cursor: usize,
}

impl DecisionFrame {
	fn current(&self) -> &Variant {
		&self.candidates[self.cursor]
	}
}

/// Takes a list of top level requirements and finds one variant per required package.
///
/// # Usage
/// Create the processor with a [`ResolverBuilder`], then call [`ResolverProcessor::attempt_resolve`].
/// A run is depth first: each open package is given its best candidate, the partial assignment is checked,
/// and on a conflict the most recent decision moves on to its next candidate.
///
/// ## Failures
/// See [`ResolutionFailure`]. Every failure ends the run, there is no partial result.
pub struct ResolverProcessor<'c> {
	catalog: &'c dyn Catalog,
	requirements: Vec<Requirement>,
	platform: PlatformTag,
	options: ResolverOptions,

	stack: Vec<DecisionFrame>,
	/// Sorted assignments already known to have no valid completion.
	failed_states: HashMap<Vec<VariantId>, ResolutionFailure>,
	attempts: usize,

	status: Option<ResolverStatus>,
}

impl<'c> ResolverProcessor<'c> {
	pub(super) fn new(catalog: &'c dyn Catalog, requirements: Vec<Requirement>, platform: PlatformTag, options: ResolverOptions) -> Self {
		ResolverProcessor {
			catalog,
			requirements,
			platform,
			options,
			stack: Default::default(),
			failed_states: Default::default(),
			attempts: 0,
			status: None,
		}
	}

	/// Runs the search to completion.
	///
	/// The outcome is kept, calling this again returns the same status without searching again.
	pub fn attempt_resolve(&mut self) -> ResolverStatus {
		if let Some(status) = &self.status {
			return status.clone();
		}

		let status = match self.search() {
			Ok(()) => {
				log::info!("Resolved {} packages after {} attempts", self.stack.len(), self.attempts);
				ResolverStatus::Complete
			},
			Err(failure) => {
				log::debug!("Resolution failed after {} attempts: {}", self.attempts, failure);
				self.stack.clear();
				ResolverStatus::Failed(failure)
			},
		};
		self.status = Some(status.clone());
		status
	}

	/// Runs the search and hands back the result directly.
	pub fn resolve(mut self) -> Result<finalized_resolver::ResolverFinalized, ResolutionFailure> {
		match self.attempt_resolve() {
			ResolverStatus::Complete => Ok(finalized_resolver::ResolverFinalized::new(self.build_graph())),
			ResolverStatus::Failed(failure) => Err(failure),
		}
	}

	/// Finalize to get data about the completed resolve.
	///
	/// `Err` if the resolve is not complete.
	pub fn finalize(self) -> Result<finalized_resolver::ResolverFinalized, Box<Self>> {
		if matches!(self.status, Some(ResolverStatus::Complete)) {
			Ok(finalized_resolver::ResolverFinalized::new(self.build_graph()))
		} else {
			Err(Box::new(self))
		}
	}

	/// Number of tentative assignments made so far.
	pub fn attempts(&self) -> usize {
		self.attempts
	}

	pub fn platform(&self) -> &PlatformTag {
		&self.platform
	}

	pub fn requirements(&self) -> &[Requirement] {
		&self.requirements
	}

	fn search(&mut self) -> Result<(), ResolutionFailure> {
		log::debug!("Resolving {} requirement(s) for platform {}", self.requirements.len(), self.platform);
		self.check_requirements()?;

		loop {
			let expansion = Expansion::new(&self.requirements, self.assigned());
			let Some(package) = expansion.next_open(|name| self.is_assigned(name)) else {
				return Ok(())
			};

			let conflict = match self.open(&expansion, package) {
				Ok(frame) => {
					log::trace!("Trying {} for {}", frame.current().id(), frame.package);
					self.stack.push(frame);
					None
				},
				Err(failure) => Some(failure),
			};
			self.settle(conflict)?;
		}
	}

	/// A top level requirement that admits nothing on its own can never be satisfied, no search needed.
	fn check_requirements(&self) -> Result<(), ResolutionFailure> {
		for req in &self.requirements {
			if let Err(reason) = select_variants(self.catalog, &req.name, &req.version, req.force_generic, &self.platform) {
				return Err(ResolutionFailure::NoCompatibleVariant {
					package: req.name.clone(),
					platform: self.platform.clone(),
					constraints: vec![Constraint::from_requirement(req)],
					reason,
				})
			}
		}
		Ok(())
	}

	/// Builds the decision frame for an open package from every constraint currently placed on it.
	fn open(&self, expansion: &Expansion, package: &str) -> Result<DecisionFrame, ResolutionFailure> {
		let constraints = expansion.constraints_for(package);
		let Some((bounds, force_generic)) = Constraint::combine(constraints) else {
			return Err(ResolutionFailure::UnresolvedConflict { package: package.to_owned(), constraints: constraints.to_vec() })
		};

		match select_variants(self.catalog, package, &bounds, force_generic, &self.platform) {
			Ok(candidates) => Ok(DecisionFrame { package: package.to_owned(), candidates, cursor: 0 }),
			Err(reason) => Err(self.explain_selection_failure(package, constraints, reason)),
		}
	}

	/// Tells a constraint that is unsatisfiable by itself apart from constraints that only fail together.
	fn explain_selection_failure(&self, package: &str, constraints: &[Constraint], reason: SelectionError) -> ResolutionFailure {
		if constraints.len() > 1 {
			for c in constraints {
				if let Err(reason) = select_variants(self.catalog, package, &c.version, c.force_generic, &self.platform) {
					return ResolutionFailure::NoCompatibleVariant {
						package: package.to_owned(),
						platform: self.platform.clone(),
						constraints: vec![c.clone()],
						reason,
					}
				}
			}
			return ResolutionFailure::UnresolvedConflict { package: package.to_owned(), constraints: constraints.to_vec() }
		}

		ResolutionFailure::NoCompatibleVariant {
			package: package.to_owned(),
			platform: self.platform.clone(),
			constraints: constraints.to_vec(),
			reason,
		}
	}

	/// Moves the search to the next assignment that passes validation.
	///
	/// `conflict` is the reason the current assignment can't be completed, if there is one.
	fn settle(&mut self, mut conflict: Option<ResolutionFailure>) -> Result<(), ResolutionFailure> {
		loop {
			if let Some(failure) = conflict.take() {
				self.failed_states.insert(self.signature(), failure.clone());
				if !self.advance(&failure) {
					return Err(failure)
				}
			}

			self.attempts += 1;
			if self.attempts > self.options.attempt_limit() {
				return Err(ResolutionFailure::AttemptLimitExceeded { limit: self.options.attempt_limit() })
			}

			if let Some(known) = self.failed_states.get(&self.signature()) {
				log::trace!("Skipping an assignment already known to fail");
				conflict = Some(known.clone());
				continue;
			}

			self.detect_cycle()?;

			conflict = self.find_violation();
			if conflict.is_none() {
				return Ok(())
			}
		}
	}

	/// Moves the most recent decision to its next candidate, popping exhausted decisions.
	///
	/// Returns `false` when every decision is exhausted.
	fn advance(&mut self, failure: &ResolutionFailure) -> bool {
		while let Some(frame) = self.stack.last_mut() {
			frame.cursor += 1;
			if let Some(next) = frame.candidates.get(frame.cursor) {
				log::trace!("Backtracking {} to {}", frame.package, next.id());
				return true
			}

			log::trace!("Candidates for {} exhausted", frame.package);
			self.stack.pop();
			/* No candidate of the popped package works with what is left, so what is left fails too */
			self.failed_states.insert(self.signature(), failure.clone());
		}
		false
	}

	/// Checks every assigned variant against every constraint placed on its package by the current assignment.
	fn find_violation(&self) -> Option<ResolutionFailure> {
		let expansion = Expansion::new(&self.requirements, self.assigned());
		self.stack.iter().find_map(|frame| {
			let constraints = expansion.constraints_for(&frame.package);
			if constraints.iter().all(|c| c.is_satisfied_by(frame.current())) {
				None
			} else {
				Some(ResolutionFailure::UnresolvedConflict { package: frame.package.clone(), constraints: constraints.to_vec() })
			}
		})
	}

	/// Looks for a path from a dependency of the newest assignment back to its own package.
	///
	/// Every older assignment was checked when it was made so only the newest one can close a cycle.
	fn detect_cycle(&self) -> Result<(), ResolutionFailure> {
		let Some(newest) = self.stack.last().map(DecisionFrame::current) else { return Ok(()) };

		let mut graph = petgraph::graphmap::DiGraphMap::<&str, ()>::new();
		for variant in self.assigned() {
			graph.add_node(variant.name.as_str());
			for dep in variant.depends.iter().filter(|dep| self.is_assigned(&dep.name)) {
				graph.add_edge(variant.name.as_str(), dep.name.as_str(), ());
			}
		}

		for dep in &newest.depends {
			if dep.name == newest.name {
				return Err(ResolutionFailure::CyclicDependency { cycle: vec![newest.name.clone(), newest.name.clone()] })
			}
			if !graph.contains_node(dep.name.as_str()) {
				continue;
			}
			let path = petgraph::algo::all_simple_paths::<Vec<&str>, _>(&graph, dep.name.as_str(), newest.name.as_str(), 0, None).next();
			if let Some(path) = path {
				let cycle = std::iter::once(newest.name.clone())
					.chain(path.into_iter().map(str::to_owned))
					.collect();
				return Err(ResolutionFailure::CyclicDependency { cycle })
			}
		}
		Ok(())
	}

	fn assigned(&self) -> impl Iterator<Item = &Variant> {
		self.stack.iter().map(DecisionFrame::current)
	}

	fn is_assigned(&self, package: &str) -> bool {
		self.stack.iter().any(|frame| frame.package == package)
	}

	fn signature(&self) -> Vec<VariantId> {
		let mut ids: Vec<VariantId> = self.assigned().map(Variant::id).collect();
		ids.sort();
		ids
	}

	fn build_graph(&self) -> ResolutionGraph {
		let expansion = Expansion::new(&self.requirements, self.assigned());
		let mut graph = ResolutionGraph::new(self.platform.clone());

		for frame in &self.stack {
			/* Frames are pushed in discovery order so the first constraint is the one that discovered the package */
			let origin = match expansion.constraints_for(&frame.package).first() {
				Some(Constraint { required_by: RequiredBy::Variant(from), version, .. }) => {
					NodeOrigin::Dependency { from: from.clone(), version: version.clone() }
				},
				Some(Constraint { required_by: RequiredBy::Manifest, version, force_generic, .. }) => {
					NodeOrigin::Requirement(Requirement::new(frame.package.clone(), version.clone()).force_generic(*force_generic))
				},
				None => unreachable!("assigned package {} was never required", frame.package),
			};
			graph.add_package(ResolutionNode { name: frame.package.clone(), variant: frame.current().clone(), origin });
		}

		for req in &self.requirements {
			graph.add_requirement_edge(req);
		}
		for variant in self.assigned() {
			for dep in &variant.depends {
				graph.add_dependency_edge(&variant.name, dep);
			}
		}

		graph
	}
}

impl<'c> std::fmt::Debug for ResolverProcessor<'c> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ResolverProcessor")
			.field("requirements", &self.requirements)
			.field("platform", &self.platform)
			.field("options", &self.options)
			.field("stack", &self.stack)
			.field("attempts", &self.attempts)
			.field("status", &self.status)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn version(s: &str) -> VariantVersion { VariantVersion::new(s).unwrap() }
	fn generic(name: &str, v: &str) -> Variant { Variant::new(name, version(v), PlatformTag::Generic) }
	fn exactly(name: &str, v: &str) -> Dependency { Dependency::new(name, VersionBounds::Explicit(version(v))) }

	fn processor<'c>(catalog: &'c MemoryCatalog, requirements: Vec<Requirement>) -> ResolverProcessor<'c> {
		ResolverProcessor::new(catalog, requirements, PlatformTag::Generic, ResolverOptions::default())
	}

	#[test]
	fn single_package() {
		let catalog: MemoryCatalog = [generic("a", "1.0"), generic("a", "2.0")].into_iter().collect();
		let mut p = processor(&catalog, vec![Requirement::any("a")]);
		assert_eq!(p.attempt_resolve(), ResolverStatus::Complete);
		assert_eq!(p.attempts(), 1);
		let graph = p.finalize().unwrap().get_graph();
		assert_eq!(graph.variant("a").unwrap().version, version("2.0"));
	}

	#[test]
	fn status_is_kept_between_calls() {
		let catalog: MemoryCatalog = [generic("a", "1.0")].into_iter().collect();
		let mut p = processor(&catalog, vec![Requirement::any("a")]);
		p.attempt_resolve();
		let attempts = p.attempts();
		assert_eq!(p.attempt_resolve(), ResolverStatus::Complete);
		assert_eq!(p.attempts(), attempts);
	}

	#[test]
	fn finalize_before_resolving_is_refused() {
		let catalog = MemoryCatalog::new();
		assert!(processor(&catalog, vec![]).finalize().is_err());
	}

	#[test]
	fn empty_requirements_resolve_to_empty_graph() {
		let catalog = MemoryCatalog::new();
		let graph = processor(&catalog, vec![]).resolve().unwrap().get_graph();
		assert!(graph.is_empty());
	}

	#[test]
	fn backtracks_to_older_parent() {
		/* a 2.0 needs b 2.0 which conflicts with the manifest, a 1.0 needs b 1.0 */
		let catalog: MemoryCatalog = [
			generic("a", "2.0").with_dependency(exactly("b", "2.0")),
			generic("a", "1.0").with_dependency(exactly("b", "1.0")),
			generic("b", "1.0"),
			generic("b", "2.0"),
		].into_iter().collect();
		let requirements = vec![
			Requirement::any("a"),
			Requirement::new("b", VersionBounds::MaxOnly(version("1.5"))),
		];
		let graph = processor(&catalog, requirements).resolve().unwrap().get_graph();
		assert_eq!(graph.variant("a").unwrap().version, version("1.0"));
		assert_eq!(graph.variant("b").unwrap().version, version("1.0"));
	}

	#[test]
	fn self_dependency_is_a_cycle() {
		let catalog: MemoryCatalog = [generic("a", "1.0").with_dependency(Dependency::any("a"))].into_iter().collect();
		let failure = processor(&catalog, vec![Requirement::any("a")]).resolve().unwrap_err();
		assert_eq!(failure, ResolutionFailure::CyclicDependency { cycle: vec!["a".into(), "a".into()] });
	}

	#[test]
	fn attempt_limit_is_enforced() {
		let catalog: MemoryCatalog = [generic("a", "1.0").with_dependency(Dependency::any("b")), generic("b", "1.0")].into_iter().collect();
		let mut options = ResolverOptions::default();
		options.set_attempt_limit(1);
		let failure = ResolverProcessor::new(&catalog, vec![Requirement::any("a")], PlatformTag::Generic, options)
			.resolve()
			.unwrap_err();
		assert_eq!(failure, ResolutionFailure::AttemptLimitExceeded { limit: 1 });
	}

	#[test]
	fn conflicting_manifest_entries_on_one_package() {
		let catalog: MemoryCatalog = [generic("a", "1.0"), generic("a", "2.0")].into_iter().collect();
		let requirements = vec![
			Requirement::new("a", VersionBounds::Explicit(version("1.0"))),
			Requirement::new("a", VersionBounds::Explicit(version("2.0"))),
		];
		let failure = processor(&catalog, requirements).resolve().unwrap_err();
		assert!(matches!(failure, ResolutionFailure::UnresolvedConflict { ref package, ref constraints } if package == "a" && constraints.len() == 2));
	}
}
