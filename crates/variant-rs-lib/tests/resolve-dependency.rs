use variant_rs::catalog::*;
use variant_rs::platform::PlatformTag;
use variant_rs::relationship_resolver::*;

fn init_log() {
	let _ = env_logger::builder().is_test(true).try_init();
}

fn version(s: &str) -> VariantVersion {
	VariantVersion::new(s).expect("failed to create version from string.")
}

fn generic(name: &str, v: &str) -> Variant {
	Variant::new(name, version(v), PlatformTag::Generic)
}

fn exactly(name: &str, v: &str) -> Dependency {
	Dependency::new(name, VersionBounds::Explicit(version(v)))
}

fn resolve(catalog: &MemoryCatalog, requirements: Vec<Requirement>) -> Result<ResolutionGraph, ResolutionFailure> {
	ResolverBuilder::new(catalog)
		.add_requirements(requirements)
		.platform(PlatformTag::Generic)
		.build()
		.resolve()
		.map(|finalized| finalized.get_graph())
}

fn names(nodes: Vec<&ResolutionNode>) -> Vec<&str> {
	nodes.into_iter().map(|n| n.name.as_str()).collect()
}

#[test]
fn resolve_dependency_chain() {
	init_log();
	let catalog: MemoryCatalog = [
		generic("app", "1.0").with_dependency(Dependency::any("lib")).with_dependency(Dependency::any("util")),
		generic("lib", "1.0").with_dependency(Dependency::any("util")),
		generic("util", "1.0"),
		generic("util", "1.1"),
	].into_iter().collect();

	let graph = resolve(&catalog, vec![Requirement::any("app")]).unwrap();

	assert_eq!(graph.len(), 3);
	assert_eq!(graph.variant("util").unwrap().version, version("1.1"));
	assert_eq!(names(graph.dependencies_of("app")), vec!["lib", "util"]);

	let order = names(graph.install_order());
	let position = |name| order.iter().position(|n| *n == name).unwrap();
	assert!(position("util") < position("lib"));
	assert!(position("lib") < position("app"));
}

#[test]
fn backtracking_repairs_version_conflict() {
	init_log();
	/* The newest app needs the newest lib, which the manifest rules out */
	let catalog: MemoryCatalog = [
		generic("app", "3.0").with_dependency(exactly("lib", "2.0")),
		generic("app", "2.0").with_dependency(exactly("lib", "2.0")),
		generic("app", "1.0").with_dependency(exactly("lib", "1.0")),
		generic("lib", "1.0"),
		generic("lib", "2.0"),
	].into_iter().collect();

	let graph = resolve(&catalog, vec![
		Requirement::any("app"),
		Requirement::new("lib", VersionBounds::MaxOnly(version("1.9"))),
	]).unwrap();

	assert_eq!(graph.variant("app").unwrap().version, version("1.0"));
	assert_eq!(graph.variant("lib").unwrap().version, version("1.0"));
}

#[test]
fn backtracking_around_missing_dependency() {
	init_log();
	let catalog: MemoryCatalog = [
		generic("app", "2.0").with_dependency(Dependency::any("gone")),
		generic("app", "1.0"),
	].into_iter().collect();

	let graph = resolve(&catalog, vec![Requirement::any("app")]).unwrap();
	assert_eq!(graph.variant("app").unwrap().version, version("1.0"));
	assert!(graph.get("gone").is_none());
}

#[test]
fn missing_transitive_dependency_fails() {
	init_log();
	let catalog: MemoryCatalog = [generic("app", "1.0").with_dependency(Dependency::any("gone"))].into_iter().collect();

	let failure = resolve(&catalog, vec![Requirement::any("app")]).unwrap_err();
	match &failure {
		ResolutionFailure::NoCompatibleVariant { package, constraints, reason, .. } => {
			assert_eq!(package, "gone");
			assert_eq!(reason, &SelectionError::PackageNotFound);
			assert_eq!(constraints[0].required_by, RequiredBy::Variant(generic("app", "1.0").id()));
		},
		other => panic!("unexpected failure {:?}", other),
	}
	assert_eq!(failure.involved_packages(), vec!["app", "gone"]);
}

#[test]
fn unknown_top_level_package_fails_without_search() {
	init_log();
	let catalog = MemoryCatalog::new();
	let mut resolver = ResolverBuilder::new(&catalog)
		.add_requirement(Requirement::any("nothing"))
		.platform(PlatformTag::Generic)
		.build();

	assert!(matches!(
		resolver.attempt_resolve(),
		ResolverStatus::Failed(ResolutionFailure::NoCompatibleVariant { reason: SelectionError::PackageNotFound, .. })
	));
	assert_eq!(resolver.attempts(), 0);
	assert!(resolver.finalize().is_err());
}

#[test]
fn irreconcilable_constraints_report_both_sides() {
	init_log();
	let catalog: MemoryCatalog = [
		generic("left", "1.0").with_dependency(exactly("shared", "1.0")),
		generic("right", "1.0").with_dependency(exactly("shared", "2.0")),
		generic("shared", "1.0"),
		generic("shared", "2.0"),
	].into_iter().collect();

	let failure = resolve(&catalog, vec![Requirement::any("left"), Requirement::any("right")]).unwrap_err();
	match &failure {
		ResolutionFailure::UnresolvedConflict { package, constraints } => {
			assert_eq!(package, "shared");
			let sources: Vec<_> = constraints.iter().map(|c| c.required_by.clone()).collect();
			assert_eq!(sources, vec![
				RequiredBy::Variant(generic("left", "1.0").id()),
				RequiredBy::Variant(generic("right", "1.0").id()),
			]);
		},
		other => panic!("unexpected failure {:?}", other),
	}
	assert_eq!(failure.involved_packages(), vec!["left", "right", "shared"]);

	let message = failure.to_string();
	assert!(message.contains("shared = 1.0 required by left 1.0 (generic)"));
	assert!(message.contains("shared = 2.0 required by right 1.0 (generic)"));
}

#[test]
fn dependency_cycle_is_rejected() {
	init_log();
	let catalog: MemoryCatalog = [
		generic("a", "1.0").with_dependency(Dependency::any("b")),
		generic("b", "1.0").with_dependency(Dependency::any("c")),
		generic("c", "1.0").with_dependency(Dependency::any("a")),
	].into_iter().collect();

	let failure = resolve(&catalog, vec![Requirement::any("a")]).unwrap_err();
	assert_eq!(failure, ResolutionFailure::CyclicDependency { cycle: vec!["c".into(), "a".into(), "b".into(), "c".into()] });
}

#[test]
fn attempt_limit_stops_long_search() {
	init_log();
	let catalog: MemoryCatalog = (1..=5)
		.map(|i| generic("app", &format!("{}.0", i)).with_dependency(exactly("lib", "9.0")))
		.chain(std::iter::once(generic("lib", "1.0")))
		.collect();

	let mut options = variant_rs::ResolverOptions::default();
	options.set_attempt_limit(3);
	let failure = ResolverBuilder::new(&catalog)
		.add_requirement(Requirement::any("app"))
		.platform(PlatformTag::Generic)
		.options(options)
		.build()
		.resolve()
		.unwrap_err();
	assert_eq!(failure, ResolutionFailure::AttemptLimitExceeded { limit: 3 });

	/* With the default limit the search runs out of candidates instead */
	let failure = resolve(&catalog, vec![Requirement::any("app")]).unwrap_err();
	assert!(matches!(failure, ResolutionFailure::NoCompatibleVariant { ref package, reason: SelectionError::NoCompatibleVersion, .. } if package == "lib"));
}

#[test]
fn identical_inputs_give_identical_graphs() {
	init_log();
	let catalog: MemoryCatalog = [
		generic("app", "1.0").with_dependency(Dependency::any("b")).with_dependency(Dependency::any("c")),
		generic("b", "1.0").with_dependency(Dependency::any("d")),
		generic("c", "1.0").with_dependency(Dependency::any("d")),
		generic("d", "1.0"),
		generic("d", "2.0"),
	].into_iter().collect();
	let requirements = vec![Requirement::any("app")];

	let first = resolve(&catalog, requirements.clone()).unwrap();
	let second = resolve(&catalog, requirements).unwrap();
	assert_eq!(first, second);
	assert_eq!(first.get_new_packages(), second.get_new_packages());
}
