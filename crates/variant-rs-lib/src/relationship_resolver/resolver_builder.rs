use super::ResolverProcessor;
use super::Requirement;
use crate::catalog::Catalog;
use crate::config::ResolverOptions;
use crate::manifest::Manifest;
use crate::platform::*;

pub struct ResolverBuilder<'c> {
	catalog: &'c dyn Catalog,
	platform: Option<PlatformTag>,
	options: ResolverOptions,

	requirements: Vec<Requirement>,
}

impl<'c> ResolverBuilder<'c> {
	pub fn new(catalog: &'c dyn Catalog) -> Self {
		Self {
			catalog,
			platform: None,
			options: Default::default(),
			requirements: Default::default(),
		}
	}

	pub fn add_requirements(mut self, requirements: impl IntoIterator<Item = Requirement>) -> Self {
		for requirement in requirements {
			self.requirements.push(requirement);
		}
		self
	}

	pub fn add_requirement(mut self, requirement: Requirement) -> Self {
		self.requirements.push(requirement);
		self
	}

	/// Adds every requirement of `manifest` in manifest order.
	pub fn manifest(self, manifest: &Manifest) -> Self {
		self.add_requirements(manifest.requirements().iter().cloned())
	}

	/// Resolve for `platform` instead of the detected host.
	pub fn platform(mut self, platform: PlatformTag) -> Self {
		self.platform = Some(platform);
		self
	}

	pub fn detect_platform(self, detector: &dyn PlatformDetector) -> Self {
		self.platform(detector.detect())
	}

	pub fn options(mut self, options: ResolverOptions) -> Self {
		self.options = options;
		self
	}

	/// The platform falls back to the one in the options, then to [`HostPlatform`].
	pub fn build(self) -> ResolverProcessor<'c> {
		let platform = self.platform
			.or_else(|| self.options.platform().cloned())
			.unwrap_or_else(|| HostPlatform.detect());
		log::debug!("Building resolver for platform {} with {} requirement(s)", platform, self.requirements.len());
		ResolverProcessor::new(self.catalog, self.requirements, platform, self.options)
	}
}
