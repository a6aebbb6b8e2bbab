use serde::{Serialize, Deserialize};

use crate::platform::PlatformTag;

/// Default cap on tentative assignments made during one run.
pub const DEFAULT_ATTEMPT_LIMIT: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
	attempt_limit: usize,
	/// Overrides the detected host platform when set.
	platform: Option<PlatformTag>,
}

impl Default for ResolverOptions {
	fn default() -> Self {
		Self {
			attempt_limit: DEFAULT_ATTEMPT_LIMIT,
			platform: None,
		}
	}
}

impl ResolverOptions {
	/// Location of the config file, `variant-rs/config.json` inside the user's config directory.
	pub fn config_path() -> crate::Result<std::path::PathBuf> {
		#[cfg(target_os = "windows")]
		let path = std::env::var("APPDATA")
			.map(std::path::PathBuf::from)
			.map_err(|_| crate::Error::Validation("APPDATA environment variable not set.".into()))?;

		#[cfg(not(target_os = "windows"))]
		let path = if let Ok(e) = std::env::var("XDG_CONFIG_HOME") {
			std::path::PathBuf::from(e)
		} else {
			std::env::var("HOME")
				.map(|home| std::path::PathBuf::from(home).join(".config"))
				.map_err(|_| crate::Error::Validation("HOME environment variable not set.".into()))?
		};

		Ok(path.join("variant-rs").join("config.json"))
	}

	pub fn load_from_disk() -> crate::Result<Self> {
		Self::load_from_path(Self::config_path()?)
	}

	pub fn load_from_path(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let path = path.as_ref();
		log::debug!("Reading resolver options from {}", path.display());
		let file = std::fs::File::open(path)?;
		let options: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
		if options.attempt_limit == 0 {
			return Err(crate::Error::Validation("attempt_limit must be above zero".into()));
		}
		Ok(options)
	}

	pub fn save_to_disk(&self) -> crate::Result<()> {
		self.save_to_path(Self::config_path()?)
	}

	pub fn save_to_path(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
		let path = path.as_ref();
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, serde_json::to_vec_pretty(self)?)?;
		Ok(())
	}

	pub fn attempt_limit(&self) -> usize {
		self.attempt_limit
	}
	/// returns if the limit is valid or not.
	pub fn set_attempt_limit(&mut self, attempt_limit: usize) -> bool {
		if attempt_limit > 0 {
			self.attempt_limit = attempt_limit;
			true
		} else {
			false
		}
	}

	pub fn platform(&self) -> Option<&PlatformTag> {
		self.platform.as_ref()
	}
	pub fn set_platform(&mut self, platform: Option<PlatformTag>) {
		self.platform = platform;
	}
}
