//! Platform identities used to decide which build of a package can be installed.
//!
//! A variant is either [`PlatformTag::Generic`], installable anywhere, or built for one
//! [`PlatformTag::Specific`] target and only installable when that target is the active platform.
//!
//! The active platform is always handed to the resolver explicitly. [`PlatformDetector`] is the seam
//! used to obtain it, [`HostPlatform`] reads the compile target while [`SimulatedPlatform`] lets tests
//! and the terminal pretend to be any host.

use serde::{Serialize, Deserialize};

/// Compatibility tag of a variant or of the active host.
///
/// Serialized as its identifier so stored tags go through the same parsing as user input.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PlatformTag {
	/// Platform independent build.
	#[default] Generic,
	/// Build for a single named target such as `java` or `x86_64-linux`.
	Specific(String),
}

impl PlatformTag {
	/// Creates a tag for a specific target.
	///
	/// # Errors
	/// Same as the [`FromStr`](std::str::FromStr) implementation, the generic aliases are rejected here.
	pub fn specific(id: impl AsRef<str>) -> crate::Result<Self> {
		match id.as_ref().parse::<Self>()? {
			PlatformTag::Generic => Err(crate::Error::Parse(format!("\"{}\" names the generic platform", id.as_ref()))),
			tag => Ok(tag),
		}
	}

	pub fn is_generic(&self) -> bool {
		matches!(self, PlatformTag::Generic)
	}

	/// Checks if a variant tagged `self` can be installed while `active` is the host platform.
	pub fn is_usable_on(&self, active: &PlatformTag) -> bool {
		match self {
			PlatformTag::Generic => true,
			PlatformTag::Specific(_) => self == active,
		}
	}
}

impl std::str::FromStr for PlatformTag {
	type Err = crate::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		use crate::Error::Parse;
		let s = s.trim().to_lowercase();
		if s.is_empty() {
			return Err(Parse("platform identifier is empty".into()))
		}
		if s == "generic" || s == "any" {
			return Ok(PlatformTag::Generic)
		}
		if let Some(c) = s.chars().find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))) {
			return Err(Parse(format!("invalid character '{}' in platform identifier \"{}\"", c, s)))
		}
		Ok(PlatformTag::Specific(s))
	}
}

impl TryFrom<String> for PlatformTag {
	type Error = crate::Error;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<PlatformTag> for String {
	fn from(value: PlatformTag) -> Self {
		value.to_string()
	}
}

impl TryFrom<&str> for PlatformTag {
	type Error = crate::Error;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl std::fmt::Display for PlatformTag {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			PlatformTag::Generic => write!(f, "generic"),
			PlatformTag::Specific(id) => write!(f, "{}", id),
		}
	}
}

/// Supplies the platform the current run should resolve for.
pub trait PlatformDetector {
	fn detect(&self) -> PlatformTag;
}

/// Detects the platform this binary was compiled for as `<arch>-<os>`, e.g. `x86_64-linux`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostPlatform;

impl PlatformDetector for HostPlatform {
	fn detect(&self) -> PlatformTag {
		let id = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);
		log::trace!("Detected host platform {}", id);
		PlatformTag::Specific(id)
	}
}

/// Always reports the same platform regardless of the real host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedPlatform(pub PlatformTag);

impl PlatformDetector for SimulatedPlatform {
	fn detect(&self) -> PlatformTag {
		self.0.clone()
	}
}

impl From<PlatformTag> for SimulatedPlatform {
	fn from(value: PlatformTag) -> Self {
		SimulatedPlatform(value)
	}
}
