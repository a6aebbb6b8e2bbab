use serde::{Serialize, Deserialize};
use try_map::FallibleMapExt;

/// A generic enum to describe a range of versions. All bounds are inclusive.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionBounds<T>
where T: std::cmp::PartialEq + std::cmp::Ord + std::clone::Clone,
{
	#[default] Any,
	Explicit(T),
	MinOnly(T),
	MaxOnly(T),
	MinMax(T, T),
}

impl<T> VersionBounds<T>
where T: std::cmp::PartialEq + std::cmp::Ord + std::clone::Clone,
{
	/// When all arguments are `None` will return `Any`
	///
	/// # Errors
	/// [`Parse`](crate::Error::Parse) when `explicit` is combined with a min or max,
	/// [`Validation`](crate::Error::Validation) when `min` is above `max`.
	pub fn new(explicit: Option<T>, min: Option<T>, max: Option<T>) -> crate::Result<VersionBounds<T>> {
		match (explicit, min, max) {
			(None, None, None) => Ok(VersionBounds::Any),
			(None, None, Some(max)) => Ok(VersionBounds::MaxOnly(max)),
			(None, Some(min), None) => Ok(VersionBounds::MinOnly(min)),
			(None, Some(min), Some(max)) => {
				if min > max {
					Err(crate::Error::Validation("minimum version is above the maximum version".to_string()))
				} else if min == max {
					Ok(VersionBounds::Explicit(min))
				} else {
					Ok(VersionBounds::MinMax(min, max))
				}
			},
			(Some(e), None, None) => Ok(VersionBounds::Explicit(e)),
			_ => Err(crate::Error::Parse("Attempted to create bounds with both explicit and min or max version constraint".to_string()))
		}
	}

	pub fn is_version_within(&self, other: &T) -> bool {
		match self {
			VersionBounds::Any => true,
			VersionBounds::Explicit(v) => other == v,
			VersionBounds::MinOnly(min) => other >= min,
			VersionBounds::MaxOnly(max) => other <= max,
			VersionBounds::MinMax(min, max) => min <= other && other <= max,
		}
	}

	fn min(&self) -> Option<&T> {
		match self {
			VersionBounds::Explicit(v) | VersionBounds::MinOnly(v) | VersionBounds::MinMax(v, _) => Some(v),
			VersionBounds::Any | VersionBounds::MaxOnly(_) => None,
		}
	}

	fn max(&self) -> Option<&T> {
		match self {
			VersionBounds::Explicit(v) | VersionBounds::MaxOnly(v) | VersionBounds::MinMax(_, v) => Some(v),
			VersionBounds::Any | VersionBounds::MinOnly(_) => None,
		}
	}

	/// Gets the intersection between the bounds, if no intersection exists returns `None`
	pub fn inner_join(&self, other: &Self) -> Option<Self> {
		let min = match (self.min(), other.min()) {
			(Some(a), Some(b)) => Some(std::cmp::max(a, b)),
			(a, b) => a.or(b),
		};
		let max = match (self.max(), other.max()) {
			(Some(a), Some(b)) => Some(std::cmp::min(a, b)),
			(a, b) => a.or(b),
		};

		match (min, max) {
			(Some(min), Some(max)) if min > max => None,
			(min, max) => VersionBounds::new(None, min.cloned(), max.cloned()).ok(),
		}
	}
}

impl<T> std::fmt::Display for VersionBounds<T>
where T: std::cmp::PartialEq + std::cmp::Ord + std::clone::Clone + std::fmt::Display,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			VersionBounds::Any => write!(f, "any version"),
			VersionBounds::Explicit(v) => write!(f, "= {}", v),
			VersionBounds::MinOnly(min) => write!(f, ">= {}", min),
			VersionBounds::MaxOnly(max) => write!(f, "<= {}", max),
			VersionBounds::MinMax(min, max) => write!(f, ">= {}, <= {}", min, max),
		}
	}
}

pub type VariantVersionBounds = VersionBounds<super::VariantVersion>;

impl VariantVersionBounds {
	/// Generate a new version bounds from version strings such as `"1.0.0"`
	///
	/// # Errors
	/// The errors of [`VariantVersion::new()`](super::VariantVersion::new) and [`VersionBounds::new()`].
	pub fn new_from_str(explicit: Option<impl AsRef<str>>, min: Option<impl AsRef<str>>, max: Option<impl AsRef<str>>) -> crate::Result<Self> {
		use super::VariantVersion;
		let explicit = explicit.try_map(|s| VariantVersion::new(s.as_ref()))?;
		let min = min.try_map(|s| VariantVersion::new(s.as_ref()))?;
		let max = max.try_map(|s| VariantVersion::new(s.as_ref()))?;
		VersionBounds::new(explicit, min, max)
	}
}
