use crate::platform::PlatformTag;

use super::variant::*;

pub struct VersionMatches<'a, I>
where
	I: Iterator<Item = &'a Variant>,
{
	bounds: VariantVersionBounds,
	underlying: I,
}

impl<'a, I> Iterator for VersionMatches<'a, I>
where
	I: Iterator<Item = &'a Variant>,
{
	type Item = I::Item;

	fn next(&mut self) -> Option<Self::Item> {
		self.underlying.by_ref().find(|variant| self.bounds.is_version_within(&variant.version))
	}
}

pub trait VersionMatchesExt<'a>: Iterator<Item = &'a Variant>
{
	/// Filters the iterator to variants matching the requirements of `bounds`
	fn version_matches(self, bounds: VariantVersionBounds) -> VersionMatches<'a, Self>
	where
		Self: Sized,
	{
		VersionMatches { underlying: self, bounds }
	}
}

impl<'a, I: Iterator<Item = &'a Variant>> VersionMatchesExt<'a> for I {}


pub struct PlatformMatches<'a, I>
where
	I: Iterator<Item = &'a Variant>,
{
	active: PlatformTag,
	force_generic: bool,
	underlying: I,
}

impl<'a, I> Iterator for PlatformMatches<'a, I>
where
	I: Iterator<Item = &'a Variant>,
{
	type Item = I::Item;

	fn next(&mut self) -> Option<Self::Item> {
		for variant in self.underlying.by_ref() {
			if self.force_generic {
				/* A forced requirement ignores the host entirely, even an exact match is rejected */
				if variant.platform.is_generic() {
					return Some(variant)
				}
			} else if variant.platform.is_usable_on(&self.active) {
				return Some(variant)
			}
		}
		None
	}
}

pub trait PlatformMatchesExt<'a>: Iterator<Item = &'a Variant>
{
	/// Filters the iterator to variants installable on `active`.
	///
	/// When `force_generic` is set only generic variants pass.
	fn platform_matches(self, active: PlatformTag, force_generic: bool) -> PlatformMatches<'a, Self>
	where
		Self: Sized,
	{
		PlatformMatches { underlying: self, active, force_generic }
	}
}

impl<'a, I: Iterator<Item = &'a Variant>> PlatformMatchesExt<'a> for I {}
