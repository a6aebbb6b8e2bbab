//! Expands the requirement set through the dependencies of the tentatively selected variants.
//!
//! The expansion is recomputed from the current partial assignment rather than updated in place,
//! so undoing an assignment while backtracking can never leave stale requirement edges behind.

use std::collections::HashMap;

use crate::catalog::*;

use super::Requirement;
use super::failure::*;

#[derive(Debug, Default)]
pub(super) struct Expansion {
	/// Package names in the order they were discovered.
	order: Vec<String>,
	constraints: HashMap<String, Vec<Constraint>>,
}

impl Expansion {
	/// # Parameters
	/// - `requirements`: the top level requirements, discovered first in their given order.
	/// - `assigned`: tentatively selected variants in the order they were selected.
	pub(super) fn new<'a>(requirements: &[Requirement], assigned: impl IntoIterator<Item = &'a Variant>) -> Self {
		let mut expansion = Self::default();

		for req in requirements {
			expansion.add(Constraint::from_requirement(req));
		}

		for variant in assigned {
			let id = variant.id();
			for dep in &variant.depends {
				/* Derived requirements never inherit the override of the requirement that selected `variant` */
				expansion.add(Constraint {
					package: dep.name.clone(),
					required_by: RequiredBy::Variant(id.clone()),
					version: dep.version.clone(),
					force_generic: false,
				});
			}
		}

		expansion
	}

	fn add(&mut self, constraint: Constraint) {
		if !self.constraints.contains_key(&constraint.package) {
			self.order.push(constraint.package.clone());
		}
		self.constraints.entry(constraint.package.clone()).or_default().push(constraint);
	}

	/// The first discovered package `is_assigned` says has no variant yet.
	pub(super) fn next_open(&self, is_assigned: impl Fn(&str) -> bool) -> Option<&str> {
		self.order.iter().map(String::as_str).find(|name| !is_assigned(name))
	}

	pub(super) fn constraints_for(&self, package: &str) -> &[Constraint] {
		self.constraints.get(package).map(Vec::as_slice).unwrap_or_default()
	}
}
