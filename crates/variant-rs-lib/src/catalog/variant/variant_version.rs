use serde::{Serialize, Deserialize};

/// The version of a published variant.
///
/// Versions are free form strings with an optional `EPOCH:` prefix. Comparison walks the string in runs,
/// non-numeric runs compare lexically and numeric runs compare as integers so that `1.2.4 < 1.2.10`.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VariantVersion {
	epoch: u32,
	version: String,
}

impl VariantVersion {
	/// # Errors
	/// [`Parse`](crate::Error::Parse) when the version is empty or the epoch prefix is not a number.
	pub fn new(version: &str) -> crate::Result<Self> {
		use crate::Error::Parse;
		let version = version.trim();
		let (epoch, version) = match version.split_once(':') {
			Some((epoch, rest)) => (
				epoch.parse::<u32>().map_err(|_| Parse(format!("epoch of version \"{}\" is not a number", version)))?,
				rest,
			),
			None => (0, version),
		};
		if version.is_empty() {
			return Err(Parse("version string is empty".into()))
		}
		Ok(VariantVersion { epoch, version: version.to_string() })
	}

	pub fn epoch(&self) -> u32 { self.epoch }
	pub fn as_str(&self) -> &str { &self.version }
}

/// Splits off the leading run of characters sharing `numeric`-ness.
fn split_run(s: &str, numeric: bool) -> (&str, &str) {
	let end = s.find(|c: char| c.is_ascii_digit() != numeric).unwrap_or(s.len());
	s.split_at(end)
}

fn compare_numeric_runs(lhs: &str, rhs: &str) -> std::cmp::Ordering {
	/* Leading zeros carry no weight, after stripping them the longer run is the larger number */
	let lhs = lhs.trim_start_matches('0');
	let rhs = rhs.trim_start_matches('0');
	lhs.len().cmp(&rhs.len()).then_with(|| lhs.cmp(rhs))
}

impl PartialEq for VariantVersion {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == std::cmp::Ordering::Equal
	}
}

impl Ord for VariantVersion {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		use std::cmp::Ordering;

		match self.epoch.cmp(&other.epoch) {
			Ordering::Equal => {},
			ord => return ord,
		}

		let mut lhs = self.version.as_str();
		let mut rhs = other.version.as_str();

		while !lhs.is_empty() && !rhs.is_empty() {
			let (l, lrest) = split_run(lhs, false);
			let (r, rrest) = split_run(rhs, false);
			match l.cmp(r) {
				Ordering::Equal => {},
				ord => return ord,
			}

			let (l, lrest) = split_run(lrest, true);
			let (r, rrest) = split_run(rrest, true);
			match compare_numeric_runs(l, r) {
				Ordering::Equal => {},
				ord => return ord,
			}

			lhs = lrest;
			rhs = rrest;
		}

		lhs.len().cmp(&rhs.len())
	}
}

impl PartialOrd for VariantVersion {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::hash::Hash for VariantVersion {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		/* Must agree with `Eq`, which ignores leading zeros in numeric runs */
		self.epoch.hash(state);
		let mut rest = self.version.as_str();
		while !rest.is_empty() {
			let (text, tail) = split_run(rest, false);
			let (number, tail) = split_run(tail, true);
			text.hash(state);
			number.trim_start_matches('0').hash(state);
			rest = tail;
		}
	}
}

impl TryFrom<String> for VariantVersion {
	type Error = crate::Error;
	fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(&value) }
}

impl TryFrom<&str> for VariantVersion {
	type Error = crate::Error;
	fn try_from(value: &str) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<VariantVersion> for String {
	fn from(value: VariantVersion) -> Self {
		value.to_string()
	}
}

impl std::fmt::Display for VariantVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.epoch == 0 {
			write!(f, "{}", self.version)
		} else {
			write!(f, "{}:{}", self.epoch, self.version)
		}
	}
}
