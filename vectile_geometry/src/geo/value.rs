use std::{
	cmp::Ordering,
	fmt::{Debug, Display},
	hash::Hash,
};

/// A typed property value, as stored in a vector tile's value dictionary.
#[derive(Clone, PartialEq)]
pub enum GeoValue {
	Bool(bool),
	Double(f64),
	Float(f32),
	Int(i64),
	Null,
	String(String),
	UInt(u64),
}

impl Debug for GeoValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::String(v) => f.debug_tuple("String").field(v).finish(),
			Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
			Self::Double(v) => f.debug_tuple("Double").field(v).finish(),
			Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
			Self::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
			Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
			Self::Null => f.debug_tuple("Null").finish(),
		}
	}
}

impl From<&str> for GeoValue {
	fn from(value: &str) -> Self {
		GeoValue::String(value.to_string())
	}
}

impl From<String> for GeoValue {
	fn from(value: String) -> Self {
		GeoValue::String(value)
	}
}

/// Non-negative values become `UInt`, negative ones `Int`.
impl From<i32> for GeoValue {
	fn from(value: i32) -> Self {
		if value < 0 {
			GeoValue::Int(i64::from(value))
		} else {
			GeoValue::UInt(value as u64)
		}
	}
}

impl From<u32> for GeoValue {
	fn from(value: u32) -> Self {
		GeoValue::UInt(u64::from(value))
	}
}

impl From<i64> for GeoValue {
	fn from(value: i64) -> Self {
		GeoValue::Int(value)
	}
}

impl From<u64> for GeoValue {
	fn from(value: u64) -> Self {
		GeoValue::UInt(value)
	}
}

impl From<f32> for GeoValue {
	fn from(value: f32) -> Self {
		GeoValue::Float(value)
	}
}

impl From<f64> for GeoValue {
	fn from(value: f64) -> Self {
		GeoValue::Double(value)
	}
}

impl From<bool> for GeoValue {
	fn from(value: bool) -> Self {
		GeoValue::Bool(value)
	}
}

impl Eq for GeoValue {}

impl Hash for GeoValue {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		core::mem::discriminant(self).hash(state);
		match self {
			GeoValue::Bool(v) => v.hash(state),
			GeoValue::Double(v) => v.to_bits().hash(state),
			GeoValue::Float(v) => v.to_bits().hash(state),
			GeoValue::Int(v) => v.hash(state),
			GeoValue::Null => (),
			GeoValue::String(v) => v.hash(state),
			GeoValue::UInt(v) => v.hash(state),
		}
	}
}

impl PartialOrd for GeoValue {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for GeoValue {
	fn cmp(&self, other: &Self) -> Ordering {
		use GeoValue::*;
		match (self, other) {
			(String(a), String(b)) => a.cmp(b),
			(Float(a), Float(b)) => a.total_cmp(b),
			(Double(a), Double(b)) => a.total_cmp(b),
			(Int(a), Int(b)) => a.cmp(b),
			(UInt(a), UInt(b)) => a.cmp(b),
			(Bool(a), Bool(b)) => a.cmp(b),
			_ => self.variant_order().cmp(&other.variant_order()),
		}
	}
}

impl Display for GeoValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			GeoValue::Bool(v) => write!(f, "{v}"),
			GeoValue::Double(v) => write!(f, "{v}"),
			GeoValue::Float(v) => write!(f, "{v}"),
			GeoValue::Int(v) => write!(f, "{v}"),
			GeoValue::Null => write!(f, "null"),
			GeoValue::String(v) => write!(f, "{v}"),
			GeoValue::UInt(v) => write!(f, "{v}"),
		}
	}
}

impl GeoValue {
	fn variant_order(&self) -> u8 {
		match self {
			GeoValue::String(_) => 0,
			GeoValue::Float(_) => 1,
			GeoValue::Double(_) => 2,
			GeoValue::Int(_) => 3,
			GeoValue::UInt(_) => 4,
			GeoValue::Bool(_) => 5,
			GeoValue::Null => 6,
		}
	}

	/// Returns the value as `f64` if it is numeric.
	#[must_use]
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			GeoValue::Double(v) => Some(*v),
			GeoValue::Float(v) => Some(f64::from(*v)),
			GeoValue::Int(v) => Some(*v as f64),
			GeoValue::UInt(v) => Some(*v as f64),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_str(&self) -> Option<&str> {
		match self {
			GeoValue::String(v) => Some(v),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ordering_within_variant() {
		assert!(GeoValue::from("a") < GeoValue::from("b"));
		assert!(GeoValue::from(1.0f32) < GeoValue::from(2.0f32));
		assert!(GeoValue::from(1.0f64) < GeoValue::from(2.0f64));
		assert!(GeoValue::from(-2i64) < GeoValue::from(-1i64));
		assert!(GeoValue::from(1u64) < GeoValue::from(2u64));
		assert!(GeoValue::from(false) < GeoValue::from(true));
	}

	#[test]
	fn ordering_between_variants() {
		assert!(GeoValue::from("a") < GeoValue::from(1.0f32));
		assert!(GeoValue::from(1.0f32) < GeoValue::from(1.0f64));
		assert!(GeoValue::from(1.0f64) < GeoValue::from(-1));
		assert!(GeoValue::from(1u64) < GeoValue::from(false));
		assert!(GeoValue::from(false) < GeoValue::Null);
	}

	#[test]
	fn from_i32_picks_signedness() {
		assert_eq!(GeoValue::from(5), GeoValue::UInt(5));
		assert_eq!(GeoValue::from(-5), GeoValue::Int(-5));
	}

	#[test]
	fn display() {
		assert_eq!(GeoValue::from("primary").to_string(), "primary");
		assert_eq!(GeoValue::from(1.5f64).to_string(), "1.5");
		assert_eq!(GeoValue::Null.to_string(), "null");
		assert_eq!(GeoValue::from(true).to_string(), "true");
	}

	#[test]
	fn accessors() {
		assert_eq!(GeoValue::from(3u64).as_f64(), Some(3.0));
		assert_eq!(GeoValue::from("x").as_f64(), None);
		assert_eq!(GeoValue::from("x").as_str(), Some("x"));
	}
}
