use crate::GeometryKind;

/// Wire-level geometry type of a feature (MVT field 3).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GeomType {
	#[default]
	Unknown = 0,
	MultiPoint = 1,
	MultiLineString = 2,
	MultiPolygon = 3,
}

impl GeomType {
	pub fn as_u64(&self) -> u64 {
		*self as u64
	}

	/// The drawable kind, or `None` for `Unknown`, which yields no features.
	pub fn kind(&self) -> Option<GeometryKind> {
		match self {
			GeomType::Unknown => None,
			GeomType::MultiPoint => Some(GeometryKind::Point),
			GeomType::MultiLineString => Some(GeometryKind::LineString),
			GeomType::MultiPolygon => Some(GeometryKind::Polygon),
		}
	}
}

impl From<u64> for GeomType {
	fn from(value: u64) -> Self {
		match value {
			1 => GeomType::MultiPoint,
			2 => GeomType::MultiLineString,
			3 => GeomType::MultiPolygon,
			_ => GeomType::Unknown,
		}
	}
}

impl From<GeometryKind> for GeomType {
	fn from(kind: GeometryKind) -> Self {
		match kind {
			GeometryKind::Point => GeomType::MultiPoint,
			GeometryKind::LineString => GeomType::MultiLineString,
			GeometryKind::Polygon => GeomType::MultiPolygon,
		}
	}
}
