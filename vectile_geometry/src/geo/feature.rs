use super::{GeoProperties, GeoValue};
use std::fmt::{self, Display};

/// A point in tile-local integer space.
pub type TilePoint = [i64; 2];

/// The three drawable geometry classes of a decoded feature.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GeometryKind {
	Point,
	LineString,
	Polygon,
}

impl GeometryKind {
	/// Minimum number of points a ring needs to be kept.
	#[must_use]
	pub fn min_points(&self) -> usize {
		match self {
			GeometryKind::Point => 1,
			GeometryKind::LineString => 2,
			GeometryKind::Polygon => 3,
		}
	}
}

impl Display for GeometryKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			GeometryKind::Point => "Point",
			GeometryKind::LineString => "LineString",
			GeometryKind::Polygon => "Polygon",
		})
	}
}

/// One drawable shape decoded from a vector tile.
///
/// Multi-geometries are flattened: a feature with three points on the wire becomes three
/// `Feature`s sharing the same `id` and properties. Coordinates are tile-local, nominally in
/// `[0, extent)`, but may lie outside when the tile carries a buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
	pub id: Option<u64>,
	pub geom_type: GeometryKind,
	pub coords: Vec<TilePoint>,
	pub properties: GeoProperties,
}

impl Feature {
	#[must_use]
	pub fn new(geom_type: GeometryKind, coords: Vec<TilePoint>) -> Feature {
		Feature {
			id: None,
			geom_type,
			coords,
			properties: GeoProperties::new(),
		}
	}

	pub fn set_property<T>(&mut self, key: &str, value: T)
	where
		GeoValue: From<T>,
	{
		self.properties.insert(key.to_string(), GeoValue::from(value));
	}

	/// Axis aligned bounds as `[min_x, min_y, max_x, max_y]`, or `None` without coordinates.
	#[must_use]
	pub fn bbox(&self) -> Option<[i64; 4]> {
		let first = self.coords.first()?;
		Some(self.coords.iter().fold([first[0], first[1], first[0], first[1]], |b, p| {
			[b[0].min(p[0]), b[1].min(p[1]), b[2].max(p[0]), b[3].max(p[1])]
		}))
	}
}

/// One line per feature: `Polygon(3) [[0, 0], [10, 0], [10, 10]] {"class": String("park")}`.
impl Display for Feature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}({}) {:?} {:?}", self.geom_type, self.coords.len(), self.coords, self.properties)
	}
}
