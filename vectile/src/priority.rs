//! Locations whose tiles are preloaded before any others.

use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use vectile_core::TileCoord;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PriorityLocation {
	pub lat: f64,
	pub lon: f64,
	/// Higher values load first.
	#[serde(default)]
	pub priority: i32,
}

impl PriorityLocation {
	pub fn new(lat: f64, lon: f64, priority: i32) -> PriorityLocation {
		PriorityLocation { lat, lon, priority }
	}
}

/// An append-only list of [`PriorityLocation`]s that can be cleared as a whole.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriorityLocations(Vec<PriorityLocation>);

impl PriorityLocations {
	pub fn new() -> PriorityLocations {
		PriorityLocations::default()
	}

	pub fn push(&mut self, location: PriorityLocation) {
		self.0.push(location);
	}

	pub fn clear(&mut self) {
		self.0.clear();
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &PriorityLocation> {
		self.0.iter()
	}

	/// Highest priority of any location inside `coord`, if one is.
	pub fn priority_of(&self, coord: &TileCoord) -> Option<i32> {
		self
			.0
			.iter()
			.filter(|location| {
				TileCoord::from_geo(location.lon, location.lat, coord.level).is_ok_and(|tile| tile == *coord)
			})
			.map(|location| location.priority)
			.max()
	}

	/// Sorts `coords` for preloading: tiles holding a priority location first, higher priority
	/// first, then the rest by distance of the tile center from `center`, given in tile units.
	pub fn sort_for_preload(&self, coords: &mut [TileCoord], center: [f64; 2]) {
		let distance = |coord: &TileCoord| {
			let dx = f64::from(coord.x) + 0.5 - center[0];
			let dy = f64::from(coord.y) + 0.5 - center[1];
			dx * dx + dy * dy
		};
		let mut keyed: Vec<(Option<Reverse<i32>>, f64, TileCoord)> = coords
			.iter()
			.map(|coord| (self.priority_of(coord).map(Reverse), distance(coord), *coord))
			.collect();
		keyed.sort_by(|a, b| {
			let by_priority = match (&a.0, &b.0) {
				(Some(pa), Some(pb)) => pa.cmp(pb),
				(Some(_), None) => Ordering::Less,
				(None, Some(_)) => Ordering::Greater,
				(None, None) => Ordering::Equal,
			};
			by_priority.then(a.1.total_cmp(&b.1)).then(a.2.cmp(&b.2))
		});
		for (slot, (_, _, coord)) in coords.iter_mut().zip(keyed) {
			*slot = coord;
		}
	}
}

impl From<Vec<PriorityLocation>> for PriorityLocations {
	fn from(locations: Vec<PriorityLocation>) -> Self {
		PriorityLocations(locations)
	}
}
