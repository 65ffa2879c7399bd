//! Geometry command streams.
//!
//! A stream is a sequence of command integers `(count << 3) | id`, each followed by `count`
//! zigzag encoded `(dx, dy)` pairs for MoveTo and LineTo. The cursor starts at `(0, 0)` for
//! every feature and accumulates the deltas.

use crate::{GeometryKind, TilePoint};
use anyhow::{Context, Result, bail};
use vectile_core::io::{ValueReader, ValueReaderSlice, encode_zigzag};

pub const MOVE_TO: u32 = 1;
pub const LINE_TO: u32 = 2;
pub const CLOSE_PATH: u32 = 7;

pub type Ring = Vec<TilePoint>;

#[must_use]
pub fn command_integer(id: u32, count: u32) -> u32 {
	(count << 3) | id
}

/// Decodes a command stream into rings of absolute points.
///
/// Every MoveTo repetition starts a new ring; LineTo appends to the current ring, starting one
/// if none exists yet. ClosePath adds nothing, so first and last point are never duplicated.
///
/// # Errors
/// Unknown command ids, and any structural error from the reader.
pub fn assemble_rings(data: &[u8]) -> Result<Vec<Ring>> {
	let mut reader = ValueReaderSlice::new_le(data);
	let mut rings: Vec<Ring> = Vec::new();
	let mut x: i64 = 0;
	let mut y: i64 = 0;

	while reader.has_remaining() {
		let start = reader.position();
		let value = reader
			.read_varint()
			.context("Failed to read varint for geometry command")?;
		let id = value & 0x7;
		let count = value >> 3;

		match id {
			MOVE_TO | LINE_TO => {
				for _ in 0..count {
					x += i64::from(reader.read_svarint().context("Failed to read x coordinate")?);
					y += i64::from(reader.read_svarint().context("Failed to read y coordinate")?);
					match rings.last_mut() {
						Some(ring) if id == LINE_TO => ring.push([x, y]),
						_ => rings.push(vec![[x, y]]),
					}
				}
			}
			CLOSE_PATH => {}
			_ => bail!("unknown geometry command {id} at byte {start}"),
		}
	}

	Ok(rings)
}

/// Applies the per-kind output rules to assembled rings.
///
/// * `Point`: every single-point ring.
/// * `LineString`: every ring with at least two points.
/// * `Polygon`: the first ring only, if it has at least three points. Interior rings are dropped.
///
/// Rings that are too short are discarded silently.
#[must_use]
pub fn shape_rings(kind: GeometryKind, rings: Vec<Ring>) -> Vec<Ring> {
	match kind {
		GeometryKind::Point => rings.into_iter().filter(|ring| ring.len() == 1).collect(),
		GeometryKind::LineString => rings.into_iter().filter(|ring| ring.len() >= 2).collect(),
		GeometryKind::Polygon => rings
			.into_iter()
			.next()
			.filter(|ring| ring.len() >= kind.min_points())
			.into_iter()
			.collect(),
	}
}

/// Encodes rings as a command stream, the inverse of [`assemble_rings`].
///
/// Points are written as one MoveTo with a repetition per point. Lines and polygons get a
/// MoveTo followed by a LineTo for the remaining points; polygon rings end with ClosePath.
#[must_use]
pub fn encode_rings(kind: GeometryKind, rings: &[Ring]) -> Vec<u32> {
	let mut commands = Vec::new();
	let mut cursor: TilePoint = [0, 0];
	let mut push_point = |commands: &mut Vec<u32>, point: &TilePoint| {
		commands.push(encode_zigzag((point[0] - cursor[0]) as i32));
		commands.push(encode_zigzag((point[1] - cursor[1]) as i32));
		cursor = *point;
	};

	if kind == GeometryKind::Point {
		let points: Vec<&TilePoint> = rings.iter().flatten().collect();
		if !points.is_empty() {
			commands.push(command_integer(MOVE_TO, points.len() as u32));
			for point in points {
				push_point(&mut commands, point);
			}
		}
		return commands;
	}

	for ring in rings {
		let Some((first, rest)) = ring.split_first() else {
			continue;
		};
		commands.push(command_integer(MOVE_TO, 1));
		push_point(&mut commands, first);
		if !rest.is_empty() {
			commands.push(command_integer(LINE_TO, rest.len() as u32));
			for point in rest {
				push_point(&mut commands, point);
			}
		}
		if kind == GeometryKind::Polygon {
			commands.push(command_integer(CLOSE_PATH, 1));
		}
	}
	commands
}
