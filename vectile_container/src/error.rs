use thiserror::Error;

/// Why a tile could not be loaded.
///
/// Cloneable, since every caller attached to a shared in-flight fetch receives the same error.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum FetchError {
	#[error("network error: {0}")]
	Network(String),

	#[error("unexpected HTTP status {0}")]
	Status(u16),

	#[error("fetch timed out after {0} ms")]
	Timeout(u64),

	#[error("failed to decode tile: {0}")]
	Decode(String),

	#[error("fetch was cancelled")]
	Cancelled,

	#[error("zoom level {level} is outside of [{min}, {max}]")]
	OutOfRangeZoom { level: u8, min: u8, max: u8 },

	#[error("I/O error: {0}")]
	Io(String),
}
