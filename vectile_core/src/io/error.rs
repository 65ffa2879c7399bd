use thiserror::Error;

/// Structural errors raised while scanning a protobuf buffer.
///
/// The reader returns them wrapped in `anyhow::Error`, so callers can attach context and still
/// recover the variant with `err.downcast_ref::<PbfError>()`.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum PbfError {
	/// The buffer ended inside a varint, or the varint is wider than the requested integer.
	#[error("malformed varint starting at byte {position}")]
	MalformedVarint { position: u64 },

	/// A fixed-width or length-delimited value claims more bytes than are left.
	#[error("truncated field: needed {needed} bytes, but only {remaining} remain")]
	TruncatedField { needed: u64, remaining: u64 },

	/// Wire types 3 and 4 (groups) and anything above 5 cannot be skipped.
	#[error("unsupported wire type {0}")]
	UnsupportedWireType(u8),
}
