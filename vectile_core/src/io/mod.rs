//! Cursor based readers and writers for varints, zigzag integers and protobuf framing.

mod error;
pub use error::*;

mod value_reader;
pub use value_reader::*;

mod value_reader_slice;
pub use value_reader_slice::*;

mod value_writer;
pub use value_writer::*;

mod value_writer_blob;
pub use value_writer_blob::*;

mod zigzag;
pub use zigzag::*;
