//! Image codecs. Raster tiles are PNG only.

pub mod png;
