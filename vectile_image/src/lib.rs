pub mod color;
pub mod format;
mod image_surface;
mod surface;
#[cfg(any(test, feature = "test"))]
mod recording;

pub use format::png::{blob2image, image2blob};
pub use image_surface::*;
#[cfg(any(test, feature = "test"))]
pub use recording::*;
pub use surface::*;
