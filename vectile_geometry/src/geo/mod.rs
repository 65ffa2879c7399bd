mod feature;
mod properties;
mod value;

pub use feature::*;
pub use properties::*;
pub use value::*;
