//! Linear model representation and adapter boundary.

mod linear;
mod source;

pub use linear::LinearModel;
pub use source::CoefficientSource;
