//! Color values, perceptual distance and gradients
//!
//! Colors enter the system as hex strings (the average color of an image) and
//! are compared in CIE L\*a\*b\* (D65), where Euclidean distance approximates how
//! different two colors look.

mod gradient;
mod space;

pub use gradient::{gradient_steps, GradientSpace};
pub use space::{distance, Color};

pub(crate) use space::delta_e;
