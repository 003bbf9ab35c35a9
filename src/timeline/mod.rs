//! Timeline interpolation
//!
//! A timeline is a run of integer positions. The caller pins anchor images at a
//! few positions; [`Interpolator`] walks each pair of neighbouring anchors,
//! builds a perceptual gradient between their colors and greedily fills every
//! position in between with the closest pool image not used yet.
//!
//! # Determinism
//!
//! Ties in distance go to the candidate that comes first in the pool, so the
//! result is reproducible only when the pool is supplied in a stable order.

mod interpolator;
mod types;

pub use interpolator::{find_nearest, interpolate, ExhaustionPolicy, Interpolator};
pub use types::{Anchor, Assignment, Candidate, ExclusionSet, Placement, Slot};
