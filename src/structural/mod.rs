//! Whole-collection reshaping: tree nesting, cartesian products and transposition.
//!
//! These are methods on [`crate::Collection`]; this module holds their implementations and
//! option types.

mod cartesian;
mod nest;
mod transpose;

pub use cartesian::{CartesianOptions, CombinationFilter, CombinationTransform};
pub use nest::CHILDREN_KEY;
