pub mod fmt;
pub mod lin_alg;
pub mod parse;

pub use lin_alg::{NullSpace, Pivot, Relation, SpaceBasis, Term};
pub use parse::ParseError;

/// Exact rational scalar used for every matrix entry.
pub type Rat = num_rational::BigRational;

/// A rectangular grid of rationals, row-major.
pub type Matrix = Vec<Vec<Rat>>;
