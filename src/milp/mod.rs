//! Mixed-integer linear programming layer.
//!
//! Translates a [`ProblemInstance`](crate::models::ProblemInstance) into
//! one solver-ready model per lexicographic pass. The formulation here is
//! pure model construction; pass sequencing, pinning, and result
//! extraction live in [`crate::solver`].

mod formulation;

pub use formulation::{build, AssignTuple, Pass, PassModel, PassSolution, PinnedValues};
