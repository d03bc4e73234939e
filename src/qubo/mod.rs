//! Binary quadratic model construction.
//!
//! Encodes a [`ProblemSpec`](crate::models::ProblemSpec) as a penalty-weighted
//! binary model over dense variable ids.
//!
//! # Modules
//!
//! - **`variable`**: Dense arena mapping (request, host, slot) to ids
//! - **`model`**: [`BinaryModel`] with implicit penalty families, energy and
//!   feasibility evaluation
//! - **`builder`**: Linear rewards and the two penalty families
//!
//! # Reference
//! Lucas (2014), "Ising formulations of many NP problems", Front. Phys. 2:5

mod builder;
mod model;
mod variable;

pub(crate) use builder::resolve;
pub use builder::{build_model, expertise_bonus, ModelBuilder, HOST_PENALTY_RATIO, PENALTY_MARGIN};
pub use model::{BinaryModel, PenaltyFamily, QuadraticTerm, QuboStats, Sense};
pub use variable::{variable_key, Variable, VariableArena, VariableId};
