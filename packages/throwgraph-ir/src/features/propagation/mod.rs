//! Exception propagation
//!
//! Worklist fixed point growing each function's throw set across caller
//! edges, filtered by per-site catch handlers, plus the post-pass that folds
//! overrider throws back into their virtual bases.

pub mod handler;
mod propagator;

pub use handler::{catches, count_caught, filter_escaping};
pub use propagator::{propagate, reconcile_expansion, PropagationStats};
