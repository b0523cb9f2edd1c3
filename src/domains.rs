//! Exact number domains used by the solver.
pub mod rational;
