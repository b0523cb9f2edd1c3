//! Polyrecon reconstructs the polynomial of degree `k - 1` that passes through
//! a set of points, exactly.
//!
//! The y-coordinates of the points are given as digit strings in a radix
//! between 2 and 36. Every `k`-subset of the points is tried in lexicographic
//! order and the first one whose interpolating polynomial has integer
//! coefficients is returned. If no subset qualifies, the polynomial through the
//! first `k` points with distinct x-coordinates is returned with rational
//! coefficients.
//!
//! For example:
//!
//! ```
//! use polyrecon::{points::PointSet, reconstruct::{reconstruct, SearchSettings}};
//!
//! let set = PointSet::from_json_str(
//!     r#"{
//!         "keys": { "n": 3, "k": 3 },
//!         "1": { "base": "10", "value": "3" },
//!         "2": { "base": "2", "value": "111" },
//!         "3": { "base": "16", "value": "d" }
//!     }"#,
//! )
//! .unwrap();
//!
//! let r = reconstruct(&set, &SearchSettings::default()).unwrap();
//! assert_eq!(r.to_string(), "1 1 1");
//! ```
//!
//! All arithmetic is performed on arbitrary-precision integers and fractions,
//! see [`domains::rational::Rational`].

pub mod combinatorics;
pub mod domains;
pub mod error;
pub mod parser;
pub mod points;
pub mod poly;
pub mod printer;
pub mod reconstruct;
pub mod solve;
pub mod tensors;

pub use error::ReconstructionError;

/// The version of the crate as reported by `git describe`.
pub const VERSION: &str = env!("POLYRECON_VERSION");
