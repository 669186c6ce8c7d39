//! Ideal-membership core: a hash-consed term arena, the ring operations on
//! it, and a Buchberger engine for deciding whether a polynomial equation
//! involving an unknown function `f` follows from a set of hypotheses.
//!
//! This crate does no I/O, spawns no threads, and reads no randomness --
//! all of that lives in the `fideal-cli` binary crate built on top of it.

pub mod algebra;
pub mod arena;
pub mod buchberger;
pub mod error;
pub mod mono;
pub mod node;
pub mod number;
pub mod order;
pub mod poly;
pub mod preprocess;

pub use algebra::DisplayPolynode;
pub use arena::Arena;
pub use buchberger::{buchberger, is_member, Deadline};
pub use error::AlgebraError;
pub use mono::{MonoDerived, MonoRef, Mononode};
pub use node::{Node, NodeRef, Stats};
pub use number::Q;
pub use poly::{PolyDerived, PolyRef, Polynode};
