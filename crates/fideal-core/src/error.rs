//! Fatal arena-contract violations. These are programmer errors in a
//! caller holding a stale or foreign `PolyRef`/`MonoRef`/`NodeRef`, never a
//! condition that arises from well-formed input.

use crate::mono::MonoRef;
use crate::poly::PolyRef;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AlgebraError {
    #[error("dangling PolyRef {0} does not belong to this arena")]
    DanglingPolyRef(PolyRef),

    #[error("dangling MonoRef {0} does not belong to this arena")]
    DanglingMonoRef(MonoRef),

    #[error("leading coefficient of a non-zero Polynode was zero")]
    ZeroLeadingCoefficient,

    #[error("division by the zero Polynode")]
    DivisionByZero,
}
