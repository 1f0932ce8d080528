//! Core contracts for the Specimen generation engine.
//!
//! This crate defines the request model, the explicit type shapes that stand
//! in for runtime reflection, the type-erased value produced by builders, and
//! the error type shared by the engine crate.

pub mod error;
pub mod request;
pub mod shape;
pub mod value;

pub use error::{Result, SpecimenError};
pub use request::{MemberKind, ParameterRequest, Request, SeededRequest, SequenceRequest, TypeKey};
pub use shape::{
    Arguments, Composite, CompositeShape, ConstructorShape, FloatKind, IntKind, ParameterInfo,
    PrimitiveKind, PropertyShape, SequenceShape, Specimen, TypeShape, param,
};
pub use value::{SpecimenResult, SpecimenValue};

/// Number of elements generated for sequences when no count is requested.
pub const DEFAULT_REPEAT_COUNT: usize = 3;
