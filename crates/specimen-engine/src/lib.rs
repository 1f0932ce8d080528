//! Specimen generation engine.
//!
//! An [`Engine`] answers requests for anonymous values by walking a chain of
//! [`SpecimenBuilder`]s: customizations first (most recently added wins),
//! then a fixed default pipeline. Composite types are assembled recursively
//! through the [`SpecimenContext`] handed to every builder.

pub mod builders;
pub mod context;
pub mod customization;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod options;

pub use builders::{
    ExactTypeSpecification, FactoryBuilder, FilteringBuilder, FixedBuilder, FnBuilder,
    OrSpecification, OwnerSpecification, ParameterBuilder, RequestSpecification,
    SeedSpecification, SpecimenBuilder, from_fn,
};
pub use context::SpecimenContext;
pub use customization::{CompositeCustomization, Customization};
pub use engine::Engine;
pub use errors::ConfigError;
pub use options::EngineOptions;

pub use specimen_core::{
    Composite, MemberKind, ParameterRequest, Request, Result, SeededRequest, SequenceRequest,
    Specimen, SpecimenError, SpecimenResult, SpecimenValue, TypeKey, TypeShape,
};
