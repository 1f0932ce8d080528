use specimen_core::{Request, Result, SpecimenResult, TypeKey};

use crate::builders::SpecimenBuilder;
use crate::context::SpecimenContext;

/// Predicate over requests.
pub trait RequestSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool;
}

impl<F> RequestSpecification for F
where
    F: Fn(&Request) -> bool,
{
    fn is_satisfied_by(&self, request: &Request) -> bool {
        self(request)
    }
}

/// Matches bare type requests for exactly one type.
#[derive(Debug, Clone, Copy)]
pub struct ExactTypeSpecification {
    key: TypeKey,
}

impl ExactTypeSpecification {
    pub fn new(key: TypeKey) -> Self {
        Self { key }
    }
}

impl RequestSpecification for ExactTypeSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        request.as_type() == Some(&self.key)
    }
}

/// Matches seeded requests whose declared type is exactly one type.
#[derive(Debug, Clone, Copy)]
pub struct SeedSpecification {
    key: TypeKey,
}

impl SeedSpecification {
    pub fn new(key: TypeKey) -> Self {
        Self { key }
    }
}

impl RequestSpecification for SeedSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        matches!(request, Request::Seeded(seeded) if seeded.declared_type == self.key)
    }
}

/// Satisfied when either side is.
#[derive(Debug, Clone, Copy)]
pub struct OrSpecification<A, B> {
    left: A,
    right: B,
}

impl<A, B> OrSpecification<A, B> {
    pub fn new(left: A, right: B) -> Self {
        Self { left, right }
    }
}

impl<A, B> RequestSpecification for OrSpecification<A, B>
where
    A: RequestSpecification,
    B: RequestSpecification,
{
    fn is_satisfied_by(&self, request: &Request) -> bool {
        self.left.is_satisfied_by(request) || self.right.is_satisfied_by(request)
    }
}

/// Bare and seeded requests for one type; the filter behind `inject` and
/// `register`.
pub fn exact_or_seeded(
    key: TypeKey,
) -> OrSpecification<ExactTypeSpecification, SeedSpecification> {
    OrSpecification::new(ExactTypeSpecification::new(key), SeedSpecification::new(key))
}

/// Matches parameter and property requests declared on one owner type.
#[derive(Debug, Clone, Copy)]
pub struct OwnerSpecification {
    owner: TypeKey,
}

impl OwnerSpecification {
    pub fn new(owner: TypeKey) -> Self {
        Self { owner }
    }
}

impl RequestSpecification for OwnerSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        request
            .as_parameter()
            .is_some_and(|parameter| parameter.owner == self.owner)
    }
}

/// Forwards only the requests `specification` accepts.
pub struct FilteringBuilder<S, B> {
    specification: S,
    builder: B,
}

impl<S, B> FilteringBuilder<S, B> {
    pub fn new(specification: S, builder: B) -> Self {
        Self {
            specification,
            builder,
        }
    }
}

impl<S, B> SpecimenBuilder for FilteringBuilder<S, B>
where
    S: RequestSpecification,
    B: SpecimenBuilder,
{
    fn id(&self) -> &'static str {
        self.builder.id()
    }

    fn resolve(
        &self,
        request: &Request,
        ctx: &mut dyn SpecimenContext,
    ) -> Result<SpecimenResult> {
        if !self.specification.is_satisfied_by(request) {
            return Ok(SpecimenResult::NoSpecimen);
        }
        self.builder.resolve(request, ctx)
    }
}
