use std::any::Any;

use specimen_core::{MemberKind, ParameterRequest, Request, Result, SpecimenResult, TypeKey};

use crate::builders::SpecimenBuilder;
use crate::context::SpecimenContext;

/// Answers named parameter requests with a fixed value.
///
/// A request matches when its declared type is `T`, its name contains the
/// configured fragment (ASCII case-insensitive), its member kind matches
/// (constructor parameters by default) and, once restricted with
/// [`owned_by`](Self::owned_by), its owner is that type. Bare type requests
/// are never matched.
pub struct ParameterBuilder<T> {
    fragment: String,
    value: T,
    owner: Option<TypeKey>,
    member_kind: Option<MemberKind>,
}

impl<T: Any + Clone> ParameterBuilder<T> {
    pub fn new(fragment: impl Into<String>, value: T) -> Self {
        Self {
            fragment: fragment.into().to_ascii_lowercase(),
            value,
            owner: None,
            member_kind: Some(MemberKind::Constructor),
        }
    }

    /// Restricts the rule to members declared on `O`.
    pub fn owned_by<O: Any>(mut self) -> Self {
        self.owner = Some(TypeKey::opaque::<O>());
        self
    }

    pub fn for_properties(mut self) -> Self {
        self.member_kind = Some(MemberKind::Property);
        self
    }

    pub fn for_any_member(mut self) -> Self {
        self.member_kind = None;
        self
    }

    pub fn matches(&self, parameter: &ParameterRequest) -> bool {
        parameter.declared_type.is::<T>()
            && self
                .member_kind
                .is_none_or(|kind| kind == parameter.member_kind)
            && parameter
                .name
                .to_ascii_lowercase()
                .contains(&self.fragment)
            && self.owner.is_none_or(|owner| owner == parameter.owner)
    }
}

impl<T: Any + Clone> SpecimenBuilder for ParameterBuilder<T> {
    fn id(&self) -> &'static str {
        "parameter"
    }

    fn resolve(
        &self,
        request: &Request,
        _ctx: &mut dyn SpecimenContext,
    ) -> Result<SpecimenResult> {
        match request {
            Request::Parameter(parameter) if self.matches(parameter) => {
                Ok(SpecimenResult::value(self.value.clone()))
            }
            _ => Ok(SpecimenResult::NoSpecimen),
        }
    }
}
