use tracing::trace;

use specimen_core::{
    MemberKind, Request, Result, SpecimenError, SpecimenResult, SpecimenValue, TypeShape,
};

use crate::builders::SpecimenBuilder;
use crate::context::SpecimenContext;

/// Assembles composite types from their declared shape.
///
/// Picks the constructor with the most parameters (first declared wins
/// ties), resolves every parameter as a constructor parameter request owned
/// by the type, then fills each property not already covered by a
/// constructor parameter of the same name.
pub struct ObjectBuilder;

impl SpecimenBuilder for ObjectBuilder {
    fn id(&self) -> &'static str {
        "default.object"
    }

    fn resolve(
        &self,
        request: &Request,
        ctx: &mut dyn SpecimenContext,
    ) -> Result<SpecimenResult> {
        let Request::Type(key) = request else {
            return Ok(SpecimenResult::NoSpecimen);
        };
        let Some(TypeShape::Composite(shape)) = key.shape() else {
            return Ok(SpecimenResult::NoSpecimen);
        };
        let constructor = shape
            .select_constructor()
            .ok_or(SpecimenError::ConstructorSelection {
                type_name: key.name(),
            })?;
        trace!(
            ty = %key,
            parameters = constructor.parameters().len(),
            "constructor selected"
        );

        let mut arguments = Vec::with_capacity(constructor.parameters().len());
        for parameter in constructor.parameters() {
            let request =
                Request::parameter(parameter.name, parameter.ty, *key, MemberKind::Constructor);
            arguments.push(ctx.resolve(&request)?);
        }
        let mut instance = constructor.invoke(key.name(), arguments)?;

        for property in shape.properties() {
            let covered = constructor
                .parameters()
                .iter()
                .any(|parameter| parameter.name.eq_ignore_ascii_case(property.name()));
            if covered {
                continue;
            }
            let request =
                Request::parameter(property.name(), property.ty(), *key, MemberKind::Property);
            let value = ctx.resolve(&request)?;
            property.assign(instance.as_mut(), value)?;
        }

        Ok(SpecimenResult::Value(SpecimenValue::from_boxed(
            instance,
            key.name(),
        )))
    }
}
