use specimen_core::{Request, Result, SpecimenResult};

use crate::builders::SpecimenBuilder;
use crate::context::SpecimenContext;

/// Re-issues an unclaimed parameter or property request as a seeded request
/// carrying the member name, so injections and registrations get a second
/// look before the named string default.
pub struct ParameterRelay;

impl SpecimenBuilder for ParameterRelay {
    fn id(&self) -> &'static str {
        "default.parameter_relay"
    }

    fn resolve(
        &self,
        request: &Request,
        ctx: &mut dyn SpecimenContext,
    ) -> Result<SpecimenResult> {
        let Request::Parameter(parameter) = request else {
            return Ok(SpecimenResult::NoSpecimen);
        };
        let seeded = Request::seeded(parameter.name.as_str(), parameter.declared_type);
        let value = ctx.resolve(&seeded)?;
        Ok(SpecimenResult::Value(value))
    }
}

/// Drops the name hint of an unclaimed seeded request.
pub struct SeedRelay;

impl SpecimenBuilder for SeedRelay {
    fn id(&self) -> &'static str {
        "default.seed_relay"
    }

    fn resolve(
        &self,
        request: &Request,
        ctx: &mut dyn SpecimenContext,
    ) -> Result<SpecimenResult> {
        let Request::Seeded(seeded) = request else {
            return Ok(SpecimenResult::NoSpecimen);
        };
        let value = ctx.resolve(&Request::Type(seeded.declared_type))?;
        Ok(SpecimenResult::Value(value))
    }
}
