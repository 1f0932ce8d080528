use chrono::Utc;

use specimen_core::{Request, Result, SpecimenResult};

use crate::context::SpecimenContext;
use crate::options::EngineOptions;

pub mod filter;
pub mod fixed;
pub mod object;
pub mod parameter;
pub mod primitives;
pub mod relay;
pub mod sequence;

pub use filter::{
    ExactTypeSpecification, FilteringBuilder, OrSpecification, OwnerSpecification,
    RequestSpecification, SeedSpecification, exact_or_seeded,
};
pub use fixed::{FactoryBuilder, FixedBuilder};
pub use object::ObjectBuilder;
pub use parameter::ParameterBuilder;
pub use primitives::{BooleanBuilder, NumericBuilder, TemporalBuilder, TextBuilder};
pub use relay::{ParameterRelay, SeedRelay};
pub use sequence::SequenceBuilder;

/// A resolution rule that may claim or decline a request.
///
/// Returning [`SpecimenResult::NoSpecimen`] passes the request on to the next
/// builder in the chain. Errors abort the whole resolution.
pub trait SpecimenBuilder {
    fn id(&self) -> &'static str {
        "custom"
    }

    fn resolve(
        &self,
        request: &Request,
        ctx: &mut dyn SpecimenContext,
    ) -> Result<SpecimenResult>;
}

/// Builder backed by a closure; see [`from_fn`].
pub struct FnBuilder<F> {
    resolve: F,
}

impl<F> SpecimenBuilder for FnBuilder<F>
where
    F: Fn(&Request, &mut dyn SpecimenContext) -> Result<SpecimenResult>,
{
    fn id(&self) -> &'static str {
        "fn"
    }

    fn resolve(
        &self,
        request: &Request,
        ctx: &mut dyn SpecimenContext,
    ) -> Result<SpecimenResult> {
        (self.resolve)(request, ctx)
    }
}

pub fn from_fn<F>(resolve: F) -> FnBuilder<F>
where
    F: Fn(&Request, &mut dyn SpecimenContext) -> Result<SpecimenResult>,
{
    FnBuilder { resolve }
}

/// Fallback builders consulted after every customization, in this order.
pub fn default_pipeline(options: &EngineOptions, seed: u64) -> Vec<Box<dyn SpecimenBuilder>> {
    let base_date = options
        .base_date
        .unwrap_or_else(|| Utc::now().date_naive());

    vec![
        Box::new(NumericBuilder::new(options.numeric_ceiling)),
        Box::new(TextBuilder::new(hash_seed(seed, "text"))),
        Box::new(BooleanBuilder::new()),
        Box::new(TemporalBuilder::new(
            base_date,
            options.date_span_days,
            hash_seed(seed, "temporal"),
        )),
        Box::new(SequenceBuilder::new(options.repeat_count)),
        Box::new(ObjectBuilder),
        Box::new(ParameterRelay),
        Box::new(SeedRelay),
    ]
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
