use specimen_core::{Request, Result, SpecimenResult, SpecimenValue, TypeShape};

use crate::builders::SpecimenBuilder;
use crate::context::SpecimenContext;

/// Builds sequences from independently resolved elements.
///
/// `Sequence` requests produce an erased `Vec<SpecimenValue>`; bare requests
/// for collection types (`Vec<T>`, `[T; N]`) go through a `Sequence` request
/// first, so customizations can intercept either level.
pub struct SequenceBuilder {
    repeat_count: usize,
}

impl SequenceBuilder {
    pub fn new(repeat_count: usize) -> Self {
        Self { repeat_count }
    }
}

impl SpecimenBuilder for SequenceBuilder {
    fn id(&self) -> &'static str {
        "default.sequence"
    }

    fn resolve(
        &self,
        request: &Request,
        ctx: &mut dyn SpecimenContext,
    ) -> Result<SpecimenResult> {
        match request {
            Request::Sequence(sequence) => {
                let count = sequence.count.unwrap_or(self.repeat_count);
                let element = Request::Type(sequence.element);
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(ctx.resolve(&element)?);
                }
                Ok(SpecimenResult::value(items))
            }
            Request::Type(key) => {
                let Some(TypeShape::Sequence(shape)) = key.shape() else {
                    return Ok(SpecimenResult::NoSpecimen);
                };
                let count = shape.length().unwrap_or(self.repeat_count);
                let items_request = Request::sequence(shape.element(), Some(count));
                let items = ctx
                    .resolve(&items_request)?
                    .into_typed::<Vec<SpecimenValue>>(&items_request)?;
                Ok(SpecimenResult::Value(shape.collect(items)?))
            }
            _ => Ok(SpecimenResult::NoSpecimen),
        }
    }
}
