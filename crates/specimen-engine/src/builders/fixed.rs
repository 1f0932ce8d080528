use std::any::Any;

use specimen_core::{Request, Result, SpecimenResult};

use crate::builders::SpecimenBuilder;
use crate::context::SpecimenContext;

/// Answers every request with a clone of one value.
///
/// Usually wrapped in a [`FilteringBuilder`](crate::builders::FilteringBuilder).
pub struct FixedBuilder<T> {
    value: T,
}

impl<T: Any + Clone> FixedBuilder<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Any + Clone> SpecimenBuilder for FixedBuilder<T> {
    fn id(&self) -> &'static str {
        "fixed"
    }

    fn resolve(
        &self,
        _request: &Request,
        _ctx: &mut dyn SpecimenContext,
    ) -> Result<SpecimenResult> {
        Ok(SpecimenResult::value(self.value.clone()))
    }
}

type Factory<T> = Box<dyn Fn(&mut dyn SpecimenContext) -> Result<T>>;

/// Answers every request by invoking a factory; nothing is cached.
pub struct FactoryBuilder<T> {
    factory: Factory<T>,
}

impl<T: Any> FactoryBuilder<T> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&mut dyn SpecimenContext) -> Result<T> + 'static,
    {
        Self {
            factory: Box::new(factory),
        }
    }
}

impl<T: Any> SpecimenBuilder for FactoryBuilder<T> {
    fn id(&self) -> &'static str {
        "factory"
    }

    fn resolve(
        &self,
        _request: &Request,
        ctx: &mut dyn SpecimenContext,
    ) -> Result<SpecimenResult> {
        let value = (self.factory)(ctx)?;
        Ok(SpecimenResult::value(value))
    }
}
