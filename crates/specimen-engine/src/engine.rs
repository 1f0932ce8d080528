use std::any::Any;
use std::fmt;

use tracing::{debug, trace};

use specimen_core::{
    Request, Result, Specimen, SpecimenError, SpecimenResult, SpecimenValue, TypeKey,
};

use crate::builders::{
    FactoryBuilder, FilteringBuilder, FixedBuilder, SpecimenBuilder, default_pipeline,
    exact_or_seeded,
};
use crate::context::{ResolutionContext, SpecimenContext};
use crate::customization::Customization;
use crate::errors::ConfigError;
use crate::options::EngineOptions;

/// Entry point for creating anonymous values.
///
/// Owns the customization chain and the default pipeline. Intended to live
/// for one test or usage scope; engines share no state with each other.
pub struct Engine {
    options: EngineOptions,
    seed: u64,
    customizations: Vec<Box<dyn SpecimenBuilder>>,
    defaults: Vec<Box<dyn SpecimenBuilder>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::build(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> std::result::Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self::build(options))
    }

    fn build(options: EngineOptions) -> Self {
        let seed = options.seed.unwrap_or_else(rand::random);
        let defaults = default_pipeline(&options, seed);
        debug!(
            seed,
            numeric_ceiling = options.numeric_ceiling,
            repeat_count = options.repeat_count,
            "engine created"
        );
        Self {
            options,
            seed,
            customizations: Vec::new(),
            defaults,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Seed actually used by the default generators.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of builders added through `customize`, `inject` and `register`.
    pub fn customizations_len(&self) -> usize {
        self.customizations.len()
    }

    /// Adds `builder` with the highest priority.
    pub fn customize<B>(&mut self, builder: B) -> &mut Self
    where
        B: SpecimenBuilder + 'static,
    {
        debug!(
            builder = builder.id(),
            chain_len = self.customizations.len() + 1,
            "customization added"
        );
        self.customizations.push(Box::new(builder));
        self
    }

    pub fn customize_with<C>(&mut self, customization: &C) -> &mut Self
    where
        C: Customization + ?Sized,
    {
        customization.customize(self);
        self
    }

    /// Answers every later request for `T` with a clone of `value`.
    ///
    /// Named requests for `T` are covered too, and so are constructor
    /// parameters and properties of type `T` once the parameter relay turns
    /// them into named requests.
    pub fn inject<T>(&mut self, value: T) -> &mut Self
    where
        T: Any + Clone,
    {
        let key = TypeKey::opaque::<T>();
        debug!(ty = %key, "value injected");
        self.customize(FilteringBuilder::new(
            exact_or_seeded(key),
            FixedBuilder::new(value),
        ))
    }

    /// Creates one `T` and injects it for the rest of the engine's lifetime.
    pub fn freeze<T>(&mut self) -> Result<T>
    where
        T: Specimen + Clone,
    {
        let value = self.create::<T>()?;
        self.inject(value.clone());
        Ok(value)
    }

    /// Answers bare and named requests for exactly `T` by calling `factory`
    /// each time.
    ///
    /// Requests for other types, including the element type of a registered
    /// collection, are unaffected.
    pub fn register<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Any,
        F: Fn() -> T + 'static,
    {
        let key = TypeKey::opaque::<T>();
        debug!(ty = %key, "factory registered");
        self.customize(FilteringBuilder::new(
            exact_or_seeded(key),
            FactoryBuilder::new(move |_: &mut dyn SpecimenContext| Ok(factory())),
        ))
    }

    /// Like [`register`](Self::register), feeding the factory an anonymous `I`.
    pub fn register_with<I, T, F>(&mut self, factory: F) -> &mut Self
    where
        I: Specimen,
        T: Any,
        F: Fn(I) -> T + 'static,
    {
        let key = TypeKey::opaque::<T>();
        let input = TypeKey::of::<I>();
        debug!(ty = %key, input = %input, "factory registered");
        self.customize(FilteringBuilder::new(
            exact_or_seeded(key),
            FactoryBuilder::new(move |ctx: &mut dyn SpecimenContext| {
                Ok(factory(ctx.create::<I>()?))
            }),
        ))
    }

    /// Resolves an arbitrary request through the full chain.
    pub fn resolve(&self, request: &Request) -> Result<SpecimenValue> {
        let mut ctx = ResolutionContext::new(self);
        ctx.resolve(request)
    }

    pub fn create<T: Specimen>(&self) -> Result<T> {
        let request = Request::of::<T>();
        debug!(request = %request, "creating specimen");
        self.resolve(&request)?.into_typed(&request)
    }

    /// Creates a `T` for a named request; strings start with `name`.
    pub fn create_named<T: Specimen>(&self, name: &str) -> Result<T> {
        let request = Request::seeded(name, TypeKey::of::<T>());
        debug!(request = %request, "creating specimen");
        self.resolve(&request)?.into_typed(&request)
    }

    /// Creates `repeat_count` independently resolved values.
    pub fn create_many<T: Specimen>(&self) -> Result<Vec<T>> {
        self.create_many_n(self.options.repeat_count)
    }

    pub fn create_many_n<T: Specimen>(&self, count: usize) -> Result<Vec<T>> {
        let request = Request::sequence(TypeKey::of::<T>(), Some(count));
        debug!(request = %request, "creating specimens");
        let items = self
            .resolve(&request)?
            .into_typed::<Vec<SpecimenValue>>(&request)?;
        let element = Request::of::<T>();
        items
            .into_iter()
            .map(|item| item.into_typed::<T>(&element))
            .collect()
    }

    /// Walks customizations (newest first) and then the default pipeline.
    pub(crate) fn dispatch(
        &self,
        request: &Request,
        ctx: &mut dyn SpecimenContext,
    ) -> Result<SpecimenValue> {
        let builders = self
            .customizations
            .iter()
            .rev()
            .chain(self.defaults.iter());
        for builder in builders {
            if let SpecimenResult::Value(value) = builder.resolve(request, ctx)? {
                trace!(request = %request, builder = builder.id(), "request resolved");
                return Ok(value);
            }
        }

        Err(SpecimenError::Unresolvable {
            request: request.clone(),
            path: ctx.path().to_vec(),
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("seed", &self.seed)
            .field("customizations", &self.customizations.len())
            .field("defaults", &self.defaults.len())
            .finish()
    }
}
