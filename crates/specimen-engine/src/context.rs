use tracing::debug;

use specimen_core::{Request, Result, Specimen, SpecimenError, SpecimenValue};

use crate::engine::Engine;

/// Resolution façade handed to every builder.
///
/// Builders use it to request nested values; they must not keep it beyond the
/// call they received it in.
pub trait SpecimenContext {
    /// Resolves `request` through the full chain, customizations first.
    fn resolve(&mut self, request: &Request) -> Result<SpecimenValue>;

    /// Requests currently in flight, outermost first.
    fn path(&self) -> &[Request];
}

impl dyn SpecimenContext + '_ {
    /// Resolves a bare type request and recovers the typed value.
    pub fn create<T: Specimen>(&mut self) -> Result<T> {
        let request = Request::of::<T>();
        self.resolve(&request)?.into_typed(&request)
    }
}

/// Context for a single top-level resolution.
///
/// The in-flight stack turns recursion over an already pending request into
/// [`SpecimenError::Cyclic`].
pub(crate) struct ResolutionContext<'e> {
    engine: &'e Engine,
    in_flight: Vec<Request>,
}

impl<'e> ResolutionContext<'e> {
    pub(crate) fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            in_flight: Vec::new(),
        }
    }
}

impl SpecimenContext for ResolutionContext<'_> {
    fn resolve(&mut self, request: &Request) -> Result<SpecimenValue> {
        if self.in_flight.contains(request) {
            let mut chain = self.in_flight.clone();
            chain.push(request.clone());
            debug!(request = %request, depth = chain.len(), "cyclic request");
            return Err(SpecimenError::Cyclic { chain });
        }

        self.in_flight.push(request.clone());
        let engine = self.engine;
        let outcome = engine.dispatch(request, self);
        self.in_flight.pop();
        outcome
    }

    fn path(&self) -> &[Request] {
        &self.in_flight
    }
}
