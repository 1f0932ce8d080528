use crate::engine::Engine;

/// Reusable bundle of chain mutations and injections.
///
/// Applying a customization twice inserts its builders twice; nothing is
/// deduplicated.
pub trait Customization {
    fn customize(&self, engine: &mut Engine);
}

impl<F> Customization for F
where
    F: Fn(&mut Engine),
{
    fn customize(&self, engine: &mut Engine) {
        self(engine)
    }
}

/// Applies several customizations in insertion order.
#[derive(Default)]
pub struct CompositeCustomization {
    customizations: Vec<Box<dyn Customization>>,
}

impl CompositeCustomization {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, customization: impl Customization + 'static) -> Self {
        self.customizations.push(Box::new(customization));
        self
    }

    pub fn len(&self) -> usize {
        self.customizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customizations.is_empty()
    }
}

impl Customization for CompositeCustomization {
    fn customize(&self, engine: &mut Engine) {
        for customization in &self.customizations {
            customization.customize(engine);
        }
    }
}
