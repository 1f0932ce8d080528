use std::any::Any;
use std::fmt;

use crate::error::{Result, SpecimenError};
use crate::request::Request;

/// Owned, type-erased value produced by a builder.
pub struct SpecimenValue {
    value: Box<dyn Any>,
    type_name: &'static str,
}

impl SpecimenValue {
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Wraps an already boxed value; `type_name` must describe the boxed type.
    pub fn from_boxed(value: Box<dyn Any>, type_name: &'static str) -> Self {
        Self { value, type_name }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Recovers the typed value, handing the erased value back on mismatch.
    pub fn downcast<T: Any>(self) -> std::result::Result<T, SpecimenValue> {
        let type_name = self.type_name;
        match self.value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(SpecimenValue { value, type_name }),
        }
    }

    /// Recovers the typed value produced for `request`.
    pub fn into_typed<T: Any>(self, request: &Request) -> Result<T> {
        self.downcast::<T>()
            .map_err(|value| SpecimenError::TypeMismatch {
                request: request.clone(),
                expected: std::any::type_name::<T>(),
                actual: value.type_name,
            })
    }
}

impl fmt::Debug for SpecimenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecimenValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Outcome of asking one builder for a specimen.
#[derive(Debug)]
pub enum SpecimenResult {
    Value(SpecimenValue),
    /// The builder does not handle the request; this is not a failure.
    NoSpecimen,
}

impl SpecimenResult {
    pub fn value<T: Any>(value: T) -> Self {
        SpecimenResult::Value(SpecimenValue::new(value))
    }

    pub fn is_no_specimen(&self) -> bool {
        matches!(self, SpecimenResult::NoSpecimen)
    }

    pub fn into_value(self) -> Option<SpecimenValue> {
        match self {
            SpecimenResult::Value(value) => Some(value),
            SpecimenResult::NoSpecimen => None,
        }
    }
}

impl From<SpecimenValue> for SpecimenResult {
    fn from(value: SpecimenValue) -> Self {
        SpecimenResult::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produced_none_is_a_value() {
        let result = SpecimenResult::value(None::<i32>);
        assert!(!result.is_no_specimen());
        let value = result.into_value().expect("value");
        assert_eq!(value.downcast::<Option<i32>>().ok(), Some(None));
    }

    #[test]
    fn into_typed_reports_mismatch() {
        let value = SpecimenValue::new(42_i64);
        let err = value
            .into_typed::<String>(&Request::of::<String>())
            .expect_err("mismatch");
        match err {
            SpecimenError::TypeMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, "alloc::string::String");
                assert_eq!(actual, "i64");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
