use std::cell::{Cell, RefCell};

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::warn;
use uuid::Uuid;

use specimen_core::{
    FloatKind, IntKind, PrimitiveKind, Request, Result, SeededRequest,
    SpecimenResult, SpecimenValue, TypeKey,
};

use crate::builders::SpecimenBuilder;
use crate::context::SpecimenContext;
use crate::options::MAX_DATE_SPAN_DAYS;

/// Answers bare numeric type requests from one strictly decreasing counter.
///
/// Every integer and float kind shares the counter. Values are folded into
/// the target kind's positive range, so they never exceed the ceiling.
pub struct NumericBuilder {
    ceiling: u64,
    next: Cell<u64>,
}

impl NumericBuilder {
    pub fn new(ceiling: u64) -> Self {
        let ceiling = ceiling.max(2);
        Self {
            ceiling,
            next: Cell::new(ceiling),
        }
    }

    fn next_value(&self) -> u64 {
        let value = self.next.get();
        if value <= 1 {
            warn!(ceiling = self.ceiling, "numeric counter exhausted, restarting");
            self.next.set(self.ceiling);
        } else {
            self.next.set(value - 1);
        }
        value
    }
}

impl SpecimenBuilder for NumericBuilder {
    fn id(&self) -> &'static str {
        "default.numeric"
    }

    fn resolve(
        &self,
        request: &Request,
        _ctx: &mut dyn SpecimenContext,
    ) -> Result<SpecimenResult> {
        let Request::Type(key) = request else {
            return Ok(SpecimenResult::NoSpecimen);
        };
        let value = match primitive_kind(key) {
            Some(PrimitiveKind::Integer(kind)) => integer_value(kind, self.next_value()),
            Some(PrimitiveKind::Float(FloatKind::F32)) => {
                SpecimenValue::new(self.next_value() as f32)
            }
            Some(PrimitiveKind::Float(FloatKind::F64)) => {
                SpecimenValue::new(self.next_value() as f64)
            }
            _ => return Ok(SpecimenResult::NoSpecimen),
        };
        Ok(SpecimenResult::Value(value))
    }
}

fn integer_value(kind: IntKind, counter: u64) -> SpecimenValue {
    let value = (counter - 1) % kind.max_positive() + 1;
    match kind {
        IntKind::I8 => SpecimenValue::new(value as i8),
        IntKind::I16 => SpecimenValue::new(value as i16),
        IntKind::I32 => SpecimenValue::new(value as i32),
        IntKind::I64 => SpecimenValue::new(value as i64),
        IntKind::I128 => SpecimenValue::new(value as i128),
        IntKind::Isize => SpecimenValue::new(value as isize),
        IntKind::U8 => SpecimenValue::new(value as u8),
        IntKind::U16 => SpecimenValue::new(value as u16),
        IntKind::U32 => SpecimenValue::new(value as u32),
        IntKind::U64 => SpecimenValue::new(value),
        IntKind::U128 => SpecimenValue::new(value as u128),
        IntKind::Usize => SpecimenValue::new(value as usize),
    }
}

/// Strings, identifiers and characters.
///
/// A bare `String` request yields a UUID in textual form. Seeded requests
/// for `String` yield the name hint immediately followed by a UUID; named
/// parameters reach this branch through [`ParameterRelay`](crate::builders::ParameterRelay).
pub struct TextBuilder {
    rng: RefCell<ChaCha8Rng>,
    letter: Cell<u8>,
}

impl TextBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(ChaCha8Rng::seed_from_u64(seed)),
            letter: Cell::new(0),
        }
    }

    fn next_uuid(&self) -> Uuid {
        let mut bytes = [0_u8; 16];
        self.rng.borrow_mut().fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }

    fn next_char(&self) -> char {
        let offset = self.letter.get();
        self.letter.set((offset + 1) % 26);
        char::from(b'a' + offset)
    }
}

impl SpecimenBuilder for TextBuilder {
    fn id(&self) -> &'static str {
        "default.text"
    }

    fn resolve(
        &self,
        request: &Request,
        _ctx: &mut dyn SpecimenContext,
    ) -> Result<SpecimenResult> {
        let result = match request {
            Request::Type(key) if key.is::<String>() => {
                SpecimenResult::value(self.next_uuid().to_string())
            }
            Request::Type(key) if key.is::<Uuid>() => SpecimenResult::value(self.next_uuid()),
            Request::Type(key) if key.is::<char>() => SpecimenResult::value(self.next_char()),
            Request::Seeded(SeededRequest {
                name,
                declared_type,
            }) if declared_type.is::<String>() => {
                SpecimenResult::value(format!("{name}{}", self.next_uuid()))
            }
            _ => SpecimenResult::NoSpecimen,
        };
        Ok(result)
    }
}

/// Alternates `true` and `false`.
pub struct BooleanBuilder {
    next: Cell<bool>,
}

impl BooleanBuilder {
    pub fn new() -> Self {
        Self {
            next: Cell::new(true),
        }
    }
}

impl Default for BooleanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecimenBuilder for BooleanBuilder {
    fn id(&self) -> &'static str {
        "default.boolean"
    }

    fn resolve(
        &self,
        request: &Request,
        _ctx: &mut dyn SpecimenContext,
    ) -> Result<SpecimenResult> {
        match request {
            Request::Type(key) if key.is::<bool>() => {
                let value = self.next.get();
                self.next.set(!value);
                Ok(SpecimenResult::value(value))
            }
            _ => Ok(SpecimenResult::NoSpecimen),
        }
    }
}

/// Dates and UTC timestamps within `span_days` of a base date.
pub struct TemporalBuilder {
    base_date: NaiveDate,
    span_days: i64,
    rng: RefCell<ChaCha8Rng>,
}

impl TemporalBuilder {
    pub fn new(base_date: NaiveDate, span_days: i64, seed: u64) -> Self {
        Self {
            base_date,
            span_days: span_days.unsigned_abs().min(MAX_DATE_SPAN_DAYS as u64) as i64,
            rng: RefCell::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    fn next_date(&self, rng: &mut ChaCha8Rng) -> NaiveDate {
        let offset = rng.random_range(-self.span_days..=self.span_days);
        TimeDelta::try_days(offset)
            .and_then(|delta| self.base_date.checked_add_signed(delta))
            .unwrap_or(self.base_date)
    }

    fn next_timestamp(&self, rng: &mut ChaCha8Rng) -> DateTime<Utc> {
        let date = self.next_date(rng);
        let seconds = rng.random_range(0..86_400_u32);
        let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or_default();
        date.and_time(time).and_utc()
    }
}

impl SpecimenBuilder for TemporalBuilder {
    fn id(&self) -> &'static str {
        "default.temporal"
    }

    fn resolve(
        &self,
        request: &Request,
        _ctx: &mut dyn SpecimenContext,
    ) -> Result<SpecimenResult> {
        let Request::Type(key) = request else {
            return Ok(SpecimenResult::NoSpecimen);
        };
        let mut rng = self.rng.borrow_mut();
        if key.is::<NaiveDate>() {
            Ok(SpecimenResult::value(self.next_date(&mut rng)))
        } else if key.is::<DateTime<Utc>>() {
            Ok(SpecimenResult::value(self.next_timestamp(&mut rng)))
        } else {
            Ok(SpecimenResult::NoSpecimen)
        }
    }
}

fn primitive_kind(key: &TypeKey) -> Option<PrimitiveKind> {
    key.shape().and_then(|shape| shape.primitive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_values_fold_into_small_kinds() {
        let value = integer_value(IntKind::I8, 256);
        assert_eq!(value.downcast::<i8>().ok(), Some(2));
        let value = integer_value(IntKind::U8, 256);
        assert_eq!(value.downcast::<u8>().ok(), Some(1));
        let value = integer_value(IntKind::I32, 256);
        assert_eq!(value.downcast::<i32>().ok(), Some(256));
    }

    #[test]
    fn numeric_counter_restarts_at_ceiling() {
        let builder = NumericBuilder::new(3);
        let values: Vec<u64> = (0..5).map(|_| builder.next_value()).collect();
        assert_eq!(values, vec![3, 2, 1, 3, 2]);
    }

    #[test]
    fn temporal_span_is_clamped() {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        let builder = TemporalBuilder::new(base, i64::MIN, 11);
        assert_eq!(builder.span_days, MAX_DATE_SPAN_DAYS);

        let builder = TemporalBuilder::new(base, -3, 11);
        assert_eq!(builder.span_days, 3);
        let date = builder.next_date(&mut builder.rng.borrow_mut());
        assert!((date - base).num_days().abs() <= 3);
    }

    #[test]
    fn text_leaves_parameter_requests_to_the_relay() {
        let builder = TextBuilder::new(5);
        let request = Request::parameter(
            "city",
            TypeKey::of::<String>(),
            TypeKey::of::<String>(),
            specimen_core::MemberKind::Constructor,
        );
        let mut ctx = NoContext;
        let result = builder.resolve(&request, &mut ctx).expect("resolve");
        assert!(result.is_no_specimen());

        let request = Request::seeded("city", TypeKey::of::<String>());
        let value = builder
            .resolve(&request, &mut ctx)
            .expect("resolve")
            .into_value()
            .expect("value")
            .downcast::<String>()
            .ok()
            .expect("string");
        assert!(value.starts_with("city"));
    }

    struct NoContext;

    impl SpecimenContext for NoContext {
        fn resolve(&mut self, request: &Request) -> Result<SpecimenValue> {
            Err(specimen_core::SpecimenError::Unresolvable {
                request: request.clone(),
                path: Vec::new(),
            })
        }

        fn path(&self) -> &[Request] {
            &[]
        }
    }

    #[test]
    fn generated_uuids_are_version_4() {
        let builder = TextBuilder::new(7);
        let uuid = builder.next_uuid();
        assert_eq!(uuid.get_version_num(), 4);
        assert_ne!(uuid, builder.next_uuid());
    }
}
