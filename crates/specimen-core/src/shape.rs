//! Explicit type shapes.
//!
//! Rust has no runtime reflection, so every requestable type describes how it
//! is built through [`Specimen::shape`]. Composite types list their
//! constructors and writable properties with [`Composite`]; the engine's
//! object builder picks the constructor with the most parameters and then
//! fills the remaining properties.

use std::any::{Any, type_name};
use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{Result, SpecimenError};
use crate::request::TypeKey;
use crate::value::SpecimenValue;

/// A type the engine can be asked to create.
pub trait Specimen: Any {
    fn shape() -> TypeShape;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
}

impl IntKind {
    /// Largest positive value of the kind, capped at `u64::MAX`.
    pub fn max_positive(self) -> u64 {
        match self {
            IntKind::I8 => i8::MAX as u64,
            IntKind::I16 => i16::MAX as u64,
            IntKind::I32 => i32::MAX as u64,
            IntKind::I64 => i64::MAX as u64,
            IntKind::Isize => isize::MAX as u64,
            IntKind::U8 => u8::MAX as u64,
            IntKind::U16 => u16::MAX as u64,
            IntKind::U32 => u32::MAX as u64,
            IntKind::Usize => usize::MAX as u64,
            IntKind::I128 | IntKind::U64 | IntKind::U128 => u64::MAX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Integer(IntKind),
    Float(FloatKind),
    Bool,
    Char,
    String,
    Uuid,
    Date,
    DateTime,
}

/// How a type is built.
#[derive(Debug)]
pub enum TypeShape {
    Primitive(PrimitiveKind),
    Composite(CompositeShape),
    Sequence(SequenceShape),
    /// Declared but not constructible without a registered rule.
    Abstract,
}

impl TypeShape {
    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self {
            TypeShape::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }
}

/// Declared constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: &'static str,
    pub ty: TypeKey,
}

pub fn param<T: Specimen>(name: &'static str) -> ParameterInfo {
    ParameterInfo {
        name,
        ty: TypeKey::of::<T>(),
    }
}

/// Resolved constructor arguments, consumed in declaration order.
pub struct Arguments<'a> {
    owner: &'static str,
    parameters: &'a [ParameterInfo],
    values: std::vec::IntoIter<SpecimenValue>,
    index: usize,
}

impl<'a> Arguments<'a> {
    pub fn new(
        owner: &'static str,
        parameters: &'a [ParameterInfo],
        values: Vec<SpecimenValue>,
    ) -> Self {
        Self {
            owner,
            parameters,
            values: values.into_iter(),
            index: 0,
        }
    }

    /// Takes the next argument as `T`.
    pub fn take<T: Any>(&mut self) -> Result<T> {
        let member = self
            .parameters
            .get(self.index)
            .map(|parameter| parameter.name.to_string())
            .unwrap_or_else(|| format!("#{}", self.index));
        self.index += 1;

        let Some(value) = self.values.next() else {
            return Err(SpecimenError::Member {
                owner: self.owner,
                member,
                message: "missing argument".to_string(),
            });
        };
        value.downcast::<T>().map_err(|value| SpecimenError::Member {
            owner: self.owner,
            member,
            message: format!(
                "expected '{}', got '{}'",
                type_name::<T>(),
                value.type_name()
            ),
        })
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

type BuildFn = Box<dyn Fn(&mut Arguments<'_>) -> Result<Box<dyn Any>>>;
type AssignFn = Box<dyn Fn(&mut dyn Any, SpecimenValue) -> Result<()>>;

pub struct ConstructorShape {
    parameters: Vec<ParameterInfo>,
    build: BuildFn,
}

impl ConstructorShape {
    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    pub fn invoke(&self, owner: &'static str, values: Vec<SpecimenValue>) -> Result<Box<dyn Any>> {
        let mut arguments = Arguments::new(owner, &self.parameters, values);
        (self.build)(&mut arguments)
    }
}

impl fmt::Debug for ConstructorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorShape")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

pub struct PropertyShape {
    name: &'static str,
    ty: TypeKey,
    assign: AssignFn,
}

impl PropertyShape {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ty(&self) -> TypeKey {
        self.ty
    }

    pub fn assign(&self, target: &mut dyn Any, value: SpecimenValue) -> Result<()> {
        (self.assign)(target, value)
    }
}

impl fmt::Debug for PropertyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyShape")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct CompositeShape {
    type_name: &'static str,
    constructors: Vec<ConstructorShape>,
    properties: Vec<PropertyShape>,
}

impl CompositeShape {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn constructors(&self) -> &[ConstructorShape] {
        &self.constructors
    }

    pub fn properties(&self) -> &[PropertyShape] {
        &self.properties
    }

    /// Constructor with the most parameters; the first declared wins ties.
    pub fn select_constructor(&self) -> Option<&ConstructorShape> {
        let mut selected: Option<&ConstructorShape> = None;
        for constructor in &self.constructors {
            if selected.is_none_or(|current| constructor.parameters.len() > current.parameters.len())
            {
                selected = Some(constructor);
            }
        }
        selected
    }
}

/// Typed builder for a [`CompositeShape`].
pub struct Composite<T> {
    shape: CompositeShape,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any> Composite<T> {
    pub fn new() -> Self {
        Self {
            shape: CompositeShape {
                type_name: type_name::<T>(),
                constructors: Vec::new(),
                properties: Vec::new(),
            },
            _marker: PhantomData,
        }
    }

    pub fn constructor<F>(mut self, parameters: Vec<ParameterInfo>, build: F) -> Self
    where
        F: Fn(&mut Arguments<'_>) -> Result<T> + 'static,
    {
        self.shape.constructors.push(ConstructorShape {
            parameters,
            build: Box::new(move |arguments: &mut Arguments<'_>| {
                build(arguments).map(|value| Box::new(value) as Box<dyn Any>)
            }),
        });
        self
    }

    pub fn constructor0<F>(self, build: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        self.constructor(Vec::new(), move |_: &mut Arguments<'_>| Ok(build()))
    }

    pub fn constructor1<A, F>(self, a: &'static str, build: F) -> Self
    where
        A: Specimen,
        F: Fn(A) -> T + 'static,
    {
        self.constructor(vec![param::<A>(a)], move |args: &mut Arguments<'_>| {
            Ok(build(args.take::<A>()?))
        })
    }

    pub fn constructor2<A, B, F>(self, a: &'static str, b: &'static str, build: F) -> Self
    where
        A: Specimen,
        B: Specimen,
        F: Fn(A, B) -> T + 'static,
    {
        self.constructor(
            vec![param::<A>(a), param::<B>(b)],
            move |args: &mut Arguments<'_>| {
                let a = args.take::<A>()?;
                let b = args.take::<B>()?;
                Ok(build(a, b))
            },
        )
    }

    pub fn constructor3<A, B, C, F>(
        self,
        a: &'static str,
        b: &'static str,
        c: &'static str,
        build: F,
    ) -> Self
    where
        A: Specimen,
        B: Specimen,
        C: Specimen,
        F: Fn(A, B, C) -> T + 'static,
    {
        self.constructor(
            vec![param::<A>(a), param::<B>(b), param::<C>(c)],
            move |args: &mut Arguments<'_>| {
                let a = args.take::<A>()?;
                let b = args.take::<B>()?;
                let c = args.take::<C>()?;
                Ok(build(a, b, c))
            },
        )
    }

    /// Writable property filled after construction unless a selected
    /// constructor parameter already carries the same name.
    pub fn property<P, F>(mut self, name: &'static str, assign: F) -> Self
    where
        P: Specimen,
        F: Fn(&mut T, P) + 'static,
    {
        let owner = type_name::<T>();
        self.shape.properties.push(PropertyShape {
            name,
            ty: TypeKey::of::<P>(),
            assign: Box::new(move |target: &mut dyn Any, value: SpecimenValue| {
                let target = target
                    .downcast_mut::<T>()
                    .ok_or_else(|| SpecimenError::Member {
                        owner,
                        member: name.to_string(),
                        message: "assignment target is not the owner type".to_string(),
                    })?;
                let value = value.downcast::<P>().map_err(|value| SpecimenError::Member {
                    owner,
                    member: name.to_string(),
                    message: format!(
                        "expected '{}', got '{}'",
                        type_name::<P>(),
                        value.type_name()
                    ),
                })?;
                assign(target, value);
                Ok(())
            }),
        });
        self
    }

    pub fn build(self) -> TypeShape {
        TypeShape::Composite(self.shape)
    }
}

impl<T: Any> Default for Composite<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Homogeneous collection built from independently resolved elements.
#[derive(Debug)]
pub struct SequenceShape {
    element: TypeKey,
    length: Option<usize>,
    collect: fn(Vec<SpecimenValue>) -> Result<SpecimenValue>,
}

impl SequenceShape {
    pub fn vec<T: Specimen>() -> Self {
        Self {
            element: TypeKey::of::<T>(),
            length: None,
            collect: collect_vec::<T>,
        }
    }

    pub fn array<T: Specimen, const N: usize>() -> Self {
        Self {
            element: TypeKey::of::<T>(),
            length: Some(N),
            collect: collect_array::<T, N>,
        }
    }

    pub fn element(&self) -> TypeKey {
        self.element
    }

    /// Fixed length, when the collection type dictates one.
    pub fn length(&self) -> Option<usize> {
        self.length
    }

    pub fn collect(&self, items: Vec<SpecimenValue>) -> Result<SpecimenValue> {
        (self.collect)(items)
    }
}

fn downcast_elements<T: Any>(items: Vec<SpecimenValue>, owner: &'static str) -> Result<Vec<T>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            item.downcast::<T>().map_err(|item| SpecimenError::Member {
                owner,
                member: format!("[{index}]"),
                message: format!(
                    "expected '{}', got '{}'",
                    type_name::<T>(),
                    item.type_name()
                ),
            })
        })
        .collect()
}

fn collect_vec<T: Specimen>(items: Vec<SpecimenValue>) -> Result<SpecimenValue> {
    let elements = downcast_elements::<T>(items, type_name::<Vec<T>>())?;
    Ok(SpecimenValue::new(elements))
}

fn collect_array<T: Specimen, const N: usize>(items: Vec<SpecimenValue>) -> Result<SpecimenValue> {
    let owner = type_name::<[T; N]>();
    let elements = downcast_elements::<T>(items, owner)?;
    let len = elements.len();
    let array: [T; N] = elements.try_into().map_err(|_| SpecimenError::Member {
        owner,
        member: "length".to_string(),
        message: format!("expected {N} elements, got {len}"),
    })?;
    Ok(SpecimenValue::new(array))
}

macro_rules! primitive_specimen {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl Specimen for $ty {
                fn shape() -> TypeShape {
                    TypeShape::Primitive($kind)
                }
            }
        )*
    };
}

primitive_specimen! {
    i8 => PrimitiveKind::Integer(IntKind::I8),
    i16 => PrimitiveKind::Integer(IntKind::I16),
    i32 => PrimitiveKind::Integer(IntKind::I32),
    i64 => PrimitiveKind::Integer(IntKind::I64),
    i128 => PrimitiveKind::Integer(IntKind::I128),
    isize => PrimitiveKind::Integer(IntKind::Isize),
    u8 => PrimitiveKind::Integer(IntKind::U8),
    u16 => PrimitiveKind::Integer(IntKind::U16),
    u32 => PrimitiveKind::Integer(IntKind::U32),
    u64 => PrimitiveKind::Integer(IntKind::U64),
    u128 => PrimitiveKind::Integer(IntKind::U128),
    usize => PrimitiveKind::Integer(IntKind::Usize),
    f32 => PrimitiveKind::Float(FloatKind::F32),
    f64 => PrimitiveKind::Float(FloatKind::F64),
    bool => PrimitiveKind::Bool,
    char => PrimitiveKind::Char,
    String => PrimitiveKind::String,
    Uuid => PrimitiveKind::Uuid,
    NaiveDate => PrimitiveKind::Date,
    DateTime<Utc> => PrimitiveKind::DateTime,
}

impl<T: Specimen> Specimen for Vec<T> {
    fn shape() -> TypeShape {
        TypeShape::Sequence(SequenceShape::vec::<T>())
    }
}

impl<T: Specimen, const N: usize> Specimen for [T; N] {
    fn shape() -> TypeShape {
        TypeShape::Sequence(SequenceShape::array::<T, N>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
        label: String,
    }

    fn point_shape() -> CompositeShape {
        let shape = Composite::<Point>::new()
            .constructor1::<i32, _>("x", |x| Point {
                x,
                y: 0,
                label: String::new(),
            })
            .constructor2::<i32, i32, _>("x", "y", |x, y| Point {
                x,
                y,
                label: String::new(),
            })
            .constructor2::<i32, String, _>("x", "label", |x, label| Point { x, y: 0, label })
            .property::<String, _>("label", |point, label| point.label = label)
            .build();
        match shape {
            TypeShape::Composite(shape) => shape,
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn select_constructor_prefers_most_parameters_then_declaration_order() {
        let shape = point_shape();
        let selected = shape.select_constructor().expect("constructor");
        let names: Vec<_> = selected.parameters().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn select_constructor_is_none_without_constructors() {
        let shape = Composite::<Point>::new().build();
        let TypeShape::Composite(shape) = shape else {
            panic!("expected composite");
        };
        assert!(shape.select_constructor().is_none());
    }

    #[test]
    fn constructor_rejects_mistyped_argument() {
        let shape = point_shape();
        let constructor = shape.select_constructor().expect("constructor");
        let err = constructor
            .invoke(
                "Point",
                vec![SpecimenValue::new(1_i32), SpecimenValue::new("y".to_string())],
            )
            .expect_err("mistyped");
        match err {
            SpecimenError::Member { member, .. } => assert_eq!(member, "y"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn property_assigns_typed_value() {
        let shape = point_shape();
        let constructor = shape.select_constructor().expect("constructor");
        let mut instance = constructor
            .invoke(
                "Point",
                vec![SpecimenValue::new(1_i32), SpecimenValue::new(2_i32)],
            )
            .expect("instance");
        shape.properties()[0]
            .assign(instance.as_mut(), SpecimenValue::new("here".to_string()))
            .expect("assign");
        let point = instance.downcast::<Point>().expect("point");
        assert_eq!(
            *point,
            Point {
                x: 1,
                y: 2,
                label: "here".to_string()
            }
        );
    }

    #[test]
    fn array_shape_checks_length() {
        let shape = SequenceShape::array::<u8, 2>();
        assert_eq!(shape.length(), Some(2));
        let err = shape
            .collect(vec![SpecimenValue::new(1_u8)])
            .expect_err("too short");
        assert!(matches!(err, SpecimenError::Member { .. }));

        let value = shape
            .collect(vec![SpecimenValue::new(1_u8), SpecimenValue::new(2_u8)])
            .expect("array");
        assert_eq!(value.downcast::<[u8; 2]>().ok(), Some([1, 2]));
    }
}
