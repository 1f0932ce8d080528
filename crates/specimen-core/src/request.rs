use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::shape::{Specimen, TypeShape};

/// Identity of a requestable type.
///
/// Equality and hashing only consider the underlying [`TypeId`]; the name and
/// the shape function are carried along for diagnostics and for the default
/// builders.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    shape: Option<fn() -> TypeShape>,
}

impl TypeKey {
    /// Key for a type that describes its own shape.
    pub fn of<T: Specimen>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            shape: Some(T::shape),
        }
    }

    /// Key for a type the engine cannot build on its own.
    pub fn opaque<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            shape: None,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name with module paths stripped, e.g. `Vec<String>`.
    pub fn short_name(&self) -> String {
        short_type_name(self.name)
    }

    /// Shape of the type, or `None` for opaque keys.
    pub fn shape(&self) -> Option<TypeShape> {
        self.shape.map(|shape| shape())
    }

    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

/// Member of an owner type a parameter request originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Constructor,
    Property,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Constructor => f.write_str("constructor parameter"),
            MemberKind::Property => f.write_str("property"),
        }
    }
}

/// Named constructor parameter or property of a declared owner type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterRequest {
    pub name: String,
    pub declared_type: TypeKey,
    pub owner: TypeKey,
    pub member_kind: MemberKind,
}

/// Request for several independently resolved elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceRequest {
    pub element: TypeKey,
    pub count: Option<usize>,
}

/// Request for a type carrying a caller supplied name hint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeededRequest {
    pub name: String,
    pub declared_type: TypeKey,
}

/// Immutable description of what is being asked for.
///
/// `Type` and `Parameter` are distinct shapes: a builder that only inspects
/// `Type` requests never intercepts constructor parameters or properties,
/// even when they share the declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Request {
    Type(TypeKey),
    Parameter(ParameterRequest),
    Sequence(SequenceRequest),
    Seeded(SeededRequest),
}

impl Request {
    pub fn of<T: Specimen>() -> Self {
        Request::Type(TypeKey::of::<T>())
    }

    pub fn parameter(
        name: impl Into<String>,
        declared_type: TypeKey,
        owner: TypeKey,
        member_kind: MemberKind,
    ) -> Self {
        Request::Parameter(ParameterRequest {
            name: name.into(),
            declared_type,
            owner,
            member_kind,
        })
    }

    pub fn sequence(element: TypeKey, count: Option<usize>) -> Self {
        Request::Sequence(SequenceRequest { element, count })
    }

    pub fn seeded(name: impl Into<String>, declared_type: TypeKey) -> Self {
        Request::Seeded(SeededRequest {
            name: name.into(),
            declared_type,
        })
    }

    pub fn as_type(&self) -> Option<&TypeKey> {
        match self {
            Request::Type(key) => Some(key),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&ParameterRequest> {
        match self {
            Request::Parameter(parameter) => Some(parameter),
            _ => None,
        }
    }

    /// Type of the value the request ultimately produces, if it is a single value.
    pub fn declared_type(&self) -> Option<&TypeKey> {
        match self {
            Request::Type(key) => Some(key),
            Request::Parameter(parameter) => Some(&parameter.declared_type),
            Request::Seeded(seeded) => Some(&seeded.declared_type),
            Request::Sequence(_) => None,
        }
    }

    /// Name hint carried by parameter and seeded requests.
    pub fn name_hint(&self) -> Option<&str> {
        match self {
            Request::Parameter(parameter) => Some(parameter.name.as_str()),
            Request::Seeded(seeded) => Some(seeded.name.as_str()),
            Request::Type(_) | Request::Sequence(_) => None,
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Type(key) => write!(f, "{key}"),
            Request::Parameter(parameter) => write!(
                f,
                "{} '{}: {}' of {}",
                parameter.member_kind, parameter.name, parameter.declared_type, parameter.owner
            ),
            Request::Sequence(sequence) => match sequence.count {
                Some(count) => write!(f, "sequence of {count} x {}", sequence.element),
                None => write!(f, "sequence of {}", sequence.element),
            },
            Request::Seeded(seeded) => {
                write!(f, "{} seeded with '{}'", seeded.declared_type, seeded.name)
            }
        }
    }
}

fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut token = String::new();
    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            token.push(ch);
        } else {
            out.push_str(last_segment(&token));
            token.clear();
            out.push(ch);
        }
    }
    out.push_str(last_segment(&token));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Address;
    struct CityHolder;

    #[test]
    fn parameter_requests_compare_every_field() {
        let address_city = Request::parameter(
            "city",
            TypeKey::of::<String>(),
            TypeKey::opaque::<Address>(),
            MemberKind::Constructor,
        );
        let holder_city = Request::parameter(
            "city",
            TypeKey::of::<String>(),
            TypeKey::opaque::<CityHolder>(),
            MemberKind::Constructor,
        );
        let address_property = Request::parameter(
            "city",
            TypeKey::of::<String>(),
            TypeKey::opaque::<Address>(),
            MemberKind::Property,
        );

        assert_eq!(address_city, address_city.clone());
        assert_ne!(address_city, holder_city);
        assert_ne!(address_city, address_property);
        assert_ne!(address_city, Request::of::<String>());
    }

    #[test]
    fn type_keys_ignore_how_they_were_built() {
        assert_eq!(TypeKey::of::<i32>(), TypeKey::opaque::<i32>());
        assert!(TypeKey::opaque::<i32>().shape().is_none());
        assert!(TypeKey::of::<i32>().shape().is_some());
    }

    #[test]
    fn display_uses_short_type_names() {
        assert_eq!(Request::of::<Vec<String>>().to_string(), "Vec<String>");
        let request = Request::parameter(
            "city",
            TypeKey::of::<String>(),
            TypeKey::opaque::<Address>(),
            MemberKind::Constructor,
        );
        assert_eq!(
            request.to_string(),
            "constructor parameter 'city: String' of Address"
        );
        assert_eq!(
            Request::sequence(TypeKey::of::<i32>(), Some(3)).to_string(),
            "sequence of 3 x i32"
        );
    }

    #[test]
    fn name_hint_only_for_named_requests() {
        assert_eq!(
            Request::seeded("Foo", TypeKey::of::<String>()).name_hint(),
            Some("Foo")
        );
        assert_eq!(Request::of::<String>().name_hint(), None);
    }
}
