use thiserror::Error;

use crate::request::Request;

/// Errors surfaced by specimen resolution.
#[derive(Debug, Error)]
pub enum SpecimenError {
    /// No builder, customized or default, produced a value for the request.
    #[error("no builder could resolve {request}{}", render_path(.path))]
    Unresolvable { request: Request, path: Vec<Request> },
    /// Resolution revisited a request that was already in flight.
    #[error("cyclic request: {}", render_chain(.chain))]
    Cyclic { chain: Vec<Request> },
    /// A composite type declares no constructor.
    #[error("type '{type_name}' has no constructor to select")]
    ConstructorSelection { type_name: &'static str },
    /// A builder answered a request with a value of another type.
    #[error("{request} was answered with '{actual}', expected '{expected}'")]
    TypeMismatch {
        request: Request,
        expected: &'static str,
        actual: &'static str,
    },
    /// A constructor argument, property, or sequence element could not be bound.
    #[error("member '{member}' of '{owner}': {message}")]
    Member {
        owner: &'static str,
        member: String,
        message: String,
    },
}

/// Convenience alias for results returned by Specimen crates.
pub type Result<T> = std::result::Result<T, SpecimenError>;

fn render_path(path: &[Request]) -> String {
    if path.len() < 2 {
        return String::new();
    }
    format!(" (via {})", render_chain(path))
}

fn render_chain(chain: &[Request]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{MemberKind, TypeKey};

    struct Owner;

    #[test]
    fn unresolvable_message_names_the_path() {
        let parameter = Request::parameter(
            "city",
            TypeKey::of::<String>(),
            TypeKey::opaque::<Owner>(),
            MemberKind::Constructor,
        );
        let err = SpecimenError::Unresolvable {
            request: Request::of::<String>(),
            path: vec![parameter, Request::of::<String>()],
        };
        let message = err.to_string();
        assert!(message.contains("via"));
        assert!(message.contains("'city: String'"), "{message}");
    }

    #[test]
    fn unresolvable_message_without_nesting_has_no_path() {
        let err = SpecimenError::Unresolvable {
            request: Request::of::<u8>(),
            path: vec![Request::of::<u8>()],
        };
        assert!(!err.to_string().contains("via"));
    }
}
