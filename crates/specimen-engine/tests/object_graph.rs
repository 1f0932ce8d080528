use uuid::Uuid;

use specimen_engine::logging::init_test_logging;
use specimen_engine::{
    Composite, Engine, Request, Specimen, SpecimenError, SpecimenResult, TypeKey, TypeShape,
    from_fn,
};

#[derive(Debug)]
struct SampleClass {
    sample_string_field: String,
    reassigned: bool,
    some_property: String,
    some_enumeration: Vec<String>,
    some_int: i32,
}

impl Specimen for SampleClass {
    fn shape() -> TypeShape {
        Composite::<SampleClass>::new()
            .constructor1::<String, _>("sample_string_field", |sample_string_field| {
                SampleClass {
                    sample_string_field,
                    reassigned: false,
                    some_property: String::new(),
                    some_enumeration: Vec::new(),
                    some_int: 0,
                }
            })
            .property::<String, _>("Sample_String_Field", |sample, value| {
                sample.sample_string_field = value;
                sample.reassigned = true;
            })
            .property::<String, _>("some_property", |sample, value| sample.some_property = value)
            .property::<Vec<String>, _>("some_enumeration", |sample, value| {
                sample.some_enumeration = value
            })
            .property::<i32, _>("some_int", |sample, value| sample.some_int = value)
            .build()
    }
}

#[derive(Debug)]
struct Widget {
    built_with: &'static str,
}

impl Specimen for Widget {
    fn shape() -> TypeShape {
        Composite::<Widget>::new()
            .constructor1::<i32, _>("width", |_| Widget { built_with: "width" })
            .constructor2::<i32, i32, _>("width", "height", |_, _| Widget {
                built_with: "width,height",
            })
            .constructor2::<String, bool, _>("label", "visible", |_, _| Widget {
                built_with: "label,visible",
            })
            .constructor0(|| Widget { built_with: "none" })
            .build()
    }
}

#[derive(Debug)]
struct Sealed;

impl Specimen for Sealed {
    fn shape() -> TypeShape {
        Composite::<Sealed>::new().build()
    }
}

#[derive(Debug, Clone)]
struct Notifier;

impl Specimen for Notifier {
    fn shape() -> TypeShape {
        TypeShape::Abstract
    }
}

#[derive(Debug)]
struct Gateway {
    notifier: Notifier,
}

impl Specimen for Gateway {
    fn shape() -> TypeShape {
        Composite::<Gateway>::new()
            .constructor1::<Notifier, _>("notifier", |notifier| Gateway { notifier })
            .build()
    }
}

#[allow(dead_code)]
#[derive(Debug)]
struct Parent {
    child: Child,
}

#[allow(dead_code)]
#[derive(Debug)]
struct Child {
    parent: Box<Parent>,
}

impl Specimen for Parent {
    fn shape() -> TypeShape {
        Composite::<Parent>::new()
            .constructor1::<Child, _>("child", |child| Parent { child })
            .build()
    }
}

impl Specimen for Child {
    fn shape() -> TypeShape {
        Composite::<Child>::new()
            .constructor1::<Parent, _>("parent", |parent| Child {
                parent: Box::new(parent),
            })
            .build()
    }
}

#[test]
fn sample_class_is_fully_populated() {
    let _ = init_test_logging("specimen_engine=trace");
    let engine = Engine::new();
    let sample = engine.create::<SampleClass>().expect("sample");

    let rest = sample
        .sample_string_field
        .strip_prefix("sample_string_field")
        .expect("constructor parameter name prefix");
    assert!(Uuid::parse_str(rest).is_ok());
    assert!(!sample.reassigned, "constructor parameter is not refilled");

    assert!(sample.some_property.starts_with("some_property"));
    assert_eq!(sample.some_enumeration.len(), 3);
    assert!(
        sample
            .some_enumeration
            .iter()
            .all(|value| Uuid::parse_str(value).is_ok())
    );
    assert!(sample.some_int > 0 && sample.some_int <= 256);
}

#[test]
fn greediest_constructor_wins() {
    let engine = Engine::new();
    let widget = engine.create::<Widget>().expect("widget");
    assert_eq!(widget.built_with, "width,height");
}

#[test]
fn type_without_constructor_is_rejected() {
    let engine = Engine::new();
    let err = engine.create::<Sealed>().expect_err("no constructor");
    assert!(matches!(err, SpecimenError::ConstructorSelection { .. }));
}

#[test]
fn unresolvable_parameter_reports_its_path() {
    let engine = Engine::new();
    let err = engine.create::<Gateway>().expect_err("abstract parameter");
    match err {
        SpecimenError::Unresolvable { request, path } => {
            assert_eq!(request, Request::of::<Notifier>());
            assert_eq!(path.first(), Some(&Request::of::<Gateway>()));
            assert!(path.iter().any(|step| step.name_hint() == Some("notifier")));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn registered_abstract_parameter_resolves() {
    let mut engine = Engine::new();
    engine.register(|| Notifier);
    let gateway = engine.create::<Gateway>().expect("gateway");
    assert!(matches!(gateway.notifier, Notifier));
}

#[test]
fn recursive_graph_is_reported_as_cycle() {
    let engine = Engine::new();
    let err = engine.create::<Parent>().expect_err("cycle");
    match err {
        SpecimenError::Cyclic { chain } => {
            assert_eq!(chain.first(), Some(&Request::of::<Parent>()));
            assert_eq!(chain.last(), Some(&Request::of::<Parent>()));
            assert!(chain.contains(&Request::of::<Child>()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn mistyped_builder_result_is_reported() {
    let mut engine = Engine::new();
    engine.customize(from_fn(|request, _ctx| match request.as_type() {
        Some(key) if key.is::<String>() => Ok(SpecimenResult::value(42_i64)),
        _ => Ok(SpecimenResult::NoSpecimen),
    }));

    let err = engine.create::<String>().expect_err("mistyped");
    match err {
        SpecimenError::TypeMismatch {
            request,
            expected,
            actual,
        } => {
            assert_eq!(request, Request::of::<String>());
            assert_eq!(expected, std::any::type_name::<String>());
            assert_eq!(actual, "i64");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn resolve_accepts_parameter_requests_directly() {
    let engine = Engine::new();
    let request = Request::parameter(
        "city",
        TypeKey::of::<String>(),
        TypeKey::of::<Gateway>(),
        specimen_engine::MemberKind::Constructor,
    );
    let value = engine
        .resolve(&request)
        .expect("value")
        .into_typed::<String>(&request)
        .expect("string");
    assert!(value.starts_with("city"));
}
