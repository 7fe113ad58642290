use crate::{CompilationUnit, ExportedFunction, ExportedStruct, ForgeError, ReturnShape};
use crate::{Param, ScalarType, SourceType};
use pretty_assertions::assert_eq;

fn add() -> ExportedFunction {
    ExportedFunction::new("Add", ReturnShape::ValueAndError(ScalarType::Int32))
        .param("a", ScalarType::Int32)
        .param("b", ScalarType::Int32)
}

fn ping() -> ExportedFunction {
    ExportedFunction::new("Ping", ReturnShape::ErrorOnly).param("code", ScalarType::Int32)
}

#[test]
fn test_function_builder() {
    let f = add();
    assert_eq!(f.symbol("PM_"), "PM_Add");
    assert!(f.has_value());
    assert_eq!(f.shape.value_type(), Some(ScalarType::Int32));
    assert_eq!(
        f.params,
        vec![
            Param::new("a", ScalarType::Int32),
            Param::new("b", ScalarType::Int32)
        ]
    );

    assert!(!ping().has_value());
    assert_eq!(Param::positional_name(2), "p2");
}

#[test]
fn test_sorted_orders_by_name() {
    let mut unit = CompilationUnit::new();
    unit.add_function(ping()).unwrap();
    unit.add_function(add()).unwrap();
    unit.add_struct(ExportedStruct::new("Zeta").field("A", SourceType::Int32))
        .unwrap();
    unit.add_struct(ExportedStruct::new("Alpha").field("B", SourceType::Int64))
        .unwrap();

    let sorted = unit.sorted();
    let functions: Vec<&str> = sorted.functions().iter().map(|f| f.name.as_str()).collect();
    let structs: Vec<&str> = sorted.structs().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(functions, vec!["Add", "Ping"]);
    assert_eq!(structs, vec!["Alpha", "Zeta"]);
}

#[test]
fn test_sorted_is_independent_of_discovery_order() {
    let mut forward = CompilationUnit::new();
    forward.add_function(add()).unwrap();
    forward.add_function(ping()).unwrap();

    let mut backward = CompilationUnit::new();
    backward.add_function(ping()).unwrap();
    backward.add_function(add()).unwrap();

    assert_eq!(forward.sorted(), backward.sorted());
}

#[test]
fn test_duplicate_function_rejected() {
    let mut unit = CompilationUnit::new();
    unit.add_function(add().with_origin("src/a.rs")).unwrap();

    let err = unit
        .add_function(add().with_origin("src/b.rs"))
        .unwrap_err();
    match err {
        ForgeError::InvalidSignature { decl, reason } => {
            assert_eq!(decl, "Add");
            assert!(reason.contains("src/a.rs"));
            assert!(reason.contains("src/b.rs"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(unit.functions().len(), 1);
}

#[test]
fn test_duplicate_struct_rejected() {
    let mut unit = CompilationUnit::new();
    unit.add_struct(ExportedStruct::new("Point")).unwrap();
    assert!(unit.add_struct(ExportedStruct::new("Point")).is_err());
}

#[test]
fn test_no_functions_is_reported() {
    let mut unit = CompilationUnit::new();
    assert!(unit.is_empty_of_functions());
    unit.add_struct(ExportedStruct::new("Point").field("X", SourceType::Int32))
        .unwrap();
    assert!(unit.is_empty_of_functions());
    unit.add_function(ping()).unwrap();
    assert!(!unit.is_empty_of_functions());
}

#[test]
fn test_unit_serializes_for_inspection() {
    let mut unit = CompilationUnit::new();
    unit.add_function(ping()).unwrap();

    let json = serde_json::to_value(unit.sorted()).unwrap();
    assert_eq!(json["functions"][0]["name"], "Ping");
    assert_eq!(json["functions"][0]["shape"], "ErrorOnly");
    assert_eq!(json["functions"][0]["params"][0]["ty"], "Int32");
    assert!(json["functions"][0].get("origin").is_none());
}
