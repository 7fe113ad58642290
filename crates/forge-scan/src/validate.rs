use crate::type_resolver::{render_type, TypeResolver};
use forge_core::{
    is_c_reserved, ExportedFunction, ExportedStruct, ForgeError, Param, Result, ReturnShape,
    SourceType, TypeMapper,
};
use std::collections::HashSet;
use std::path::Path;
use syn::{
    FnArg, Fields, GenericArgument, Ident, ItemFn, ItemStruct, Pat, PathArguments, ReturnType,
    Type, Visibility,
};

const SHAPES: &str = "result must be Result<(), E> or Result<i32|i64, E>";

pub fn function_from_item(item: &ItemFn, origin: &Path) -> Result<ExportedFunction> {
    let sig = &item.sig;
    let name = plain_ident(&sig.ident.to_string(), &sig.ident)?;
    let invalid = |reason: &str| ForgeError::invalid_signature(&name, reason);

    if matches!(item.vis, Visibility::Inherited) {
        return Err(invalid("function must be pub or pub(crate) to be called from the shim"));
    }
    if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
        return Err(invalid("generic functions cannot be exported"));
    }
    if sig.asyncness.is_some() {
        return Err(invalid("async functions cannot be exported"));
    }
    if sig.constness.is_some() {
        return Err(invalid("const functions cannot be exported"));
    }
    if sig.unsafety.is_some() {
        return Err(invalid("unsafe functions cannot be exported"));
    }
    if sig.variadic.is_some() {
        return Err(invalid("variadic functions cannot be exported"));
    }

    let shape = return_shape(&name, &sig.output)?;
    let mut function = ExportedFunction::new(name.clone(), shape).with_origin(origin);
    let mut seen = HashSet::new();

    for (index, input) in sig.inputs.iter().enumerate() {
        let typed = match input {
            FnArg::Receiver(_) => return Err(invalid("methods cannot be exported")),
            FnArg::Typed(typed) => typed,
        };

        let param_name = match typed.pat.as_ref() {
            Pat::Ident(binding) if binding.by_ref.is_none() && binding.subpat.is_none() => {
                plain_ident(&name, &binding.ident)?
            }
            Pat::Wild(_) => Param::positional_name(index),
            _ => {
                return Err(invalid(&format!(
                    "parameter {} must be a plain identifier or `_`",
                    index
                )))
            }
        };

        if is_c_reserved(&param_name) {
            return Err(invalid(&format!(
                "parameter name `{}` is reserved in C or C++",
                param_name
            )));
        }

        let decl = format!("{}.{}", name, param_name);
        let source = TypeResolver::resolve(&decl, &typed.ty)?;
        let ty = TypeMapper::map_scalar(&decl, &source)?;

        if shape.value_type().is_some() && param_name == "out" {
            return Err(invalid(
                "parameter name `out` is reserved for the result pointer",
            ));
        }
        if !seen.insert(param_name.clone()) {
            return Err(invalid(&format!("duplicate parameter name `{}`", param_name)));
        }

        function = function.param(param_name, ty);
    }

    Ok(function)
}

fn return_shape(decl: &str, output: &ReturnType) -> Result<ReturnShape> {
    let ty = match output {
        ReturnType::Default => return Err(ForgeError::invalid_signature(decl, SHAPES)),
        ReturnType::Type(_, ty) => ty.as_ref(),
    };

    let args = result_args(ty).ok_or_else(|| {
        ForgeError::invalid_signature(decl, format!("{}, got {}", SHAPES, render_type(ty)))
    })?;

    let value = args[0];
    if let Type::Tuple(tuple) = value {
        if tuple.elems.is_empty() {
            return Ok(ReturnShape::ErrorOnly);
        }
    }

    match TypeResolver::resolve(decl, value) {
        Ok(source @ (SourceType::Int32 | SourceType::Int64)) => {
            let scalar = TypeMapper::map_scalar(decl, &source)?;
            Ok(ReturnShape::ValueAndError(scalar))
        }
        _ => Err(ForgeError::invalid_signature(
            decl,
            format!("result value must be i32 or i64, got {}", render_type(value)),
        )),
    }
}

/// The type arguments of a `Result<T, E>` or single-argument `Result<T>` alias.
fn result_args(ty: &Type) -> Option<Vec<&Type>> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let types: Vec<&Type> = args
        .args
        .iter()
        .filter_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        })
        .collect();
    matches!(types.len(), 1 | 2).then_some(types)
}

pub fn struct_from_item(item: &ItemStruct, origin: &Path) -> Result<ExportedStruct> {
    let name = plain_ident(&item.ident.to_string(), &item.ident)?;
    let decl = format!("struct {}", name);
    let invalid = |reason: &str| ForgeError::invalid_signature(&decl, reason);

    if matches!(item.vis, Visibility::Inherited) {
        return Err(invalid("struct must be pub or pub(crate) to be mirrored by the shim"));
    }
    if !item.generics.params.is_empty() || item.generics.where_clause.is_some() {
        return Err(invalid("generic structs cannot be exported"));
    }
    if is_c_reserved(&name) {
        return Err(invalid("struct name is reserved in C or C++"));
    }

    let mut record = ExportedStruct::new(name.clone()).with_origin(origin);

    match &item.fields {
        Fields::Named(named) => {
            for field in &named.named {
                let Some(ident) = field.ident.as_ref() else {
                    continue;
                };
                let field_name = plain_ident(&decl, ident)?;
                let field_decl = format!("{}.{}", name, field_name);
                if matches!(field.vis, Visibility::Inherited) {
                    return Err(ForgeError::invalid_signature(
                        field_decl,
                        "field must be pub or pub(crate) to be read by the shim",
                    ));
                }
                let source = TypeResolver::resolve(&field_decl, &field.ty)?;
                record = record.field(field_name, source);
            }
        }
        Fields::Unnamed(unnamed) => {
            tracing::debug!(
                name = %name,
                dropped = unnamed.unnamed.len(),
                "dropping unnamed fields"
            );
        }
        Fields::Unit => {}
    }

    if record.fields.is_empty() {
        return Err(invalid("struct has no named fields to export"));
    }

    let mut seen = HashSet::new();
    for field in &record.fields {
        if is_c_reserved(&field.export_name) {
            return Err(invalid(&format!(
                "exported field name `{}` is reserved in C or C++",
                field.export_name
            )));
        }
        if !seen.insert(field.export_name.as_str()) {
            return Err(invalid(&format!(
                "exported field name `{}` is produced by more than one field",
                field.export_name
            )));
        }
    }

    Ok(record)
}

fn plain_ident(decl: &str, ident: &Ident) -> Result<String> {
    let text = ident.to_string();
    if text.starts_with("r#") {
        return Err(ForgeError::invalid_signature(
            decl,
            format!("raw identifier `{}` cannot be exported", text),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::ScalarType;
    use pretty_assertions::assert_eq;

    fn function(src: &str) -> Result<ExportedFunction> {
        let item: ItemFn = syn::parse_str(src).unwrap();
        function_from_item(&item, Path::new("calc.rs"))
    }

    fn record(src: &str) -> Result<ExportedStruct> {
        let item: ItemStruct = syn::parse_str(src).unwrap();
        struct_from_item(&item, Path::new("save.rs"))
    }

    fn reason(err: ForgeError) -> String {
        match err {
            ForgeError::InvalidSignature { reason, .. } => reason,
            other => panic!("expected InvalidSignature, got {:?}", other),
        }
    }

    #[test]
    fn test_value_and_error_shape() {
        let f = function("pub fn Add(a: i32, b: i32) -> Result<i32, MathError> { todo!() }")
            .unwrap();
        assert_eq!(f.name, "Add");
        assert_eq!(f.shape, ReturnShape::ValueAndError(ScalarType::Int32));
        assert_eq!(
            f.params,
            vec![
                Param::new("a", ScalarType::Int32),
                Param::new("b", ScalarType::Int32)
            ]
        );
        assert_eq!(f.origin.as_deref(), Some(Path::new("calc.rs")));
    }

    #[test]
    fn test_error_only_shape() {
        let f = function("pub fn Ping(code: i32) -> Result<(), String> { Ok(()) }").unwrap();
        assert_eq!(f.shape, ReturnShape::ErrorOnly);
    }

    #[test]
    fn test_result_aliases() {
        let f = function("pub fn Total(n: i64) -> anyhow::Result<i64> { todo!() }").unwrap();
        assert_eq!(f.shape, ReturnShape::ValueAndError(ScalarType::Int64));

        let f = function("pub(crate) fn Sync() -> std::io::Result<()> { Ok(()) }").unwrap();
        assert_eq!(f.shape, ReturnShape::ErrorOnly);
        assert!(f.params.is_empty());
    }

    #[test]
    fn test_anonymous_params_get_positional_names() {
        let f = function("pub fn Mix(_: i32, x: i64, _: i64) -> Result<(), E> { Ok(()) }")
            .unwrap();
        let names: Vec<&str> = f.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["p0", "x", "p2"]);
        assert_eq!(f.params[1].ty, ScalarType::Int64);
    }

    #[test]
    fn test_rejects_bad_results() {
        for src in [
            "pub fn A(a: i32) -> i32 { a }",
            "pub fn A(a: i32) { }",
            "pub fn A(a: i32) -> (i32, String) { todo!() }",
            "pub fn A(a: i32) -> Option<i32> { None }",
        ] {
            assert!(reason(function(src).unwrap_err()).contains("Result<(), E>"), "{}", src);
        }

        let err = function("pub fn A() -> Result<String, E> { todo!() }").unwrap_err();
        assert_eq!(reason(err), "result value must be i32 or i64, got String");
    }

    #[test]
    fn test_rejects_bad_param_types() {
        let err = function("pub fn A(name: String) -> Result<(), E> { Ok(()) }").unwrap_err();
        match err {
            ForgeError::UnsupportedType { decl, ty } => {
                assert_eq!(decl, "A.name");
                assert!(ty.starts_with("String"));
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(matches!(
            function("pub fn A(v: Vec<i32>) -> Result<(), E> { Ok(()) }"),
            Err(ForgeError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_rejects_unsupported_function_forms() {
        let cases = [
            ("fn A() -> Result<(), E> { Ok(()) }", "pub or pub(crate)"),
            ("pub fn A<T>() -> Result<(), E> { Ok(()) }", "generic"),
            ("pub async fn A() -> Result<(), E> { Ok(()) }", "async"),
            ("pub unsafe fn A() -> Result<(), E> { Ok(()) }", "unsafe"),
            ("pub fn A((a, b): (i32, i32)) -> Result<(), E> { Ok(()) }", "plain identifier"),
            ("pub fn A(out: i32) -> Result<i32, E> { Ok(out) }", "reserved"),
            ("pub fn A(_: i32, p0: i32) -> Result<(), E> { Ok(()) }", "duplicate"),
            ("pub fn r#A() -> Result<(), E> { Ok(()) }", "raw identifier"),
            ("pub const fn A() -> Result<(), E> { Ok(()) }", "const"),
            ("pub fn Resize(old: i32, new: i32) -> Result<(), E> { Ok(()) }", "`new` is reserved"),
            ("pub fn Scale(double: i64) -> Result<i64, E> { Ok(double) }", "`double` is reserved"),
            ("pub fn Fit(int32_t: i32) -> Result<(), E> { Ok(()) }", "`int32_t` is reserved"),
        ];
        for (src, expected) in cases {
            let message = reason(function(src).unwrap_err());
            assert!(message.contains(expected), "{}: {}", src, message);
        }
    }

    #[test]
    fn test_out_allowed_without_value() {
        let f = function("pub fn A(out: i32) -> Result<(), E> { Ok(()) }").unwrap();
        assert_eq!(f.params[0].name, "out");
    }

    #[test]
    fn test_struct_fields() {
        let s = record(
            "pub struct CloudSave {
                pub DeviceID: String,
                pub VectorClock: HashMap<String, i64>,
                pub Timestamp: std::time::SystemTime,
                pub Active: bool,
                pub Score: f64,
            }",
        )
        .unwrap();
        let exported: Vec<(&str, &str)> = s
            .fields
            .iter()
            .map(|f| (f.export_name.as_str(), f.abi_type.c_name()))
            .collect();
        assert_eq!(
            exported,
            vec![
                ("DeviceID", "const char*"),
                ("VectorClockJSON", "const char*"),
                ("TimestampUnix", "int64_t"),
                ("Active", "int32_t"),
                ("Score", "double"),
            ]
        );
    }

    #[test]
    fn test_struct_unsupported_field_names_struct_and_field() {
        let err = record("pub struct Line { pub From: Point, pub To: Point }").unwrap_err();
        match err {
            ForgeError::UnsupportedType { decl, ty } => {
                assert_eq!(decl, "Line.From");
                assert_eq!(ty, "Point");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_struct_rejections() {
        let cases = [
            ("struct P { pub X: i32 }", "pub or pub(crate)"),
            ("pub struct P<T> { pub X: T }", "generic"),
            ("pub struct P(pub i32, pub i32);", "no named fields"),
            ("pub struct P;", "no named fields"),
            ("pub struct P { X: i32 }", "field must be pub"),
            (
                "pub struct P { pub At: SystemTime, pub AtUnix: i64 }",
                "more than one field",
            ),
            ("pub struct Limits { pub long: i64 }", "`long` is reserved"),
            ("pub struct Limits { pub Max: i64, pub default: i32 }", "`default` is reserved"),
            ("pub struct double { pub X: i32 }", "struct name is reserved"),
        ];
        for (src, expected) in cases {
            let message = reason(record(src).unwrap_err());
            assert!(message.contains(expected), "{}: {}", src, message);
        }
    }
}
