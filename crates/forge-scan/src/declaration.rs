use syn::{AttrStyle, Attribute, Expr, ExprLit, Item, ItemFn, ItemStruct, Lit, Meta};

pub const EXPORT_MARKER: &str = "capi:export";

/// A top-level item, as far as the exporter is concerned.
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'a> {
    Function(&'a ItemFn),
    StructType(&'a ItemStruct),
    Ignored,
}

impl<'a> Declaration<'a> {
    pub fn classify(item: &'a Item) -> Self {
        match item {
            Item::Fn(function) if has_export_marker(&function.attrs) => {
                Declaration::Function(function)
            }
            Item::Struct(record) if has_export_marker(&record.attrs) => {
                Declaration::StructType(record)
            }
            other => {
                if item_attrs(other).is_some_and(has_export_marker) {
                    tracing::debug!(
                        item = item_kind(other),
                        "ignoring marked item that is neither a function nor a struct"
                    );
                }
                Declaration::Ignored
            }
        }
    }
}

/// True when an outer doc comment on the item mentions the export marker.
pub fn has_export_marker(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        if attr.style != AttrStyle::Outer || !attr.path().is_ident("doc") {
            return false;
        }
        match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(text),
                    ..
                }) => text.value().contains(EXPORT_MARKER),
                _ => false,
            },
            _ => false,
        }
    })
}

fn item_attrs(item: &Item) -> Option<&[Attribute]> {
    match item {
        Item::Const(i) => Some(&i.attrs),
        Item::Enum(i) => Some(&i.attrs),
        Item::Fn(i) => Some(&i.attrs),
        Item::Impl(i) => Some(&i.attrs),
        Item::Mod(i) => Some(&i.attrs),
        Item::Static(i) => Some(&i.attrs),
        Item::Struct(i) => Some(&i.attrs),
        Item::Trait(i) => Some(&i.attrs),
        Item::Type(i) => Some(&i.attrs),
        Item::Union(i) => Some(&i.attrs),
        _ => None,
    }
}

fn item_kind(item: &Item) -> &'static str {
    match item {
        Item::Const(_) => "const",
        Item::Enum(_) => "enum",
        Item::Fn(_) => "fn",
        Item::Impl(_) => "impl",
        Item::Mod(_) => "mod",
        Item::Static(_) => "static",
        Item::Struct(_) => "struct",
        Item::Trait(_) => "trait",
        Item::Type(_) => "type",
        Item::Union(_) => "union",
        _ => "item",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_names(src: &str) -> Vec<(String, &'static str)> {
        let file = syn::parse_file(src).unwrap();
        file.items
            .iter()
            .map(Declaration::classify)
            .filter_map(|decl| match decl {
                Declaration::Function(function) => Some((function.sig.ident.to_string(), "fn")),
                Declaration::StructType(record) => Some((record.ident.to_string(), "struct")),
                Declaration::Ignored => None,
            })
            .collect()
    }

    #[test]
    fn test_marker_on_functions_and_structs() {
        let found = classify_names(
            r#"
/// capi:export
pub fn Add(a: i32, b: i32) -> Result<i32, String> { Ok(a + b) }

/// Adds things.
///
/// capi:export
pub struct Point { pub X: i32 }

pub fn unmarked() {}
"#,
        );
        assert_eq!(
            found,
            vec![("Add".to_string(), "fn"), ("Point".to_string(), "struct")]
        );
    }

    #[test]
    fn test_doc_attribute_form_counts() {
        let found = classify_names(
            r#"
#[doc = " capi:export "]
pub fn Ping(code: i32) -> Result<(), String> { Ok(()) }
"#,
        );
        assert_eq!(found, vec![("Ping".to_string(), "fn")]);
    }

    #[test]
    fn test_plain_comments_and_inner_docs_do_not_count() {
        let found = classify_names(
            r#"
//! capi:export
// capi:export
pub fn Hidden(code: i32) -> Result<(), String> { Ok(()) }
"#,
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_marked_enum_is_ignored() {
        let file = syn::parse_file(
            r#"
/// capi:export
pub enum Mode { A, B }
"#,
        )
        .unwrap();
        assert!(matches!(
            Declaration::classify(&file.items[0]),
            Declaration::Ignored
        ));
    }
}
