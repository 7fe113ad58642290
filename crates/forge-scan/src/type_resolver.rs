use forge_core::{ForgeError, MapKind, Result, SourceType, TimestampKind};
use quote::ToTokens;
use syn::{GenericArgument, Path, PathArguments, Type};

pub struct TypeResolver;

impl TypeResolver {
    pub fn resolve(decl: &str, ty: &Type) -> Result<SourceType> {
        match ty {
            Type::Path(type_path) if type_path.qself.is_none() => {
                Self::resolve_path(decl, ty, &type_path.path)
            }
            Type::Group(group) => Self::resolve(decl, &group.elem),
            Type::Paren(paren) => Self::resolve(decl, &paren.elem),
            _ => Err(ForgeError::unsupported_type(decl, render_type(ty))),
        }
    }

    fn resolve_path(decl: &str, ty: &Type, path: &Path) -> Result<SourceType> {
        let unsupported = || ForgeError::unsupported_type(decl, render_type(ty));
        let segment = path.segments.last().ok_or_else(unsupported)?;
        let ident = segment.ident.to_string();

        match (ident.as_str(), &segment.arguments) {
            ("i32", PathArguments::None) => Ok(SourceType::Int32),
            ("i64", PathArguments::None) => Ok(SourceType::Int64),
            ("String", PathArguments::None) => Ok(SourceType::Text),
            ("bool", PathArguments::None) => Ok(SourceType::Bool),
            ("f64", PathArguments::None) => Ok(SourceType::Float64),
            ("SystemTime", PathArguments::None) => {
                Ok(SourceType::Timestamp(TimestampKind::SystemTime))
            }
            ("DateTime", PathArguments::AngleBracketed(args)) if args.args.len() == 1 => {
                Ok(SourceType::Timestamp(TimestampKind::ChronoDateTime))
            }
            ("HashMap", PathArguments::AngleBracketed(args)) => {
                Self::resolve_map(decl, ty, MapKind::HashMap, type_args(&args.args))
            }
            ("BTreeMap", PathArguments::AngleBracketed(args)) => {
                Self::resolve_map(decl, ty, MapKind::BTreeMap, type_args(&args.args))
            }
            _ => Err(unsupported()),
        }
    }

    fn resolve_map(decl: &str, ty: &Type, kind: MapKind, args: Vec<&Type>) -> Result<SourceType> {
        if let [key, value] = args.as_slice() {
            let key = Self::resolve(decl, key).ok();
            let value = Self::resolve(decl, value).ok();
            if key == Some(SourceType::Text) && value == Some(SourceType::Int64) {
                return Ok(SourceType::StringInt64Map(kind));
            }
        }
        Err(ForgeError::unsupported_type(
            decl,
            format!("{} (only String -> i64 maps are supported)", render_type(ty)),
        ))
    }
}

fn type_args<'a>(
    args: &'a syn::punctuated::Punctuated<GenericArgument, syn::token::Comma>,
) -> Vec<&'a Type> {
    args.iter()
        .filter_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        })
        .collect()
}

/// Renders a type the way it would be written in source, for diagnostics.
pub fn render_type(ty: &Type) -> String {
    ty.to_token_stream()
        .to_string()
        .replace(" :: ", "::")
        .replace(":: ", "::")
        .replace(" <", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace("& ", "&")
}
