use crate::{ForgeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimestampKind {
    SystemTime,
    ChronoDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapKind {
    HashMap,
    BTreeMap,
}

/// A source-level type the boundary knows how to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    Int32,
    Int64,
    Text,
    Bool,
    Float64,
    Timestamp(TimestampKind),
    StringInt64Map(MapKind),
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Int32 => write!(f, "i32"),
            SourceType::Int64 => write!(f, "i64"),
            SourceType::Text => write!(f, "String"),
            SourceType::Bool => write!(f, "bool"),
            SourceType::Float64 => write!(f, "f64"),
            SourceType::Timestamp(TimestampKind::SystemTime) => write!(f, "SystemTime"),
            SourceType::Timestamp(TimestampKind::ChronoDateTime) => write!(f, "DateTime<_>"),
            SourceType::StringInt64Map(MapKind::HashMap) => write!(f, "HashMap<String, i64>"),
            SourceType::StringInt64Map(MapKind::BTreeMap) => write!(f, "BTreeMap<String, i64>"),
        }
    }
}

/// Integer widths allowed for function parameters and returned values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    Int32,
    Int64,
}

impl ScalarType {
    pub fn abi(&self) -> AbiType {
        match self {
            ScalarType::Int32 => AbiType::Int32,
            ScalarType::Int64 => AbiType::Int64,
        }
    }

    pub fn c_name(&self) -> &'static str {
        self.abi().c_name()
    }

    pub fn rust_name(&self) -> &'static str {
        self.abi().rust_name()
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rust_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbiType {
    Int32,
    Int64,
    Double,
    CString,
}

impl AbiType {
    pub fn c_name(&self) -> &'static str {
        match self {
            AbiType::Int32 => "int32_t",
            AbiType::Int64 => "int64_t",
            AbiType::Double => "double",
            AbiType::CString => "const char*",
        }
    }

    pub fn rust_name(&self) -> &'static str {
        match self {
            AbiType::Int32 => "i32",
            AbiType::Int64 => "i64",
            AbiType::Double => "f64",
            AbiType::CString => "*const c_char",
        }
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.c_name())
    }
}

pub struct TypeMapper;

impl TypeMapper {
    /// Maps a parameter or returned value. Only the two integer widths cross as scalars.
    pub fn map_scalar(decl: &str, ty: &SourceType) -> Result<ScalarType> {
        match ty {
            SourceType::Int32 => Ok(ScalarType::Int32),
            SourceType::Int64 => Ok(ScalarType::Int64),
            other => Err(ForgeError::unsupported_type(
                decl,
                format!("{} (expected i32 or i64)", other),
            )),
        }
    }

    /// Maps a struct field to its ABI type and exported field name.
    pub fn map_field(name: &str, ty: &SourceType) -> (AbiType, String) {
        match ty {
            SourceType::Int32 => (AbiType::Int32, name.to_string()),
            SourceType::Int64 => (AbiType::Int64, name.to_string()),
            SourceType::Text => (AbiType::CString, name.to_string()),
            SourceType::Bool => (AbiType::Int32, name.to_string()),
            SourceType::Float64 => (AbiType::Double, name.to_string()),
            SourceType::Timestamp(_) => (AbiType::Int64, format!("{}Unix", name)),
            SourceType::StringInt64Map(_) => (AbiType::CString, format!("{}JSON", name)),
        }
    }
}
