use crate::types::{AbiType, SourceType, TypeMapper};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub source_name: String,
    pub source_type: SourceType,
    pub abi_type: AbiType,
    pub export_name: String,
}

impl Field {
    pub fn new(source_name: impl Into<String>, source_type: SourceType) -> Self {
        let source_name = source_name.into();
        let (abi_type, export_name) = TypeMapper::map_field(&source_name, &source_type);
        Self {
            source_name,
            source_type,
            abi_type,
            export_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedStruct {
    pub name: String,
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<PathBuf>,
}

impl ExportedStruct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            origin: None,
        }
    }

    pub fn field(mut self, name: impl Into<String>, source_type: SourceType) -> Self {
        self.fields.push(Field::new(name, source_type));
        self
    }

    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}
