use crate::types::ScalarType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: ScalarType,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: ScalarType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Name given to a parameter declared without one (`_: i32`).
    pub fn positional_name(index: usize) -> String {
        format!("p{}", index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnShape {
    ErrorOnly,
    ValueAndError(ScalarType),
}

impl ReturnShape {
    pub fn value_type(&self) -> Option<ScalarType> {
        match self {
            ReturnShape::ErrorOnly => None,
            ReturnShape::ValueAndError(ty) => Some(*ty),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedFunction {
    pub name: String,
    pub params: Vec<Param>,
    pub shape: ReturnShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<PathBuf>,
}

impl ExportedFunction {
    pub fn new(name: impl Into<String>, shape: ReturnShape) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            shape,
            origin: None,
        }
    }

    pub fn param(mut self, name: impl Into<String>, ty: ScalarType) -> Self {
        self.params.push(Param::new(name, ty));
        self
    }

    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn symbol(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.name)
    }

    pub fn has_value(&self) -> bool {
        self.shape.value_type().is_some()
    }
}
