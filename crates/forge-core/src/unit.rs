use crate::function::ExportedFunction;
use crate::record::ExportedStruct;
use crate::{ForgeError, Result};
use serde::Serialize;
use std::path::Path;

/// Everything exported by one compiler run, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompilationUnit {
    functions: Vec<ExportedFunction>,
    structs: Vec<ExportedStruct>,
}

impl CompilationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_function(&mut self, function: ExportedFunction) -> Result<()> {
        if let Some(existing) = self.functions.iter().find(|f| f.name == function.name) {
            return Err(ForgeError::invalid_signature(
                &function.name,
                format!(
                    "exported twice ({} and {})",
                    describe_origin(existing.origin.as_deref()),
                    describe_origin(function.origin.as_deref())
                ),
            ));
        }
        self.functions.push(function);
        Ok(())
    }

    pub fn add_struct(&mut self, record: ExportedStruct) -> Result<()> {
        if let Some(existing) = self.structs.iter().find(|s| s.name == record.name) {
            return Err(ForgeError::invalid_signature(
                format!("struct {}", record.name),
                format!(
                    "exported twice ({} and {})",
                    describe_origin(existing.origin.as_deref()),
                    describe_origin(record.origin.as_deref())
                ),
            ));
        }
        self.structs.push(record);
        Ok(())
    }

    pub fn functions(&self) -> &[ExportedFunction] {
        &self.functions
    }

    pub fn structs(&self) -> &[ExportedStruct] {
        &self.structs
    }

    pub fn is_empty_of_functions(&self) -> bool {
        self.functions.is_empty()
    }

    /// Orders functions and structs by name. Both artifacts are rendered from the result.
    pub fn sorted(mut self) -> SortedUnit {
        self.functions.sort_by(|a, b| a.name.cmp(&b.name));
        self.structs.sort_by(|a, b| a.name.cmp(&b.name));
        SortedUnit { unit: self }
    }
}

/// A unit whose contents are in emission order. Only obtainable through [`CompilationUnit::sorted`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SortedUnit {
    unit: CompilationUnit,
}

impl SortedUnit {
    pub fn functions(&self) -> &[ExportedFunction] {
        self.unit.functions()
    }

    pub fn structs(&self) -> &[ExportedStruct] {
        self.unit.structs()
    }
}

fn describe_origin(origin: Option<&Path>) -> String {
    origin
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unknown>".to_string())
}
