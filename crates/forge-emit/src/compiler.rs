use crate::config::ExportConfig;
use crate::emitter::Emitter;
use crate::header::HeaderEmitter;
use crate::shim::ShimEmitter;
use forge_core::{is_c_reserved, CompilationUnit, ForgeError, Result, SortedUnit};
use std::io;

/// Both rendered artifacts, produced from one sorted view of the unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub shim: String,
    pub header: String,
    pub functions: usize,
    pub structs: usize,
}

pub struct ExportCompiler {
    config: ExportConfig,
}

impl ExportCompiler {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, unit: CompilationUnit) -> Result<Artifacts> {
        self.config.validate()?;

        let sorted = unit.sorted();
        self.check_names(&sorted)?;
        let functions = sorted.functions().len();
        let structs = sorted.structs().len();
        tracing::debug!(functions, structs, "Rendering export artifacts");

        let shim = ShimEmitter::new(&self.config)
            .emit_to_string(&sorted)
            .map_err(|e| format_error("shim", e))?;
        let header = HeaderEmitter::new(&self.config.symbol_prefix)
            .emit_to_string(&sorted)
            .map_err(|e| format_error("header", e))?;

        syn::parse_file(&shim).map_err(|e| ForgeError::Format {
            artifact: "shim".to_string(),
            message: e.to_string(),
        })?;

        Ok(Artifacts {
            shim,
            header,
            functions,
            structs,
        })
    }
}

impl ExportCompiler {
    /// Symbols and struct names share the shim module and the C global namespace.
    fn check_names(&self, unit: &SortedUnit) -> Result<()> {
        let shim = ShimEmitter::new(&self.config);
        let taken = shim.reserved_names();
        let struct_names: Vec<&str> = unit.structs().iter().map(|s| s.name.as_str()).collect();

        for function in unit.functions() {
            let symbol = function.symbol(&self.config.symbol_prefix);
            let clash = if is_c_reserved(&symbol) {
                Some("is reserved in C or C++")
            } else if taken.contains(&symbol.as_str()) {
                Some("collides with a name the generated shim uses")
            } else if struct_names.contains(&symbol.as_str()) {
                Some("collides with an exported struct")
            } else {
                None
            };
            if let Some(clash) = clash {
                return Err(ForgeError::invalid_signature(
                    &function.name,
                    format!("exported symbol `{}` {}", symbol, clash),
                ));
            }

            if let Some(param) = function
                .params
                .iter()
                .find(|p| shim.reserved_params().contains(&p.name.as_str()))
            {
                return Err(ForgeError::invalid_signature(
                    &function.name,
                    format!("parameter name `{}` collides with an item of the generated shim", param.name),
                ));
            }
        }

        for name in struct_names {
            if taken.contains(&name) {
                return Err(ForgeError::invalid_signature(
                    format!("struct {}", name),
                    "struct name collides with a name the generated shim uses",
                ));
            }
        }
        Ok(())
    }
}

fn format_error(artifact: &str, err: io::Error) -> ForgeError {
    ForgeError::Format {
        artifact: artifact.to_string(),
        message: err.to_string(),
    }
}
