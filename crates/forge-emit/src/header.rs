use crate::emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
use crate::{BANNER, FREE_SYMBOL, LAST_ERROR_SYMBOL};
use forge_core::{ExportedFunction, ExportedStruct, SortedUnit};
use std::io::Write;

/// Renders the C side of the boundary.
pub struct HeaderEmitter<'a> {
    prefix: &'a str,
}

impl<'a> HeaderEmitter<'a> {
    pub fn new(prefix: &'a str) -> Self {
        Self { prefix }
    }

    /// `int32_t PM_Add(int32_t a, int32_t b, int32_t* out);`
    pub fn prototype(&self, function: &ExportedFunction) -> String {
        let mut params: Vec<String> = function
            .params
            .iter()
            .map(|p| format!("{} {}", p.ty.c_name(), p.name))
            .collect();
        if let Some(value) = function.shape.value_type() {
            params.push(format!("{}* out", value.c_name()));
        }
        let params = if params.is_empty() {
            "void".to_string()
        } else {
            params.join(", ")
        };
        format!("int32_t {}({});", function.symbol(self.prefix), params)
    }

    fn emit_struct<W: Write>(
        &self,
        record: &ExportedStruct,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        EmitHelper::write_block(
            writer,
            context,
            &format!("typedef struct {}", record.name),
            &format!(" {};", record.name),
            |w, c| {
                for field in &record.fields {
                    EmitHelper::write_line(
                        w,
                        c,
                        &format!("{} {};", field.abi_type.c_name(), field.export_name),
                    )?;
                }
                Ok(())
            },
        )
    }
}

impl Emitter for HeaderEmitter<'_> {
    fn emit<W: Write>(
        &self,
        unit: &SortedUnit,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        EmitHelper::write_comment(writer, context, BANNER)?;
        EmitHelper::write_line(writer, context, "#pragma once")?;
        EmitHelper::blank(writer)?;
        EmitHelper::write_line(writer, context, "#include <stdint.h>")?;
        EmitHelper::write_line(writer, context, "#include <stddef.h>")?;
        EmitHelper::blank(writer)?;
        EmitHelper::write_line(writer, context, "#ifdef __cplusplus")?;
        EmitHelper::write_line(writer, context, "extern \"C\" {")?;
        EmitHelper::write_line(writer, context, "#endif")?;
        EmitHelper::blank(writer)?;

        for function in unit.functions() {
            EmitHelper::write_line(writer, context, &self.prototype(function))?;
        }
        if !unit.functions().is_empty() {
            EmitHelper::blank(writer)?;
        }

        EmitHelper::write_line(
            writer,
            context,
            &format!("const char* {}(void);", LAST_ERROR_SYMBOL),
        )?;
        EmitHelper::write_line(writer, context, &format!("void {}(void* p);", FREE_SYMBOL))?;
        EmitHelper::blank(writer)?;

        for record in unit.structs() {
            self.emit_struct(record, writer, context)?;
            EmitHelper::blank(writer)?;
        }

        EmitHelper::write_line(writer, context, "#ifdef __cplusplus")?;
        EmitHelper::write_line(writer, context, "}")?;
        EmitHelper::write_line(writer, context, "#endif")
    }
}
