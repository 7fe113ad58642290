use crate::config::{ChannelMode, ExportConfig, IndentStyle};
use crate::emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
use crate::inline_runtime::{INLINE_IMPORTS, INLINE_RUNTIME};
use crate::{BANNER, FREE_SYMBOL, LAST_ERROR_SYMBOL};
use forge_core::{ExportedFunction, ExportedStruct, Field, SortedUnit, SourceType, TimestampKind};
use std::io::Write;

const MODULE_ALIAS: &str = "exported";
const NO_MANGLE: &str = "#[unsafe(no_mangle)]";
const CHANNEL_ACCESSOR: &str = "self::export_channel()";

/// Names the shim module defines or refers to unqualified in either mode.
const SHIM_NAMES: &[&str] = &[
    MODULE_ALIAS,
    "EXPORT_CHANNEL",
    "export_channel",
    FREE_SYMBOL,
    LAST_ERROR_SYMBOL,
    "c_void",
    "c_char",
    "From",
    "Self",
    "i32",
    "i64",
    "f64",
];

/// Names added by the pasted runtime in inline mode.
const INLINE_NAMES: &[&str] = &[
    "ErrorChannel",
    "Outcome",
    "guarded_call",
    "panic_message",
    "c_string",
    "release",
    "unix_seconds",
    "json_document",
    "Any",
    "BTreeMap",
    "CString",
    "panic",
    "AssertUnwindSafe",
    "Mutex",
    "MutexGuard",
    "PoisonError",
    "SystemTime",
    "UNIX_EPOCH",
    "Option",
    "Some",
    "None",
    "Result",
    "Ok",
    "Err",
    "String",
    "Box",
    "Send",
    "Sync",
    "FnOnce",
    "IntoIterator",
    "drop",
    "std",
    "serde_json",
];

/// Renders the Rust side of the boundary: `extern "C"` wrappers around the exported functions.
pub struct ShimEmitter<'a> {
    config: &'a ExportConfig,
}

impl<'a> ShimEmitter<'a> {
    pub fn new(config: &'a ExportConfig) -> Self {
        Self { config }
    }

    /// Top-level names an exported symbol or mirrored struct must not take.
    pub fn reserved_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = SHIM_NAMES.to_vec();
        match self.config.channel_mode {
            ChannelMode::Runtime => names.push("forge_runtime"),
            ChannelMode::Inline => names.extend_from_slice(INLINE_NAMES),
        }
        if let Some(root) = self.config.module_path.split("::").next() {
            if root != "crate" && root != "self" && root != "super" {
                names.push(root.trim());
            }
        }
        names
    }

    /// Names a parameter must not take: a binding pattern cannot shadow a static or a constant.
    pub fn reserved_params(&self) -> &'static [&'static str] {
        match self.config.channel_mode {
            ChannelMode::Runtime => &["EXPORT_CHANNEL"],
            ChannelMode::Inline => &["EXPORT_CHANNEL", "UNIX_EPOCH"],
        }
    }

    fn helper(&self, name: &str) -> String {
        format!("{}{}", self.config.channel_mode.helper_path(), name)
    }

    /// `PM_Add(a: i32, b: i32, out: *mut i32) -> i32`
    pub fn signature(&self, function: &ExportedFunction) -> String {
        let mut params: Vec<String> = function
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty.rust_name()))
            .collect();
        if let Some(value) = function.shape.value_type() {
            params.push(format!("out: *mut {}", value.rust_name()));
        }
        format!(
            "{}({}) -> i32",
            function.symbol(&self.config.symbol_prefix),
            params.join(", ")
        )
    }

    fn emit_prelude<W: Write>(&self, writer: &mut W, context: &mut EmitContext) -> EmitResult {
        EmitHelper::write_comment(writer, context, BANNER)?;
        EmitHelper::blank(writer)?;
        EmitHelper::write_line(
            writer,
            context,
            "#![allow(non_snake_case, dead_code, clippy::missing_safety_doc)]",
        )?;
        EmitHelper::blank(writer)?;
        EmitHelper::write_line(writer, context, "use std::ffi::c_void;")?;
        EmitHelper::write_line(writer, context, "use std::os::raw::c_char;")?;
        if self.config.channel_mode == ChannelMode::Inline {
            for line in INLINE_IMPORTS.lines() {
                EmitHelper::write_line(writer, context, line)?;
            }
        }
        EmitHelper::blank(writer)?;
        EmitHelper::write_line(
            writer,
            context,
            &format!("use {} as {};", self.config.module_path, MODULE_ALIAS),
        )?;
        EmitHelper::blank(writer)?;

        if self.config.channel_mode == ChannelMode::Inline {
            for line in INLINE_RUNTIME.lines() {
                EmitHelper::write_line(writer, context, line)?;
            }
            EmitHelper::blank(writer)?;
        }

        EmitHelper::write_line(
            writer,
            context,
            &format!(
                "static EXPORT_CHANNEL: {} = {}::new();",
                self.helper("ErrorChannel"),
                self.helper("ErrorChannel")
            ),
        )?;
        EmitHelper::blank(writer)?;
        EmitHelper::write_block(
            writer,
            context,
            &format!("fn export_channel() -> &'static {}", self.helper("ErrorChannel")),
            "",
            |w, c| EmitHelper::write_line(w, c, "&EXPORT_CHANNEL"),
        )
    }

    fn emit_entry_points<W: Write>(
        &self,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        EmitHelper::write_line(writer, context, NO_MANGLE)?;
        EmitHelper::write_block(
            writer,
            context,
            &format!("pub unsafe extern \"C\" fn {}(p: *mut c_void)", FREE_SYMBOL),
            "",
            |w, c| {
                EmitHelper::write_line(w, c, &format!("unsafe {{ {}(p) }}", self.helper("release")))
            },
        )?;
        EmitHelper::blank(writer)?;
        EmitHelper::write_line(writer, context, NO_MANGLE)?;
        EmitHelper::write_block(
            writer,
            context,
            &format!("pub extern \"C\" fn {}() -> *const c_char", LAST_ERROR_SYMBOL),
            "",
            |w, c| {
                EmitHelper::write_line(w, c, &format!("{}.last_error_json_ptr()", CHANNEL_ACCESSOR))
            },
        )
    }

    fn emit_wrapper<W: Write>(
        &self,
        function: &ExportedFunction,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let qualifiers = if function.has_value() {
            "pub unsafe extern \"C\" fn"
        } else {
            "pub extern \"C\" fn"
        };
        let args: Vec<&str> = function.params.iter().map(|p| p.name.as_str()).collect();
        let call = format!("{}::{}({})", MODULE_ALIAS, function.name, args.join(", "));
        let outcome = self.helper("Outcome");

        EmitHelper::write_line(writer, context, NO_MANGLE)?;
        EmitHelper::write_block(
            writer,
            context,
            &format!("{} {}", qualifiers, self.signature(function)),
            "",
            |w, c| {
                EmitHelper::write_line(
                    w,
                    c,
                    &format!("let outcome = {}(|| {});", self.helper("guarded_call"), call),
                )?;
                EmitHelper::write_line(w, c, &format!("{}.record(&outcome);", CHANNEL_ACCESSOR))?;
                EmitHelper::write_block(w, c, "match outcome", "", |w, c| {
                    if function.has_value() {
                        EmitHelper::write_block(
                            w,
                            c,
                            &format!("{}::Succeeded(value) =>", outcome),
                            "",
                            |w, c| {
                                EmitHelper::write_block(w, c, "if !out.is_null()", "", |w, c| {
                                    EmitHelper::write_line(w, c, "unsafe { *out = value };")
                                })?;
                                EmitHelper::write_line(w, c, "0")
                            },
                        )?;
                    } else {
                        EmitHelper::write_line(w, c, &format!("{}::Succeeded(()) => 0,", outcome))?;
                    }
                    EmitHelper::write_line(w, c, &format!("{}::Failed(_) => 1,", outcome))
                })
            },
        )
    }

    fn emit_mirror<W: Write>(
        &self,
        record: &ExportedStruct,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        EmitHelper::write_line(writer, context, "#[repr(C)]")?;
        EmitHelper::write_block(
            writer,
            context,
            &format!("pub struct {}", record.name),
            "",
            |w, c| {
                for field in &record.fields {
                    EmitHelper::write_line(
                        w,
                        c,
                        &format!("pub {}: {},", field.export_name, field.abi_type.rust_name()),
                    )?;
                }
                Ok(())
            },
        )?;
        EmitHelper::blank(writer)?;

        let source = format!("{}::{}", MODULE_ALIAS, record.name);
        EmitHelper::write_block(
            writer,
            context,
            &format!("impl From<&{}> for {}", source, record.name),
            "",
            |w, c| {
                EmitHelper::write_block(w, c, &format!("fn from(src: &{}) -> Self", source), "", |w, c| {
                    EmitHelper::write_block(w, c, "Self", "", |w, c| {
                        for field in &record.fields {
                            EmitHelper::write_line(
                                w,
                                c,
                                &format!("{}: {},", field.export_name, self.conversion(field)),
                            )?;
                        }
                        Ok(())
                    })
                })
            },
        )
    }

    /// Expression converting `src.<field>` to its ABI representation.
    pub fn conversion(&self, field: &Field) -> String {
        let access = format!("src.{}", field.source_name);
        match field.source_type {
            SourceType::Int32 | SourceType::Int64 | SourceType::Float64 => access,
            SourceType::Bool => format!("i32::from({})", access),
            SourceType::Text => format!("{}(&{})", self.helper("c_string"), access),
            SourceType::Timestamp(TimestampKind::SystemTime) => {
                format!("{}({})", self.helper("unix_seconds"), access)
            }
            SourceType::Timestamp(TimestampKind::ChronoDateTime) => format!("{}.timestamp()", access),
            SourceType::StringInt64Map(_) => {
                format!("{}(&{})", self.helper("json_document"), access)
            }
        }
    }
}

impl Emitter for ShimEmitter<'_> {
    fn emit<W: Write>(
        &self,
        unit: &SortedUnit,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        self.emit_prelude(writer, context)?;
        EmitHelper::blank(writer)?;
        self.emit_entry_points(writer, context)?;

        for function in unit.functions() {
            EmitHelper::blank(writer)?;
            self.emit_wrapper(function, writer, context)?;
        }

        for record in unit.structs() {
            EmitHelper::blank(writer)?;
            self.emit_mirror(record, writer, context)?;
        }
        Ok(())
    }

    fn indent_style(&self) -> IndentStyle {
        self.config.indent_style
    }
}
