use crate::config::IndentStyle;
use forge_core::SortedUnit;
use std::io::{self, Write};

pub type EmitResult = io::Result<()>;

#[derive(Debug, Clone)]
pub struct EmitContext {
    pub indent_level: usize,
    pub indent_chars: String,
}

impl EmitContext {
    pub fn new() -> Self {
        Self::with_style(IndentStyle::Spaces(4))
    }

    pub fn with_style(style: IndentStyle) -> Self {
        Self {
            indent_level: 0,
            indent_chars: style.unit(),
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn get_indent(&self) -> String {
        self.indent_chars.repeat(self.indent_level)
    }
}

impl Default for EmitContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders one artifact from a sorted unit.
pub trait Emitter {
    fn emit<W: Write>(
        &self,
        unit: &SortedUnit,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult;

    fn indent_style(&self) -> IndentStyle {
        IndentStyle::Spaces(4)
    }

    fn emit_to_string(&self, unit: &SortedUnit) -> io::Result<String> {
        let mut buffer = Vec::new();
        let mut context = EmitContext::with_style(self.indent_style());
        self.emit(unit, &mut buffer, &mut context)?;
        String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

pub struct EmitHelper;

impl EmitHelper {
    pub fn write_line<W: Write>(writer: &mut W, context: &EmitContext, text: &str) -> EmitResult {
        if text.is_empty() {
            writeln!(writer)
        } else {
            writeln!(writer, "{}{}", context.get_indent(), text)
        }
    }

    pub fn blank<W: Write>(writer: &mut W) -> EmitResult {
        writeln!(writer)
    }

    pub fn write_comment<W: Write>(
        writer: &mut W,
        context: &EmitContext,
        comment: &str,
    ) -> EmitResult {
        Self::write_line(writer, context, &format!("// {}", comment))
    }

    /// Writes `header {`, the indented body, and `}` followed by `footer`.
    pub fn write_block<W: Write, F>(
        writer: &mut W,
        context: &mut EmitContext,
        header: &str,
        footer: &str,
        body: F,
    ) -> EmitResult
    where
        F: FnOnce(&mut W, &mut EmitContext) -> EmitResult,
    {
        Self::write_line(writer, context, &format!("{} {{", header))?;
        context.indent();
        body(writer, context)?;
        context.dedent();
        Self::write_line(writer, context, &format!("}}{}", footer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_indentation() {
        let mut ctx = EmitContext::new();
        assert_eq!(ctx.indent_level, 0);
        assert_eq!(ctx.get_indent(), "");

        ctx.indent();
        assert_eq!(ctx.get_indent(), "    ");

        ctx.indent();
        assert_eq!(ctx.get_indent(), "        ");

        ctx.dedent();
        ctx.dedent();
        ctx.dedent();
        assert_eq!(ctx.indent_level, 0);
    }

    #[test]
    fn test_tab_indentation() {
        let mut ctx = EmitContext::with_style(IndentStyle::Tabs);
        ctx.indent();
        ctx.indent();
        assert_eq!(ctx.get_indent(), "\t\t");
    }

    #[test]
    fn test_write_block() {
        let mut buffer = Vec::new();
        let mut ctx = EmitContext::new();
        EmitHelper::write_block(&mut buffer, &mut ctx, "typedef struct P", " P;", |w, c| {
            EmitHelper::write_line(w, c, "int32_t X;")
        })
        .unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "typedef struct P {\n    int32_t X;\n} P;\n"
        );
        assert_eq!(ctx.indent_level, 0);
    }

    #[test]
    fn test_empty_line_has_no_trailing_indent() {
        let mut buffer = Vec::new();
        let mut ctx = EmitContext::new();
        ctx.indent();
        EmitHelper::write_line(&mut buffer, &ctx, "").unwrap();
        EmitHelper::write_comment(&mut buffer, &ctx, "note").unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "\n    // note\n");
    }
}
