use forge_core::{ForgeError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PREFIX: &str = "PM_";
pub const DEFAULT_MODULE: &str = "crate::internal";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub symbol_prefix: String,
    pub module_path: String,
    pub channel_mode: ChannelMode,
    pub indent_style: IndentStyle,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            symbol_prefix: DEFAULT_PREFIX.to_string(),
            module_path: DEFAULT_MODULE.to_string(),
            channel_mode: ChannelMode::Runtime,
            indent_style: IndentStyle::Spaces(4),
        }
    }
}

impl ExportConfig {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.symbol_prefix = prefix.into();
        self
    }

    pub fn with_module(mut self, module_path: impl Into<String>) -> Self {
        self.module_path = module_path.into();
        self
    }

    pub fn with_channel_mode(mut self, mode: ChannelMode) -> Self {
        self.channel_mode = mode;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let prefix = &self.symbol_prefix;
        let starts_ok = prefix
            .chars()
            .next()
            .map_or(true, |c| c.is_ascii_alphabetic() || c == '_');
        if !starts_ok || !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ForgeError::Config(format!(
                "symbol prefix `{}` is not a valid C identifier prefix",
                prefix
            )));
        }

        if syn::parse_str::<syn::Path>(&self.module_path).is_err() {
            return Err(ForgeError::Config(format!(
                "module path `{}` is not a valid Rust path",
                self.module_path
            )));
        }
        Ok(())
    }
}

/// Where the generated shim gets its error channel from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelMode {
    /// Link against the `forge-runtime` crate.
    #[default]
    Runtime,
    /// Embed a private copy of the channel in the shim; the target crate only needs `serde_json`.
    Inline,
}

impl ChannelMode {
    /// Path prefix under which the shim reaches the channel helpers.
    pub fn helper_path(&self) -> &'static str {
        match self {
            ChannelMode::Runtime => "forge_runtime::",
            ChannelMode::Inline => "self::",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndentStyle {
    Spaces(usize),
    Tabs,
}

impl IndentStyle {
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Spaces(n) => " ".repeat(*n),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }
}
