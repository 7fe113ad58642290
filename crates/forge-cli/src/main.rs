use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forge")]
#[command(about = "capi-forge - C ABI wrappers and headers for marked Rust declarations")]
#[command(version = "0.1.0")]
#[command(author = "Gianluca Brigandi <gbrigand@gmail.com>")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Compile {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(short = 'o', long = "out")]
        shim_out: Option<PathBuf>,

        #[arg(long = "hout")]
        header_out: Option<PathBuf>,

        #[arg(long)]
        module: Option<String>,

        #[arg(long)]
        cprefix: Option<String>,

        #[arg(long)]
        inline_channel: bool,
    },

    Check {
        #[command(flatten)]
        source: SourceArgs,
    },

    Inspect {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct SourceArgs {
    #[arg(long)]
    pkg: Option<PathBuf>,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

impl SourceArgs {
    fn load(&self) -> Result<forge::ForgeConfig> {
        let mut config = match &self.config {
            Some(path) => forge::ForgeConfig::from_json_file(path)?,
            None => forge::ForgeConfig::default(),
        };
        if let Some(pkg) = &self.pkg {
            config.source_dir = pkg.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            source,
            shim_out,
            header_out,
            module,
            cprefix,
            inline_channel,
        } => {
            init_tracing(source.verbose);
            let mut config = source.load()?;
            if let Some(path) = shim_out {
                config.shim_out = path;
            }
            if let Some(path) = header_out {
                config.header_out = path;
            }
            if let Some(module) = module {
                config.export.module_path = module;
            }
            if let Some(prefix) = cprefix {
                config.export.symbol_prefix = prefix;
            }
            if inline_channel {
                config.export.channel_mode = forge::ChannelMode::Inline;
            }
            cmd_compile(&config)
        }
        Commands::Check { source } => {
            init_tracing(source.verbose);
            cmd_check(&source.load()?)
        }
        Commands::Inspect { source, json } => {
            init_tracing(source.verbose);
            cmd_inspect(&source.load()?, json)
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_compile(config: &forge::ForgeConfig) -> Result<()> {
    use colored::*;

    let report = forge::compile(config).with_context(|| {
        format!("Failed to compile exports from {}", config.source_dir.display())
    })?;

    if !report.written {
        println!(
            "{}",
            format!(
                "  No exported functions found in {}, nothing generated",
                config.source_dir.display()
            )
            .yellow()
        );
        return Ok(());
    }

    println!("{} {}", "SUCCESS:".bright_green().bold(), report);
    Ok(())
}

fn cmd_check(config: &forge::ForgeConfig) -> Result<()> {
    use colored::*;

    match forge::check(config) {
        Ok(unit) => {
            println!("{}", " VALID".bright_green().bold());
            println!(
                "   functions: {}, structs: {}",
                unit.functions().len(),
                unit.structs().len()
            );
            Ok(())
        }
        Err(e) => {
            println!("{}", " INVALID".bright_red().bold());
            println!("\n{}", "Error:".bright_red());
            println!("{}", e);
            Err(anyhow::anyhow!("Validation failed"))
        }
    }
}

fn cmd_inspect(config: &forge::ForgeConfig, json: bool) -> Result<()> {
    use colored::*;

    let unit = forge::check(config)
        .with_context(|| format!("Failed to scan {}", config.source_dir.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&unit)?);
        return Ok(());
    }

    if unit.functions().is_empty() && unit.structs().is_empty() {
        println!("  No exported declarations found");
        return Ok(());
    }

    let prefix = &config.export.symbol_prefix;
    println!(" Found {} function(s)\n", unit.functions().len());
    for function in unit.functions() {
        println!(
            "{}",
            format!(" {}", function.symbol(prefix)).bright_green().bold()
        );
        for param in &function.params {
            println!("     {}: {}", param.name, param.ty.rust_name());
        }
        match function.shape.value_type() {
            Some(value) => println!("     returns: {} via out", value.rust_name()),
            None => println!("     returns: status only"),
        }
    }

    if !unit.structs().is_empty() {
        println!("\n Found {} struct(s)\n", unit.structs().len());
    }
    for record in unit.structs() {
        println!("{}", format!(" {}", record.name).bright_yellow().bold());
        for field in &record.fields {
            println!(
                "     {} -> {} {}",
                field.source_type,
                field.abi_type.c_name(),
                field.export_name
            );
        }
    }

    Ok(())
}
