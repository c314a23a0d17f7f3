use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use claimwise_codegen::generators::GeneratorConfig;
use claimwise_codegen::CodeGenerator;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "claimwise",
    about = "Generate and inspect claimwise FHIR models",
    version,
    arg_required_else_help = true
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate model modules from a directory of StructureDefinition JSON files.
    Generate {
        /// Directory with StructureDefinition (or Bundle) JSON files.
        #[arg(short, long, value_name = "DIR")]
        input: PathBuf,
        /// Output directory for generated files.
        #[arg(short, long, value_name = "DIR", default_value = "generated")]
        output: PathBuf,
        /// Generate documentation comments.
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        docs: bool,
        /// Module path the shared datatypes are imported from (default: crate::types).
        #[arg(long)]
        module_prefix: Option<String>,
    },

    /// List the types parsed from a directory of StructureDefinitions.
    Types {
        /// Directory with StructureDefinition (or Bundle) JSON files.
        #[arg(short, long, value_name = "DIR")]
        input: PathBuf,
        /// Print the parsed definitions as JSON.
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Print CLI version.
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Generate {
            input,
            output,
            docs,
            module_prefix,
        } => {
            run_generate(&input, &output, docs, module_prefix)?;
        }
        Commands::Types { input, json } => {
            run_types(&input, json)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_generate(
    input: &Path,
    output: &Path,
    docs: bool,
    module_prefix: Option<String>,
) -> Result<()> {
    let config = GeneratorConfig {
        generate_docs: docs,
        module_prefix,
    };

    info!(input = %input.display(), output = %output.display(), "generating models");
    let generated = claimwise_codegen::generate_rust_from_dir(input, output, config)
        .with_context(|| format!("Failed to generate models from {}", input.display()))?;

    println!(
        "Generated {} Rust modules into {}",
        generated,
        output.display()
    );

    Ok(())
}

fn run_types(input: &Path, json: bool) -> Result<()> {
    let codegen = CodeGenerator::from_dir(input)?;
    let types = codegen.registry().types();

    if json {
        println!("{}", serde_json::to_string_pretty(&types)?);
        return Ok(());
    }

    for type_def in types {
        let flags = match (type_def.is_abstract, type_def.is_profile) {
            (true, _) => " (abstract)",
            (_, true) => " (profile)",
            _ => "",
        };
        println!(
            "{:<40} {:<15} {:>3} elements {:>3} backbones{}",
            type_def.name,
            type_def.kind.as_code(),
            type_def.properties.len(),
            type_def.backbone_elements.len(),
            flags
        );
    }

    Ok(())
}
