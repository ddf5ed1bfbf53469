//! S2E Project CLI
//!
//! The `s2e-project` command runs the per-platform configuration rules that
//! precede template rendering when a new S2E analysis project is created.
//!
//! ## Commands
//!
//! - `info`: Show the templates and type tag of a project kind
//! - `images`: List catalog images that can host a target binary
//! - `validate`: Validate and analyze a project configuration file in place

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use elf_analysis::ElfAnalysis;
use s2e_project::{ElfAnalyzer, ImageCatalog, ProjectConfig, ProjectKind, ValidationReport};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "s2e-project")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Configuration rules for new S2E analysis projects", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show templates and type tag for a project kind
    Info {
        /// Project kind (windows, linux, cgc)
        #[arg(short, long)]
        kind: ProjectKind,
    },

    /// List images that can host a target binary
    Images {
        /// Image catalog (JSON)
        #[arg(long, env = "S2E_IMAGE_CATALOG")]
        catalog: PathBuf,

        /// Project kind (windows, linux, cgc)
        #[arg(short, long)]
        kind: ProjectKind,

        /// Target architecture (e.g. x86_64, i386)
        #[arg(long, conflicts_with = "binary")]
        arch: Option<String>,

        /// ELF binary to read the target architecture from
        #[arg(long)]
        binary: Option<PathBuf>,
    },

    /// Validate a project configuration and record facts about its target
    Validate {
        /// Project configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Project kind (windows, linux, cgc)
        #[arg(short, long)]
        kind: ProjectKind,

        /// Write the updated configuration here instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize, PartialEq)]
struct KindInfo {
    project_type: &'static str,
    bootstrap_template: &'static str,
    lua_template: &'static str,
    binary_format: &'static str,
}

impl From<ProjectKind> for KindInfo {
    fn from(kind: ProjectKind) -> Self {
        Self {
            project_type: kind.project_type(),
            bootstrap_template: kind.bootstrap_template(),
            lua_template: kind.lua_template(),
            binary_format: kind.required_binary_format(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ImageEntry {
    id: String,
    name: String,
    arch: String,
}

#[derive(Debug, Serialize)]
struct ValidateSummary {
    #[serde(flatten)]
    kind: KindInfo,
    warnings: Vec<String>,
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    s2e_project::init_tracing(cli.json, level);

    match cli.command {
        Commands::Info { kind } => print_json(&KindInfo::from(kind)),
        Commands::Images {
            catalog,
            kind,
            arch,
            binary,
        } => {
            let arch = resolve_arch(arch, binary.as_deref())?;
            let images = cmd_images(&catalog, kind, &arch)?;
            print_json(&images)
        }
        Commands::Validate {
            config,
            kind,
            output,
        } => {
            let summary = cmd_validate(&config, kind, output.as_deref())?;
            print_json(&summary)
        }
    }
}

fn resolve_arch(arch: Option<String>, binary: Option<&Path>) -> Result<String> {
    match (arch, binary) {
        (Some(arch), _) => Ok(arch),
        (None, Some(binary)) => {
            let elf = ElfAnalysis::open(binary)
                .with_context(|| format!("Failed to read {:?}", binary))?;
            let arch = elf
                .arch()
                .with_context(|| format!("Unknown machine type in {:?}", binary))?;
            Ok(arch.to_string())
        }
        (None, None) => bail!("Either --arch or --binary is required"),
    }
}

fn cmd_images(catalog: &Path, kind: ProjectKind, arch: &str) -> Result<Vec<ImageEntry>> {
    let catalog = ImageCatalog::load(catalog)
        .with_context(|| format!("Failed to load image catalog {:?}", catalog))?;

    let images: Vec<ImageEntry> = catalog
        .compatible_images(kind, arch)
        .into_iter()
        .map(|(id, image)| ImageEntry {
            id: id.to_string(),
            name: image.name.clone(),
            arch: image.os.arch.clone(),
        })
        .collect();

    if images.is_empty() {
        bail!("No image can run a {} {} binary", arch, kind);
    }
    Ok(images)
}

fn cmd_validate(
    config_path: &Path,
    kind: ProjectKind,
    output: Option<&Path>,
) -> Result<ValidateSummary> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
    let mut config = ProjectConfig::from_json_str(&content)
        .with_context(|| format!("Invalid JSON in {:?}", config_path))?;

    let ValidationReport { warnings } = kind
        .prepare(&mut config, &ElfAnalyzer)
        .with_context(|| format!("Invalid {} project configuration", kind))?;

    let output = output.unwrap_or(config_path).to_path_buf();
    std::fs::write(&output, config.to_json_pretty()?)
        .with_context(|| format!("Failed to write to {:?}", output))?;
    info!(kind = %kind, output = %output.display(), "Project configuration validated");

    Ok(ValidateSummary {
        kind: KindInfo::from(kind),
        warnings,
        output,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
