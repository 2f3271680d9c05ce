//! StoneyDSP CLI: inspect target configurations, the semantic type table and
//! the generated C configuration header.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::Format;
use manifest::StoneyManifest;

#[derive(Parser)]
#[command(name = "stoneydsp", version, about = "StoneyDSP capability facade inspector")]
struct Cli {
    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Target selection shared by commands that resolve a configuration.
#[derive(Args)]
struct TargetArgs {
    /// Target triple, a definition name from targets/, or "host"
    #[arg(long)]
    target: Option<String>,
    /// Path to a .target.toml file (overrides --target)
    #[arg(long)]
    signals: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a target and show its configuration
    Describe {
        #[command(flatten)]
        target: TargetArgs,
        /// Export mode of the artifact (export, import, local). Required unless
        /// stoneydsp.toml or STONEYDSP_EXPORTS/IMPORTS/LOCAL sets one
        #[arg(long)]
        export_mode: Option<String>,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Print the semantic type table
    Types {
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Render the C configuration header
    Header {
        #[command(flatten)]
        target: TargetArgs,
        /// Export mode of the artifact (export, import, local). Required unless
        /// stoneydsp.toml or STONEYDSP_EXPORTS/IMPORTS/LOCAL sets one
        #[arg(long)]
        export_mode: Option<String>,
        /// Output file (default: [header] output in stoneydsp.toml, else stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage target definitions
    Target {
        #[command(subcommand)]
        action: TargetAction,
    },
    /// Print the library version
    Version {
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
}

#[derive(Subcommand)]
enum TargetAction {
    /// List built-in and project targets
    List,
    /// Create targets/<name>.target.toml
    New {
        /// Definition name
        name: String,
        /// Seed from this triple instead of the host
        #[arg(long)]
        triple: Option<String>,
        /// Overwrite an existing definition
        #[arg(long)]
        force: bool,
    },
    /// Check that a definition or triple resolves
    Validate {
        /// Definition name or triple
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("stoneydsp={log_level},stoneydsp_core={log_level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let (manifest, project_dir) = load_manifest_optional(&cwd)?;
    let project_dir = project_dir.unwrap_or(cwd);
    let manifest = manifest.as_ref();

    match cli.command {
        Commands::Describe {
            target,
            export_mode,
            format,
        } => {
            let selected = select(&project_dir, manifest, &target)?;
            let mode = commands::select_export_mode(export_mode.as_deref(), manifest)?;
            commands::describe::run(&selected, mode, Format::parse(format.as_deref())?)
        }

        Commands::Types { format } => commands::types::run(Format::parse(format.as_deref())?),

        Commands::Header {
            target,
            export_mode,
            output,
        } => {
            let selected = select(&project_dir, manifest, &target)?;
            let mode = commands::select_export_mode(export_mode.as_deref(), manifest)?;
            let output = output.or_else(|| {
                manifest
                    .and_then(|m| m.header.output.as_ref())
                    .map(|p| project_dir.join(p))
            });
            commands::header::run(&selected, mode, output.as_deref())
        }

        Commands::Target { action } => match action {
            TargetAction::List => commands::target::list(&project_dir),
            TargetAction::New {
                name,
                triple,
                force,
            } => commands::target::new(&name, triple.as_deref(), &project_dir, force).map(|_| ()),
            TargetAction::Validate { name } => {
                commands::target::validate(&name, &project_dir).map(|_| ())
            }
        },

        Commands::Version { format } => commands::version::run(Format::parse(format.as_deref())?),
    }
}

fn select(
    project_dir: &Path,
    manifest: Option<&StoneyManifest>,
    args: &TargetArgs,
) -> anyhow::Result<commands::SelectedTarget> {
    commands::select_target(
        project_dir,
        manifest,
        args.target.as_deref(),
        args.signals.as_deref(),
    )
}

/// Try to load a manifest from the current directory upward. Returns (None, None) if not found.
fn load_manifest_optional(
    cwd: &Path,
) -> anyhow::Result<(Option<StoneyManifest>, Option<PathBuf>)> {
    match StoneyManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}
