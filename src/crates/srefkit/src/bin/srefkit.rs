//! Srefkit CLI - LoRA training dataset specifications from Midjourney sref codes
//!
//! Main entry point for the srefkit command-line tool.

use clap::{Parser, Subcommand};
use srefkit::version_info;

#[derive(Parser)]
#[command(name = "srefkit")]
#[command(about = "Srefkit - LoRA dataset specifications from Midjourney sref codes", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information
    Version,

    /// Analyze reference images and generate a dataset specification
    Analyze {
        /// Midjourney sref code the reference images share
        code: String,
        /// Image files or directories containing them
        #[arg(required = true)]
        inputs: Vec<String>,
        /// Output project file (default: <code>.sref.json)
        #[arg(short, long)]
        output: Option<String>,
        /// Analysis mode override: remote, local, auto
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Validate a specification project file
    Validate {
        /// Project file to validate
        file: String,
        /// Output format: text (default), json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Export a specification as Markdown or JSON
    Export {
        /// Project file to export
        file: String,
        /// Output file (default: derived from the input name)
        #[arg(short, long)]
        output: Option<String>,
        /// Export format: markdown (default), json
        #[arg(short, long, default_value = "markdown")]
        format: String,
    },

    /// Local model management commands
    #[command(subcommand)]
    Model(ModelCommands),

    /// Settings management commands
    #[command(subcommand)]
    Settings(SettingsCommands),
}

#[derive(Subcommand)]
enum ModelCommands {
    /// Show the status of all model variants
    Status,
    /// Download a model variant's artifacts
    Download {
        /// Variant to download: 2b, 7b, 72b (default: the selected variant)
        variant: Option<String>,
    },
    /// Remove all cached model artifacts
    ClearCache,
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show current settings
    Show,
    /// Change settings
    Set {
        /// Analysis mode: remote, local, auto
        #[arg(long)]
        mode: Option<String>,
        /// Local model variant: 2b, 7b, 72b
        #[arg(long)]
        variant: Option<String>,
        /// Fall back to the local engine when remote fails: true, false
        #[arg(long)]
        fallback: Option<String>,
        /// Model cache directory (empty string resets to the default)
        #[arg(long)]
        cache_dir: Option<String>,
        /// Local inference server endpoint (empty string resets to the default)
        #[arg(long)]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("{}", version_info());
            Ok(())
        }
        Some(Commands::Analyze {
            code,
            inputs,
            output,
            mode,
        }) => {
            srefkit::cli::analyze::handle_analyze(code, inputs, output, mode).await?;
            Ok(())
        }
        Some(Commands::Validate { file, format }) => {
            srefkit::cli::validate::handle_validate(file, format)?;
            Ok(())
        }
        Some(Commands::Export {
            file,
            output,
            format,
        }) => {
            srefkit::cli::validate::handle_export(file, output, format)?;
            Ok(())
        }
        Some(Commands::Model(model_cmd)) => {
            match model_cmd {
                ModelCommands::Status => {
                    srefkit::cli::model::handle_status()?;
                }
                ModelCommands::Download { variant } => {
                    srefkit::cli::model::handle_download(variant).await?;
                }
                ModelCommands::ClearCache => {
                    srefkit::cli::model::handle_clear_cache()?;
                }
            }
            Ok(())
        }
        Some(Commands::Settings(settings_cmd)) => {
            match settings_cmd {
                SettingsCommands::Show => {
                    srefkit::cli::settings::handle_show()?;
                }
                SettingsCommands::Set {
                    mode,
                    variant,
                    fallback,
                    cache_dir,
                    endpoint,
                } => {
                    srefkit::cli::settings::handle_set(mode, variant, fallback, cache_dir, endpoint)?;
                }
            }
            Ok(())
        }
        None => {
            println!("{}", version_info());
            println!("\nUse --help to see available commands");
            Ok(())
        }
    }
}
