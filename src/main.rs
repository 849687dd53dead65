use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxnode::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert the items in a JSON file
    Run {
        /// Path to a JSON array of input items
        items: String,

        /// Capture per-item errors instead of aborting on the first failure
        #[arg(long)]
        continue_on_fail: bool,

        /// Emit outcomes as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the node registration metadata as JSON
    Descriptor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(Commands::Run {
            items,
            continue_on_fail,
            json,
        }) => {
            let format = if json {
                fxnode::OutputFormat::Json
            } else {
                fxnode::OutputFormat::Table
            };
            // The flag only overrides the config when given.
            let tolerant = continue_on_fail.then_some(true);
            fxnode::run(&items, cli.config_path.as_deref(), tolerant, format).await
        }
        Some(Commands::Descriptor) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&fxnode::descriptor::descriptor())?
            );
            Ok(())
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = fxnode::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
provider:
  base_url: "https://api.exchangerate.host"

credentials:
  api_key: ""

continue_on_fail: false
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
