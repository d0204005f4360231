//! toolmap CLI entrypoint
//! Loads an OpenAPI document and prints the tool manifest derived from it.
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;
use url::Url;

use toolmap::core::utils::generate_tool_name;
use toolmap::infrastructure::{CompositeOpenApiLoader, OpenApiLoader};
use toolmap::{Config, ToolManifest};

#[derive(Parser)]
#[command(name = "toolmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Map every operation of an OpenAPI specification to a tool
    Map {
        /// Path or URL to the OpenAPI specification (YAML or JSON)
        #[arg(long)]
        spec: String,
        /// Write the manifest here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Configuration file (defaults to ./toolmap.toml, then the user config dir)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Server name, overrides info.title
        #[arg(long)]
        server_name: Option<String>,
        /// Server version, overrides info.version
        #[arg(long)]
        server_version: Option<String>,
        /// API base URL, overrides servers[0].url
        #[arg(long, value_parser = parse_base_url)]
        base_url: Option<String>,
        /// Emit single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Print the tool name derived for an operation without an operationId
    Name {
        /// HTTP method, e.g. GET
        method: String,
        /// Path template, e.g. /pets/{petId}
        path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let filter = if cli.verbose {
        filter.add_directive(Level::DEBUG.into())
    } else {
        filter
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Map {
            spec,
            output,
            config,
            server_name,
            server_version,
            base_url,
            compact,
        } => {
            let mut config =
                Config::discover(config.as_deref()).context("Failed to load configuration")?;
            if server_name.is_some() {
                config.server_name = server_name;
            }
            if server_version.is_some() {
                config.server_version = server_version;
            }
            if base_url.is_some() {
                config.base_url = base_url;
            }

            run_map(&spec, output, &config, compact).await
        }
        Commands::Name { method, path } => {
            println!("{}", generate_tool_name(&method, &path));
            Ok(())
        }
    }
}

/// Reject malformed URLs but keep the text as given, without normalization
fn parse_base_url(value: &str) -> Result<String, url::ParseError> {
    Url::parse(value)?;
    Ok(value.to_string())
}

async fn run_map(
    source: &str,
    output: Option<PathBuf>,
    config: &Config,
    compact: bool,
) -> anyhow::Result<()> {
    info!(source = %source, "Loading OpenAPI specification");
    debug!(?config, "Effective configuration");

    let loader = CompositeOpenApiLoader::new().context("Failed to initialize spec loader")?;
    let spec = loader
        .load(source)
        .await
        .context("Failed to load OpenAPI schema")?;

    let manifest =
        ToolManifest::build(&spec, config).context("Failed to map OpenAPI operations")?;
    info!(
        server_name = %manifest.server_name,
        tools = manifest.tools.len(),
        "Mapped OpenAPI specification"
    );

    let rendered = if compact {
        serde_json::to_string(&manifest)?
    } else {
        serde_json::to_string_pretty(&manifest)?
    };

    match output {
        Some(path) => {
            tokio::fs::write(&path, rendered + "\n")
                .await
                .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
            info!(path = %path.display(), "Wrote tool manifest");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
