//! Apx - API Proxy Bundle Deployer
//!
//! Usage:
//!   apx generate      # Render templates and package the bundle archive
//!   apx validate      # Upload the archive for remote validation
//!   apx deploy        # Hand the archive to the build tool

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use apx_core::commands::{
    DeployCommand, DeployOptions, DeployReport, GenerateCommand, GenerateOptions, GenerateReport,
    ValidateCommand, ValidateOptions, ValidateReport,
};
use apx_core::paths::Workspace;

#[derive(Parser)]
#[command(name = "apx")]
#[command(about = "API proxy bundle builder and deployer", long_about = None)]
struct Cli {
    /// Workspace directory holding configs/, templates/, and out/
    #[arg(long, env = "APX_WORKSPACE", default_value = ".", global = true)]
    workspace: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render templates and package the bundle archive
    Generate {
        /// Proxy name (falls back to the config document)
        #[arg(long = "proxy", env = "PROXY_NAME")]
        proxy_name: Option<String>,

        /// Policy category tier (falls back to the config document)
        #[arg(long, env = "PROXY_CATEGORY")]
        category: Option<String>,

        /// Base path for the proxy endpoint (falls back to the config document)
        #[arg(long = "base-path", env = "PROXY_BASE_PATH")]
        proxy_base_path: Option<String>,

        /// Target server for the target endpoint (falls back to the config document)
        #[arg(long = "target-server", env = "TARGET_SERVER_NAME")]
        target_server_name: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Upload the bundle archive for remote validation
    Validate {
        /// Proxy name (falls back to the config document)
        #[arg(long = "proxy", env = "PROXY_NAME")]
        proxy_name: Option<String>,

        /// Management API access token
        #[arg(long, env = "GCP_ACCESS_TOKEN", hide_env_values = true)]
        token: String,

        /// Management API base URL (defaults to the cloud project endpoint)
        #[arg(long = "management-url", env = "APX_MANAGEMENT_URL")]
        management_url: Option<Url>,

        /// Scope the validation request to the proxy name
        #[arg(long)]
        scoped: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Hand the bundle archive to the build tool for deployment
    Deploy {
        /// Proxy name (falls back to the config document)
        #[arg(long = "proxy", env = "PROXY_NAME")]
        proxy_name: Option<String>,

        /// Management API access token, exported to the build tool
        #[arg(long, env = "GCP_ACCESS_TOKEN", hide_env_values = true)]
        token: String,

        /// Deployment environment name
        #[arg(long = "env", env = "ENV_NAME")]
        env_name: Option<String>,

        /// Build tool program to invoke
        #[arg(long, env = "APX_BUILD_TOOL")]
        tool: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apx=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let workspace = Workspace::new(cli.workspace);
    debug!("workspace root: {}", workspace.root().display());

    match cli.command {
        Commands::Generate {
            proxy_name,
            category,
            proxy_base_path,
            target_server_name,
            format,
        } => run_generate(
            workspace,
            proxy_name,
            category,
            proxy_base_path,
            target_server_name,
            format,
        ),
        Commands::Validate {
            proxy_name,
            token,
            management_url,
            scoped,
            format,
        } => run_validate(workspace, proxy_name, token, management_url, scoped, format),
        Commands::Deploy {
            proxy_name,
            token,
            env_name,
            tool,
            format,
        } => run_deploy(workspace, proxy_name, token, env_name, tool, format),
    }
}

fn run_generate(
    workspace: Workspace,
    proxy_name: Option<String>,
    category: Option<String>,
    proxy_base_path: Option<String>,
    target_server_name: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let mut options = GenerateOptions::new();
    if let Some(name) = proxy_name {
        options = options.with_proxy_name(name);
    }
    if let Some(category) = category {
        options = options.with_category(category);
    }
    if let Some(base_path) = proxy_base_path {
        options = options.with_proxy_base_path(base_path);
    }
    if let Some(target) = target_server_name {
        options = options.with_target_server_name(target);
    }

    let cmd = GenerateCommand::new(workspace)?;
    let report = cmd.execute(&options)?;
    print_generate_report(&report, format)
}

fn print_generate_report(report: &GenerateReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("✓ Generated bundle for '{}'", report.proxy_name);
            println!(
                "  Category: {} ({} policies)",
                report.category,
                report.policies.len()
            );
            for policy in &report.policies {
                println!("    - {policy}");
            }
            println!("  Bundle:   {}", report.bundle_dir.display());
            println!("  Archive:  {}", report.archive_path.display());
            println!("  Digest:   {}", report.archive_digest);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    }
    Ok(())
}

fn run_validate(
    workspace: Workspace,
    proxy_name: Option<String>,
    token: String,
    management_url: Option<Url>,
    scoped: bool,
    format: OutputFormat,
) -> Result<()> {
    let mut options = ValidateOptions::new(token).with_scope_to_proxy(scoped);
    if let Some(name) = proxy_name {
        options = options.with_proxy_name(name);
    }
    if let Some(url) = management_url {
        options = options.with_management_url(url);
    }

    let cmd = ValidateCommand::new(workspace)?;
    let report = cmd.execute(&options)?;
    print_validate_report(&report, format)
}

fn print_validate_report(report: &ValidateReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!(
                "✓ Validation passed for '{}' (HTTP {})",
                report.proxy_name, report.status
            );
            if !report.body.is_empty() {
                println!("  {}", report.body);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    }
    Ok(())
}

fn run_deploy(
    workspace: Workspace,
    proxy_name: Option<String>,
    token: String,
    env_name: Option<String>,
    tool: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut options = DeployOptions::new(token);
    if let Some(name) = proxy_name {
        options = options.with_proxy_name(name);
    }
    if let Some(env_name) = env_name {
        options = options.with_env_name(env_name);
    }
    if let Some(tool) = tool {
        options = options.with_tool(tool);
    }

    let cmd = DeployCommand::new(workspace)?;
    let report = cmd.execute(&options)?;
    print_deploy_report(&report, format)
}

fn print_deploy_report(report: &DeployReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!(
                "✓ Deployed '{}' to '{}' (project {})",
                report.proxy_name, report.env_name, report.project_id
            );
            println!("  Archive: {}", report.archive_path.display());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    }
    Ok(())
}
