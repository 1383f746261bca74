//! Cloud Roles CLI
//!
//! - `list` prints every IAM role visible to the current credentials
//! - `put-policy` creates or replaces an inline policy on a role
//! - `config` prints an example configuration file
//!
//! Region, endpoint and listing options come from the config file and
//! `CLOUD_ROLES_*` environment variables; command-line flags win.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::info;

use cr_config::{AppConfig, ConfigLoader};
use cr_iam::{
    AwsIamClientFactory, IamClientFactory, PolicyAttachment, PolicyUpserter, RoleLister, MAX_PAGE_SIZE,
};

mod output;

use output::{write_roles, OutputFormat};

/// IAM role listing and inline policy management
#[derive(Parser, Debug)]
#[command(name = "cr-roles")]
#[command(about = "List IAM roles and create or update their inline policies")]
struct Args {
    /// Configuration file (defaults to CLOUD_ROLES_CONFIG or the standard search paths)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// AWS region for the IAM client
    #[arg(long, global = true)]
    region: Option<String>,

    /// Override the IAM endpoint (e.g. http://localhost:4566 for LocalStack)
    #[arg(long, global = true)]
    endpoint_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every role
    List {
        /// Only list roles under this IAM path
        #[arg(long)]
        path_prefix: Option<String>,

        /// Roles requested per page (1-1000)
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=MAX_PAGE_SIZE as i64))]
        page_size: Option<i32>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Create or replace an inline policy on a role
    PutPolicy {
        /// Role name
        #[arg(long)]
        role: String,

        /// Inline policy name
        #[arg(long)]
        policy_name: String,

        #[command(flatten)]
        document: DocumentSource,
    },

    /// Print an example configuration file
    Config,
}

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
struct DocumentSource {
    /// Policy document JSON
    #[arg(long)]
    document: Option<String>,

    /// File containing the policy document JSON
    #[arg(long)]
    document_file: Option<PathBuf>,
}

impl DocumentSource {
    fn read(&self) -> Result<String> {
        match (&self.document, &self.document_file) {
            (Some(document), _) => Ok(document.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read policy document {}", path.display())),
            (None, None) => anyhow::bail!("A policy document is required"),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (for local development)
    let _ = dotenvy::dotenv();

    cr_common::logging::init_logging("cr-roles");

    let args = Args::parse();

    match &args.command {
        Command::Config => {
            write_example_config(&mut std::io::stdout().lock())?;
            Ok(())
        }
        Command::List {
            path_prefix,
            page_size,
            output,
        } => {
            let config = resolve_config(&args)?;
            let page_size = page_size.unwrap_or(config.listing.page_size);
            let path_prefix = path_prefix.as_deref().or(config.listing.path_prefix());
            run_list(&build_factory(&config), &config.aws.region, page_size, path_prefix, *output)
                .await
        }
        Command::PutPolicy {
            role,
            policy_name,
            document,
        } => {
            let config = resolve_config(&args)?;
            let attachment = PolicyAttachment::new(role, policy_name, document.read()?);
            run_put_policy(build_factory(&config), &config.aws.region, &attachment).await
        }
    }
}

fn write_example_config<W: Write>(out: &mut W) -> std::io::Result<()> {
    write!(out, "{}", AppConfig::example_toml())
}

/// File and environment configuration with command-line overrides applied
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(region) = &args.region {
        config.aws.region = region.clone();
    }
    if let Some(endpoint_url) = &args.endpoint_url {
        config.aws.endpoint_url = endpoint_url.clone();
    }
    config.validate()?;

    Ok(config)
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let loader = match path {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    loader.load().context("Failed to load configuration")
}

fn build_factory(config: &AppConfig) -> AwsIamClientFactory {
    let factory = AwsIamClientFactory::new();
    match config.aws.endpoint_url() {
        Some(endpoint_url) => factory.with_endpoint_url(endpoint_url),
        None => factory,
    }
}

async fn run_list(
    factory: &AwsIamClientFactory,
    region: &str,
    page_size: i32,
    path_prefix: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    // One client for the whole listing
    let client = factory.create(region).await?;

    let mut lister = RoleLister::new(&client).with_page_size(page_size);
    if let Some(prefix) = path_prefix {
        lister = lister.with_path_prefix(prefix);
    }

    let roles = lister.list_all().await.context("Failed to list IAM roles")?;

    let stdout = std::io::stdout();
    write_roles(&mut stdout.lock(), &roles, format).context("Failed to write roles")?;
    Ok(())
}

async fn run_put_policy(
    factory: AwsIamClientFactory,
    region: &str,
    attachment: &PolicyAttachment,
) -> Result<()> {
    PolicyUpserter::new(factory)
        .upsert(region, attachment)
        .await
        .with_context(|| {
            format!(
                "Failed to put policy {} on role {}",
                attachment.policy_name, attachment.role_name
            )
        })?;

    info!(
        role = %attachment.role_name,
        policy = %attachment.policy_name,
        "Inline policy written"
    );
    Ok(())
}
