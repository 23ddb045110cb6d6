//! # SECTL CLI
//!
//! Command-line interface for rendering and applying secret engine policies
//! outside the controller, e.g. to inspect what the operator would write.
//!
//! ## Usage
//!
//! ```bash
//! # Print the policy template for a GCP engine mounted at my-gcp-path
//! sectl render --kind gcp --path my-gcp-path
//!
//! # Show the policy the operator derives from a SecretEngine manifest
//! sectl plan --file gcpse.yaml
//!
//! # Write it to Vault (VAULT_ADDR / VAULT_TOKEN from the environment)
//! sectl apply --file gcpse.yaml
//!
//! # Remove it again
//! sectl delete --file gcpse.yaml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secret_engine_operator::config::{load_config, VaultConfig};
use secret_engine_operator::crd::{EngineKind, SecretEngine};
use secret_engine_operator::observability;
use secret_engine_operator::policy::{
    policy_name, resolve_mount_path, PolicyBuilder, PolicyDocument,
};
use secret_engine_operator::vault::VaultClient;
use std::path::{Path, PathBuf};
use tracing::info;

/// Secret engine policy CLI
#[derive(Parser)]
#[command(name = "sectl")]
#[command(about = "Render and apply Vault policies for SecretEngine resources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Vault address (defaults to VAULT_ADDR)
    #[arg(long, global = true)]
    vault_addr: Option<String>,

    /// Vault token (defaults to VAULT_TOKEN)
    #[arg(long, global = true, hide = true)]
    vault_token: Option<String>,

    /// Cluster name used in policy names (defaults to CLUSTER_NAME or "-")
    #[arg(long, global = true)]
    cluster_name: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the policy for an engine kind and mount path
    Render {
        /// Engine kind: gcp, aws, azure, database
        #[arg(short, long)]
        kind: EngineKind,
        /// Mount path (defaults to the kind's default path)
        #[arg(short, long, default_value = "")]
        path: String,
    },
    /// Print the policy name and text derived from a SecretEngine manifest
    Plan {
        /// SecretEngine manifest (YAML)
        #[arg(short, long)]
        file: PathBuf,
        /// Mount path override
        #[arg(short, long, default_value = "")]
        path: String,
    },
    /// Write the policy for a SecretEngine manifest to Vault
    Apply {
        /// SecretEngine manifest (YAML)
        #[arg(short, long)]
        file: PathBuf,
        /// Mount path override
        #[arg(short, long, default_value = "")]
        path: String,
    },
    /// Delete the policy for a SecretEngine manifest from Vault
    Delete {
        /// SecretEngine manifest (YAML)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Print the policy name for a resource
    PolicyName {
        #[arg(short, long)]
        namespace: String,
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    observability::init_tracing()?;

    let config = resolve_config(&cli);

    match cli.command {
        Commands::Render { kind, path } => {
            let mount_path = resolve_mount_path(kind, &path, "")?;
            print!("{}", PolicyDocument::for_engine(kind, &mount_path));
        }
        Commands::Plan { file, path } => {
            let engine = read_manifest(&file)?;
            let builder = PolicyBuilder::new(vault_client(&config)?, config.cluster_name.clone());
            let policy = builder.build(&engine, &path)?;
            println!("# policy: {}", policy.name);
            println!("# kind: {}", policy.kind);
            println!("# mount path: {}", policy.mount_path);
            print!("{}", policy.rendered());
        }
        Commands::Apply { file, path } => {
            let engine = read_manifest(&file)?;
            let builder = PolicyBuilder::new(vault_client(&config)?, config.cluster_name.clone());
            let policy = builder
                .apply(&engine, &path)
                .await
                .with_context(|| format!("Failed to apply policy from {}", file.display()))?;
            info!("Policy {} written to {}", policy.name, config.address);
            println!("{}", policy.name);
        }
        Commands::Delete { file } => {
            let engine = read_manifest(&file)?;
            let builder = PolicyBuilder::new(vault_client(&config)?, config.cluster_name.clone());
            builder
                .delete(&engine)
                .await
                .with_context(|| format!("Failed to delete policy for {}", file.display()))?;
            println!("{}", engine.policy_name(&config.cluster_name));
        }
        Commands::PolicyName { namespace, name } => {
            println!("{}", policy_name(&config.cluster_name, &namespace, &name));
        }
    }

    Ok(())
}

/// Environment configuration with CLI flag overrides
fn resolve_config(cli: &Cli) -> VaultConfig {
    let mut config = load_config();
    if let Some(addr) = &cli.vault_addr {
        config = config.with_address(addr.as_str());
    }
    if let Some(token) = &cli.vault_token {
        config = config.with_token(token.as_str());
    }
    if let Some(cluster) = &cli.cluster_name {
        config.cluster_name.clone_from(cluster);
    }
    config
}

fn vault_client(config: &VaultConfig) -> Result<VaultClient> {
    VaultClient::new(config).context("Failed to create Vault client")
}

fn read_manifest(file: &Path) -> Result<SecretEngine> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse SecretEngine from {}", file.display()))
}
