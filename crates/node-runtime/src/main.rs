//! # Cert-Chain
//!
//! Issues and verifies certificates anchored in a ledger contract.
//!
//! ```text
//! cert-chain deploy --artifact artifacts/Certificates.json
//! cert-chain authorize
//! cert-chain issue --json request.json
//! cert-chain verify [--id N]
//! cert-chain decode --tx 0x…
//! cert-chain serve
//! ```
//!
//! Configuration comes from the environment (see `node_runtime::config`).
//! Any failure exits with status 1.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use cc_04_certificate_pipeline::deployment::load_bytecode;
use cc_04_certificate_pipeline::domain::request::IssueRequest;
use node_runtime::{build_gateway, build_pipeline, logging, NodeConfig};
use shared_types::{from_hex_data, Hash};

/// Cert-Chain: certificate issuance and verification
#[derive(Parser, Debug)]
#[command(name = "cert-chain", version)]
#[command(about = "Issue and verify certificates anchored in a ledger contract")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP facade
    Serve,
    /// Deploy the certificate contract and write the deployment record
    Deploy {
        /// Compiled artifact JSON (`bytecode` field) or raw hex file
        #[arg(long)]
        artifact: PathBuf,
    },
    /// Authorize the issuer account on the contract
    Authorize,
    /// Issue one certificate from a JSON request file
    Issue {
        /// Request body, structured (`metadata`) or flat fields
        #[arg(long)]
        json: PathBuf,
    },
    /// Verify a certificate, the latest when no id is given
    Verify {
        #[arg(long)]
        id: Option<u64>,
    },
    /// Decode a certificate transaction's input
    Decode {
        /// Transaction hash
        #[arg(long)]
        tx: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = NodeConfig::from_env().context("invalid configuration")?;
    logging::init(config.log_json)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        command = ?cli.command,
        "[node] Cert-Chain starting"
    );

    let pipeline = build_pipeline(&config)?;

    match cli.command {
        Command::Serve => {
            let gateway = build_gateway(&config, pipeline)?;
            gateway.serve().await?;
        }
        Command::Deploy { artifact } => {
            let bytecode = load_bytecode(&artifact).await?;
            let record = pipeline.deploy(&bytecode).await?;
            print_json(&record)?;
        }
        Command::Authorize => {
            let context = pipeline.prepare().await?;
            let receipt = pipeline.authorize_issuer(&context).await?;
            print_json(&receipt)?;
        }
        Command::Issue { json } => {
            let body = tokio::fs::read(&json)
                .await
                .with_context(|| format!("reading {}", json.display()))?;
            let request: IssueRequest = if body.iter().all(u8::is_ascii_whitespace) {
                IssueRequest::default()
            } else {
                serde_json::from_slice(&body)
                    .with_context(|| format!("parsing {}", json.display()))?
            };
            let receipt = pipeline.issue(&request).await?;
            print_json(&receipt)?;
        }
        Command::Verify { id } => {
            let verification = pipeline.verify(id).await?;
            print_json(&verification)?;
        }
        Command::Decode { tx } => {
            let bytes = from_hex_data(&tx).with_context(|| format!("{tx} is not hex"))?;
            if bytes.len() != 32 {
                anyhow::bail!("{tx} is not a 32-byte transaction hash");
            }
            let hash = Hash::from_slice(&bytes);
            match pipeline.decode_transaction(hash).await? {
                Some(decoded) => print_json(&decoded)?,
                None => anyhow::bail!("transaction {tx} not found"),
            }
        }
    }

    Ok(())
}
