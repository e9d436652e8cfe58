//! CLI entry point: drives signature requests through their lifecycle
//! against a JSON-file store.

mod jsonstore;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use inksign_client::{ClientConfig, Gateway};
use inksign_core::{
    Attachment, AuthMode, SignPosition, SignatureRequest, Signatory,
};
use inksign_flow::{Lifecycle, NoNotes, SignatureStore};
use jsonstore::JsonStore;

#[derive(Parser)]
#[command(name = "inksign", version, about = "Electronic-signature request connector")]
struct Cli {
    /// Path of the JSON request store.
    #[arg(long, env = "INKSIGN_STORE", default_value = "inksign-requests.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a draft request from PDF files and signer specs.
    New {
        /// Signer as `First:Last:email[:mobile]`; repeatable, in signing order.
        #[arg(long = "signer", required = true)]
        signers: Vec<String>,
        /// PDF file to sign; repeatable.
        #[arg(long = "document", required = true)]
        documents: Vec<PathBuf>,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: String,
        #[arg(long, default_value = "en_US")]
        locale: String,
        /// Signers sign one after the other, in the given order.
        #[arg(long)]
        ordered: bool,
        /// Signature placement preset: `top` or `bottom`.
        #[arg(long, default_value = "top")]
        position: String,
    },
    /// Send a draft request to the signing service.
    Send { name: String },
    /// Poll signing progress for one sent request.
    Status { name: String },
    /// Download and attach signed files for one signed request.
    Archive { name: String },
    /// Cancel requests remotely and mark them cancelled locally.
    Cancel {
        names: Vec<String>,
        /// Name recorded in the remote cancellation note.
        #[arg(long, env = "USER", default_value = "operator")]
        by: String,
    },
    /// Poll every sent request, then archive every signed one.
    Sweep,
    /// List requests and their states.
    List,
}

fn parse_signer(spec: &str) -> anyhow::Result<Signatory> {
    let parts: Vec<&str> = spec.split(':').collect();
    let [first, last, email, rest @ ..] = parts.as_slice() else {
        anyhow::bail!("signer spec '{spec}' must be First:Last:email[:mobile]");
    };
    let mobile = rest.first().map(|m| m.to_string());
    let auth_mode = if mobile.is_some() {
        AuthMode::OtpSms
    } else {
        AuthMode::OtpEmail
    };
    let mut signatory = Signatory::new(*first, *last, *email, auth_mode);
    signatory.mobile = mobile;
    Ok(signatory)
}

fn parse_position(position: &str) -> anyhow::Result<SignPosition> {
    match position {
        "top" => Ok(SignPosition::Top),
        "bottom" => Ok(SignPosition::Bottom),
        other => anyhow::bail!("position must be 'top' or 'bottom', got '{other}'"),
    }
}

fn lifecycle() -> anyhow::Result<Lifecycle> {
    let config = ClientConfig::from_env().context("signing-service configuration")?;
    Ok(Lifecycle::new(Gateway::new(config)?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let mut store = JsonStore::open(&cli.store)?;
    let mut notes = NoNotes;

    match cli.command {
        Command::New {
            signers,
            documents,
            subject,
            body,
            locale,
            ordered,
            position,
        } => {
            let name = store.next_name();
            let mut request = SignatureRequest::new(name.clone(), locale);
            request.init_mail_subject = subject;
            request.init_mail_body = body;
            request.ordered = ordered;
            request.sign_position = parse_position(&position)?;
            for spec in &signers {
                request.signatories.push(parse_signer(spec)?);
            }
            for path in &documents {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "document.pdf".to_string());
                request.documents.push(Attachment::new(filename, bytes));
            }
            store.save(request)?;
            println!("created draft request {name}");
        }
        Command::Send { name } => {
            let mut request = store.load(&name)?;
            lifecycle()?.send(&mut request, &mut notes).await?;
            println!(
                "request {} sent as {}",
                request.name,
                request.remote_id().unwrap_or("-")
            );
            store.save(request)?;
        }
        Command::Status { name } => {
            let mut request = store.load(&name)?;
            lifecycle()?
                .update_status(&mut request, &mut notes, false)
                .await?;
            println!("request {} is {}", request.name, request.state.as_str());
            store.save(request)?;
        }
        Command::Archive { name } => {
            let mut request = store.load(&name)?;
            lifecycle()?.archive(&mut request, &mut notes, false).await?;
            println!(
                "request {} is {} ({} signed file(s))",
                request.name,
                request.state.as_str(),
                request.signed_documents.len()
            );
            store.save(request)?;
        }
        Command::Cancel { names, by } => {
            let mut requests = names
                .iter()
                .map(|n| store.load(n))
                .collect::<anyhow::Result<Vec<_>>>()?;
            lifecycle()?.cancel(&mut requests, &by, &mut notes).await?;
            for request in requests {
                println!("request {} cancelled", request.name);
                store.save(request)?;
            }
        }
        Command::Sweep => {
            let report = lifecycle()?.sweep(&mut store, &mut notes).await?;
            println!(
                "polled {} request(s), archived {}",
                report.polled, report.archived
            );
        }
        Command::List => {
            for request in store.all() {
                println!(
                    "{:<12} {:<10} {}",
                    request.name,
                    request.state.as_str(),
                    request.remote_id().unwrap_or("-")
                );
            }
        }
    }

    store.persist()?;
    Ok(())
}
