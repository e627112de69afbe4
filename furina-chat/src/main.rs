//! Furina command-line client.
//!
//! # Usage
//!
//! ```bash
//! # Seal a message locally and print the token
//! furina --paraphrase furina seal "hello"
//!
//! # Decrypt a token
//! furina --paraphrase furina open eyJ2IjoxLC...
//!
//! # Send to / read from the shared repository
//! FURINA_PARAPHRASE=furina furina send "hello"
//! FURINA_PARAPHRASE=furina furina fetch
//! ```

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use furina_chat::{ChatClient, Side, render_session, status_line};
use furina_crypto::{DEFAULT_PBKDF2_ITERATIONS, EnvelopeCodec, KdfParams};
use furina_transport::{GitHubTransport, TransportConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Passphrase-encrypted chat over a shared GitHub message list
#[derive(Parser, Debug)]
#[command(name = "furina")]
#[command(version)]
struct Args {
    /// Shared paraphrase (all parties must use the same one)
    #[arg(short, long, env = "FURINA_PARAPHRASE", hide_env_values = true)]
    paraphrase: String,

    /// PBKDF2 iteration count agreed with the other parties
    #[arg(long, env = "FURINA_PBKDF2_ITERATIONS", default_value_t = DEFAULT_PBKDF2_ITERATIONS)]
    iterations: u32,

    /// Repository owner holding the message list
    #[arg(long)]
    owner: Option<String>,

    /// Repository name holding the message list
    #[arg(long)]
    repo: Option<String>,

    /// GitHub token for dispatch, if the workflow requires one
    #[arg(long, env = "FURINA_GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt a message and print its token
    Seal {
        text: String,
        /// Sender tag stored alongside the ciphertext
        #[arg(long)]
        sender: Option<String>,
    },
    /// Decrypt a token
    Open {
        token: String,
        /// Print the message and metadata as JSON
        #[arg(long)]
        json: bool,
    },
    /// Encrypt a message and append it to the shared list
    Send { text: String },
    /// Fetch and decrypt the shared list
    Fetch,
}

fn init_logging(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn transport_config(args: &Args) -> TransportConfig {
    let mut config = TransportConfig::from_env();
    if let Some(owner) = &args.owner {
        config.owner = owner.clone();
    }
    if let Some(repo) = &args.repo {
        config.repo = repo.clone();
    }
    if let Some(token) = &args.token {
        config.token = Some(token.clone());
    }
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let codec = EnvelopeCodec::new(KdfParams::with_iterations(args.iterations))
        .context("invalid PBKDF2 iteration count")?;
    let paraphrase = args.paraphrase.trim().to_string();

    match &args.command {
        Command::Seal { text, sender } => {
            let token = furina_chat::seal_async(
                codec,
                text.clone(),
                paraphrase,
                sender.clone(),
            )
            .await?;
            println!("{token}");
        }
        Command::Open { token, json } => {
            let token = token.clone();
            let result = tokio::task::spawn_blocking(move || codec.open(&token, &paraphrase))
                .await
                .context("decryption task failed")?;
            match result {
                Ok(msg) if *json => println!("{}", serde_json::to_string_pretty(&msg)?),
                Ok(msg) => println!("{}", msg.text),
                Err(failure) => bail!("unreadable: {failure}"),
            }
        }
        Command::Send { text } => {
            let transport = GitHubTransport::new(transport_config(&args))
                .context("invalid transport configuration")?;
            let mut client = ChatClient::new(Arc::new(transport), codec, paraphrase);
            match client.send(text).await.context("failed to send message")? {
                Some(_) => eprintln!("message dispatched"),
                None => bail!("refusing to send an empty message"),
            }
        }
        Command::Fetch => {
            let transport = GitHubTransport::new(transport_config(&args))
                .context("invalid transport configuration")?;
            let mut client = ChatClient::new(Arc::new(transport), codec, paraphrase);
            client.refresh().await.context("failed to fetch messages")?;

            eprintln!("{}", status_line(client.session()));
            for line in render_session(client.session()) {
                let marker = match line.side {
                    Side::Sent => "> ",
                    Side::Received => "< ",
                    Side::Unknown => "? ",
                    Side::Placeholder => "",
                };
                println!("{marker}{}", line.text);
            }
        }
    }

    Ok(())
}
