use std::io::{self, Read};

use clap::{Parser, Subcommand};
use rfd_site::config::{ConfigError, SiteConfig};
use rfd_site::net::chat::{ChatError, ChatSession};
use rfd_site::net::contact::{ContactError, ContactSubmission, ContactSubmitter};
use rfd_site::net::transport::{ReqwestTransport, TransportError};
use rfd_site::reply::extract_reply_text;
use rfd_site::state::chat::{FAILURE_REPLY, reply_or_fallback};
use rfd_site::state::contact::SENT_STATUS;
use rfd_site::state::session::{MemoryStore, ensure_session_id};

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error(transparent)]
    Contact(#[from] ContactError),
    #[error("failed to read stdin: {0}")]
    Stdin(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "rfd-cli", about = "Exercise the RFD site chat and contact webhooks")]
struct Cli {
    /// Comma-separated chat webhook URLs, tried in order.
    #[arg(long, env = "RFD_CHAT_ENDPOINTS")]
    chat_endpoints: Option<String>,

    #[arg(long, env = "RFD_CONTACT_ENDPOINT")]
    contact_endpoint: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, env = "RFD_TIMEOUT_MS")]
    timeout_ms: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send one chat message and print the extracted reply.
    Chat {
        message: String,

        /// Reuse an existing conversation instead of starting a new one.
        #[arg(long, env = "RFD_SESSION_ID")]
        session_id: Option<String>,
    },
    /// Submit the contact form.
    Contact {
        #[arg(long)]
        nome: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        messaggio: String,
    },
    /// Read a webhook response body from stdin and print the extracted reply.
    Extract,
}

impl Cli {
    fn site_config(&self) -> Result<SiteConfig, ConfigError> {
        SiteConfig::from_lookup(|key| match key {
            "chatEndpoints" => self.chat_endpoints.clone(),
            "contactEndpoint" => self.contact_endpoint.clone(),
            "timeoutMs" => self.timeout_ms.clone(),
            _ => None,
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.site_config()?;

    match cli.command {
        Command::Chat { message, session_id } => run_chat(&config, &message, session_id).await,
        Command::Contact { nome, email, messaggio } => run_contact(&config, &nome, &email, &messaggio).await,
        Command::Extract => run_extract(),
    }
}

async fn run_chat(config: &SiteConfig, message: &str, session_id: Option<String>) -> Result<(), CliError> {
    let message = message.trim();
    if message.is_empty() {
        log::warn!("empty message, nothing sent");
        return Ok(());
    }

    let session_id = session_id.unwrap_or_else(|| ensure_session_id(&MemoryStore::default(), &config.session_key));
    let transport = ReqwestTransport::new(config.request_timeout_ms)?;
    let session = ChatSession::new(transport, config.chat_endpoints.clone(), session_id, config.source_tag.clone());
    log::info!("session {} via {} endpoint(s)", session.session_id(), session.endpoints().len());

    match session.send(message).await {
        Ok(payload) => {
            println!("{}", reply_or_fallback(&payload));
            Ok(())
        }
        Err(err) => {
            eprintln!("{FAILURE_REPLY}");
            Err(err.into())
        }
    }
}

async fn run_contact(config: &SiteConfig, nome: &str, email: &str, messaggio: &str) -> Result<(), CliError> {
    match submit_contact(config, nome, email, messaggio).await {
        Ok(()) => {
            println!("{SENT_STATUS}");
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.user_message());
            Err(err.into())
        }
    }
}

async fn submit_contact(config: &SiteConfig, nome: &str, email: &str, messaggio: &str) -> Result<(), ContactError> {
    let submission = ContactSubmission::new(nome, email, messaggio)?;
    let transport = ReqwestTransport::new(config.request_timeout_ms)?;
    ContactSubmitter::new(transport, config.contact_endpoint.clone())
        .submit(&submission)
        .await
}

fn run_extract() -> Result<(), CliError> {
    println!("{}", extract_from(io::stdin())?);
    Ok(())
}

/// Read a whole payload and extract its reply. Text that is not JSON is the
/// reply itself.
fn extract_from(mut input: impl Read) -> Result<String, CliError> {
    let mut raw = String::new();
    input.read_to_string(&mut raw)?;
    Ok(extract_reply_text(raw.trim()))
}
