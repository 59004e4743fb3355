use std::io::Write;

use chat_client::{
    render, ChatSession, ClientConfig, ClientError, ContactForm, FileStore, IssueType,
    RelayClient, SendOutcome, SessionStore, SupportTicketForm, WhatsAppChat,
    DEFAULT_REQUEST_TYPE,
};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "support-cli")]
#[command(about = "Chat with support, message us on WhatsApp, or open a ticket")]
struct Args {
    /// Relay base URL. Falls back to SUPPORT_API_URL env.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Chat with the assistant (/clear resets, /quit exits)
    Chat,

    /// Print the stored chat
    History,

    /// Reset the stored chat to the welcome message
    Clear,

    /// Chat with the team over WhatsApp
    Whatsapp {
        /// Your WhatsApp number; asked for on first send if omitted
        #[arg(long)]
        phone: Option<String>,
    },

    /// Ask the team to get in touch
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: Option<String>,

        /// Lead type recorded by the team
        #[arg(long, default_value = DEFAULT_REQUEST_TYPE)]
        request_type: String,
    },

    /// Open a support ticket
    Ticket {
        #[arg(long)]
        email: String,

        /// One of: general, technical, billing, login, feature
        #[arg(long, default_value = "general")]
        issue_type: IssueType,

        #[arg(long)]
        description: String,

        #[arg(long)]
        phone: Option<String>,
    },
}

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = args.api_url {
        config = config.with_api_url(url);
    }
    info!("Using relay at {}", config.api_url);

    let client = RelayClient::new(config.clone())?;
    let store = FileStore::new(&config.storage_dir);

    match args.command {
        Command::Chat => chat(client, store, &config).await?,
        Command::History => {
            match store.load(&config.storage_key)? {
                Some(messages) if !messages.is_empty() => {
                    for message in &messages {
                        print!("{}", render(message));
                    }
                }
                _ => println!("No stored chat."),
            }
        }
        Command::Clear => {
            let mut session = ChatSession::open(client, store, &config);
            session.clear();
            println!("Chat cleared.");
        }
        Command::Whatsapp { phone } => whatsapp(client, phone.as_deref(), &config).await?,
        Command::Contact {
            name,
            email,
            phone,
            request_type,
        } => {
            let client = client.with_request_type(request_type);
            let mut form = ContactForm::new();
            form.set_name(name);
            form.set_email(email);
            form.set_phone(phone.unwrap_or_default());
            form.submit(&client).await?;
            println!("Thanks! Our team will reach out to you soon.");
        }
        Command::Ticket {
            email,
            issue_type,
            description,
            phone,
        } => {
            let mut form = SupportTicketForm::new();
            form.set_email(email);
            form.set_issue_type(issue_type);
            form.set_description(description);
            form.set_phone(phone);
            form.submit(&client).await?;
            println!("Ticket created. We will respond within 24 hours.");
        }
    }

    Ok(())
}

async fn chat(client: RelayClient, store: FileStore, config: &ClientConfig) -> Result<(), ClientError> {
    let mut session = ChatSession::open(client, store, config);
    for message in session.messages() {
        print!("{}", render(message));
    }

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = prompt(&mut input, "> ").await? {
        match line.trim() {
            "/quit" => break,
            "/clear" => {
                session.clear();
                for message in session.messages() {
                    print!("{}", render(message));
                }
            }
            text => {
                if let Some(reply) = session.send(text).await {
                    print!("{}", render(&reply));
                }
            }
        }
    }

    session.close();
    Ok(())
}

async fn whatsapp(client: RelayClient, phone: Option<&str>, config: &ClientConfig) -> Result<(), ClientError> {
    let mut chat = WhatsAppChat::open(client, phone, config).await;
    let mut shown = print_new(&chat, 0);

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = prompt(&mut input, "> ").await? {
        if line.trim() == "/quit" {
            break;
        }

        let mut outcome = chat.send(&line).await;
        if outcome == SendOutcome::PhoneRequired {
            let raw = prompt(&mut input, "Your WhatsApp number (blank to cancel): ")
                .await?
                .unwrap_or_default();
            outcome = match chat.provide_phone(&raw).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };
        }

        if outcome == SendOutcome::Failed {
            println!("Message could not be delivered. Please try again.");
        }
        // History replaces the list; redraw if it shrank.
        if chat.messages().len() < shown {
            shown = 0;
        }
        shown = print_new(&chat, shown);
    }

    chat.close();
    Ok(())
}

fn print_new<A>(chat: &WhatsAppChat<A>, from: usize) -> usize
where
    A: chat_client::RelayApi,
{
    for message in &chat.messages()[from.min(chat.messages().len())..] {
        print!("{}", render(message));
    }
    chat.messages().len()
}

async fn prompt(input: &mut Input, label: &str) -> Result<Option<String>, ClientError> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(input.next_line().await?)
}
