use std::env;
use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clinic_core::{
    classify_urgency, Author, Catalog, Locale, Message, Translator, Urgency, QUICK_SUGGESTIONS,
};
use clinic_observability::{init_tracing, ChatMetrics};
use clinic_session::{ChatSession, SendOutcome};
use clinic_transport::{AppEnv, ClientConfig, HttpTransport};

#[derive(Debug, Parser)]
#[command(name = "clinic")]
#[command(about = "AIClinic chat client")]
struct Cli {
    /// Backend base URL; defaults depend on the app environment.
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long)]
    app_env: Option<String>,

    /// Device language tag such as `ka-GE`; falls back to `LANG`.
    #[arg(long, env = "CLINIC_LOCALE")]
    locale: Option<String>,

    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    Chat,
    Ask { message: String },
    Classify { text: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli, |key| env::var(key).ok())?;
    init_tracing("clinic_cli", config.debug);

    let locale_tag = cli.locale.clone().or_else(|| env::var("LANG").ok());
    let catalog = Catalog::new(Locale::from_tag(locale_tag.as_deref()));

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => {
            let session = build_session(&config, catalog)?;
            run_chat(&session, &catalog).await?;
        }
        Command::Ask { message } => {
            let session = build_session(&config, catalog)?;
            session.start();
            session.update_draft(message);
            let outcome = session.send().await;
            tracing::info!(outcome = ?outcome, "ask finished");
            println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
        }
        Command::Classify { text } => {
            println!("{}", classify_urgency(&text));
        }
    }

    Ok(())
}

// Flags shadow the matching `CLINIC_*` variable; everything else is left to
// `ClientConfig::from_vars`, so unset flags never discard environment values.
fn resolve_config(
    cli: &Cli,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig> {
    if let Some(app_env) = cli.app_env.as_deref() {
        AppEnv::parse(app_env).context("invalid --app-env value")?;
    }

    Ok(ClientConfig::from_vars(|key| {
        let flag = match key {
            "CLINIC_APP_ENV" => cli.app_env.clone(),
            "CLINIC_API_BASE_URL" => cli.base_url.clone(),
            "CLINIC_DEBUG" if cli.debug => Some("true".to_string()),
            _ => None,
        };
        flag.or_else(|| lookup(key))
    }))
}

fn build_session(config: &ClientConfig, catalog: Catalog) -> Result<ChatSession<HttpTransport>> {
    let transport = HttpTransport::new(config)?;
    tracing::info!(
        endpoint = %transport.endpoint(),
        app_env = config.app_env.as_str(),
        "chat transport ready"
    );

    Ok(ChatSession::new(
        transport,
        Arc::new(catalog),
        ChatMetrics::shared(),
    ))
}

async fn run_chat(session: &ChatSession<HttpTransport>, catalog: &Catalog) -> Result<()> {
    println!("{}", catalog.t("welcome.title"));
    println!("{}\n", catalog.t("welcome.subtitle"));
    println!("{}: {}\n", catalog.t("warning.title"), catalog.t("warning.description"));
    print!("[{}] ", catalog.t("welcome.startChat"));
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(());
    }

    session.start();
    for message in session.snapshot().messages {
        print_message(&message);
    }

    println!("Suggestions:");
    for (index, suggestion) in QUICK_SUGGESTIONS.iter().enumerate() {
        println!("  /{} {suggestion}", index + 1);
    }
    println!("type 'exit' to quit.\n");

    loop {
        print!("{} > ", catalog.t("placeholder"));
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let input = line.trim();
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        match parse_suggestion(input) {
            Some(index) => {
                if session.apply_suggestion(index).is_none() {
                    println!("no such suggestion");
                    continue;
                }
            }
            None => session.update_draft(input),
        }

        if !session.snapshot().can_send() {
            continue;
        }

        println!("{}", catalog.t("typing"));
        let outcome = session.send().await;
        if outcome == SendOutcome::Ignored {
            continue;
        }

        // Skip the echoed user message; print only what the bot appended.
        if let Some(reply) = session.snapshot().last_message() {
            print_message(reply);
        }
    }

    let metrics = session.metrics().snapshot();
    tracing::info!(
        sends = metrics.sends_total,
        failures = metrics.send_failures_total,
        avg_latency_millis = metrics.avg_latency_millis,
        "chat closed"
    );

    Ok(())
}

fn parse_suggestion(input: &str) -> Option<usize> {
    input
        .strip_prefix('/')
        .and_then(|value| value.parse::<usize>().ok())
        .and_then(|number| number.checked_sub(1))
}

fn print_message(message: &Message) {
    let who = match message.author {
        Author::User => "you",
        Author::Bot => "bot",
    };
    let marker = match message.urgency {
        Urgency::Emergency => " [EMERGENCY]",
        Urgency::Urgent => " [URGENT]",
        Urgency::Normal => "",
    };

    println!("\n{who}{marker}: {}\n", message.text);
}
