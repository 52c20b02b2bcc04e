mod cli;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use colored::*;
use std::io::{self, Read};
use std::process;
use std::sync::Arc;

use cli::{Args, Command, ConfigCommand, DocsCommand, GapsCommand};
use supportctl::api::{ApiClient, NewDocument, PageRequest};
use supportctl::config::{Config, ConfigOverrides, FileConfig};
use supportctl::controllers::{ChatsController, DocumentsController, ErrorState, GapsController};
use supportctl::models::Session;
use supportctl::text::process_chat_text;
use supportctl::ui;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        match e.downcast_ref::<ErrorState>() {
            Some(state) => eprintln!("{}", ui::render_error(state)),
            None => eprintln!("{} {:#}", "Error:".red(), e),
        }
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "supportctl=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<()> {
    // `config init` must work even when the current config file is broken
    if let Command::Config(ConfigCommand::Init { path }) = &args.command {
        let path = match path {
            Some(path) => path.clone(),
            None => FileConfig::user_config_dir()
                .map(|dir| dir.join("supportctl.yaml"))
                .ok_or_else(|| anyhow!("Could not determine home directory"))?,
        };
        FileConfig::write_starter(&path)?;
        println!("{} {}", "Config written to".green(), path.display());
        return Ok(());
    }

    let overrides = ConfigOverrides {
        api_base_url: args.api_base_url.clone(),
        client_id: args.client_id.clone(),
        config_path: args.config.clone(),
        verbose: args.verbose,
    };
    let config = Config::from_env_and_args(&overrides)?;
    init_tracing(config.verbose);
    let api = Arc::new(config.api_client()?);

    match args.command {
        Command::Sessions {
            date,
            all_dates,
            all,
        } => show_sessions(&config, api, date, all_dates, all).await,
        Command::Transcript { session_id, pages } => {
            show_transcript(&config, api, &session_id, pages).await
        }
        Command::Docs(command) => run_docs(&config, api, command).await,
        Command::Gaps(command) => run_gaps(&config, api, command).await,
        Command::Health => {
            let health = api.health_check().await?;
            println!("{} {}", "Backend healthy:".green(), health.status);
            Ok(())
        }
        Command::Config(ConfigCommand::Show) => {
            print!("{}", ui::render_settings(&config));
            Ok(())
        }
        Command::Config(ConfigCommand::Init { .. }) => unreachable!("handled above"),
    }
}

fn fail_on(error: Option<ErrorState>) -> Result<()> {
    match error {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

fn chats_controller(config: &Config, api: Arc<ApiClient>) -> ChatsController {
    ChatsController::with_page_limits(
        api,
        config.client_id.clone(),
        config.pagination.sessions,
        config.pagination.messages,
    )
}

async fn show_sessions(
    config: &Config,
    api: Arc<ApiClient>,
    date: Option<String>,
    all_dates: bool,
    all: bool,
) -> Result<()> {
    let chats = chats_controller(config, api);
    if all_dates {
        chats.set_date(None).await;
    } else if let Some(date) = date.as_deref() {
        chats.set_date(Some(date)).await;
    }

    chats.load_sessions().await;
    fail_on(chats.snapshot().await.error)?;

    while all && chats.snapshot().await.has_more_sessions() {
        chats.load_more_sessions().await;
        fail_on(chats.snapshot().await.error)?;
    }

    let state = chats.snapshot().await;
    print!(
        "{}",
        ui::render_sessions(
            &state.sessions,
            state.selected_date.as_deref(),
            state.has_more_sessions()
        )
    );
    Ok(())
}

async fn show_transcript(
    config: &Config,
    api: Arc<ApiClient>,
    session_id: &str,
    pages: u32,
) -> Result<()> {
    let chats = chats_controller(config, api);
    chats.set_date(None).await;
    // Selecting a session clears the controller error, so check the listing first.
    chats.load_sessions().await;
    fail_on(chats.snapshot().await.error)?;

    let session = chats
        .snapshot()
        .await
        .all_sessions
        .into_iter()
        .find(|s| s.id == session_id)
        .unwrap_or_else(|| Session {
            id: session_id.to_string(),
            customer_id: String::new(),
            created_at: String::new(),
        });

    chats.select_session(session.clone()).await;
    fail_on(chats.snapshot().await.error)?;

    for _ in 1..pages {
        if !chats.snapshot().await.has_more_messages() {
            break;
        }
        chats.load_more_messages().await;
        fail_on(chats.snapshot().await.error)?;
    }

    let state = chats.snapshot().await;
    print!(
        "{}",
        ui::render_transcript(&session, &state.messages, state.has_more_messages())
    );
    Ok(())
}

fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))
    }
}

async fn run_docs(config: &Config, api: Arc<ApiClient>, command: DocsCommand) -> Result<()> {
    let docs = DocumentsController::new(api, config.client_id.clone());

    let new_document = match command {
        DocsCommand::List { all } => {
            docs.load_documents("").await;
            fail_on(docs.snapshot().await.error)?;
            while all && docs.snapshot().await.has_more() {
                docs.load_more().await;
                fail_on(docs.snapshot().await.error)?;
            }
            let state = docs.snapshot().await;
            print!("{}", ui::render_documents(&state.documents, state.has_more()));
            return Ok(());
        }
        DocsCommand::Show { key, raw } => {
            let content = docs.get_document_content(&key).await?;
            if raw {
                print!("{}", content);
            } else {
                println!("{}", key.bold());
                println!("{}", process_chat_text(&content));
            }
            return Ok(());
        }
        DocsCommand::Delete { key } => {
            docs.delete_document(&key).await?;
            println!("{} {}", "Deleted".green(), key);
            return Ok(());
        }
        DocsCommand::AddUrl { url } => NewDocument::Url { url },
        DocsCommand::AddText { filename, source } => NewDocument::Doc {
            filename,
            content: read_source(&source)?,
        },
        DocsCommand::Edit { key, source } => NewDocument::Edit {
            key,
            content: read_source(&source)?,
        },
    };

    let confirmation = docs.create_document(&new_document).await?;
    println!(
        "{} {}",
        "Submitted:".green(),
        confirmation
            .message
            .unwrap_or_else(|| format!("{} document accepted", new_document.kind()))
    );

    // The server only confirms; the listing shows the document once it is processed.
    docs.refresh().await;
    let state = docs.snapshot().await;
    if state.error.is_none() {
        println!("{} documents in the knowledge base", state.documents.len());
    }
    Ok(())
}

async fn run_gaps(config: &Config, api: Arc<ApiClient>, command: GapsCommand) -> Result<()> {
    let gaps = GapsController::with_page_limit(api, config.client_id.clone(), config.pagination.gaps);

    match command {
        GapsCommand::List { all } => {
            gaps.load_gaps(PageRequest::new(config.pagination.gaps, 0)).await;
            fail_on(gaps.snapshot().await.error)?;
            while all && gaps.snapshot().await.has_more() {
                let before = gaps.snapshot().await.gaps.len();
                gaps.load_more().await;
                let state = gaps.snapshot().await;
                fail_on(state.error)?;
                if state.gaps.len() == before {
                    break;
                }
            }
            let state = gaps.snapshot().await;
            print!(
                "{}",
                ui::render_gaps(&state.gaps, state.pagination.count, state.has_more())
            );
        }
        GapsCommand::Answer { gap_id, answer } => {
            if answer.trim().is_empty() {
                bail!("answer must not be empty");
            }
            gaps.answer_gap(&gap_id, &answer).await?;
            println!("{} {}", "Answered".green(), gap_id);
        }
        GapsCommand::Delete { gap_id } => {
            gaps.delete_gap(&gap_id).await?;
            println!("{} {}", "Deleted".green(), gap_id);
        }
    }
    Ok(())
}
