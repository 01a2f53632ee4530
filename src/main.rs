use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use frame_search_ui::command::{Command, FormField, HELP};
use frame_search_ui::modal::PlayerEvent;
use frame_search_ui::search::{Completion, SearchStatus, SearchTransport, Ticket};
use frame_search_ui::{AppState, ClickTarget, Config, HttpSearchClient, SearchResult, WidgetChange};

#[derive(Parser)]
#[command(name = "frame-search")]
#[command(version, about = "Interactive keyframe video search")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Search backend base URL (overrides config)
    #[arg(long)]
    base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

type Pending = JoinSet<(Ticket, frame_search_ui::Result<Vec<SearchResult>>)>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = cli.base_url {
        config.backend.base_url = base_url;
    }

    // Initialize logging
    let level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("frame_search_ui={},warn", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    config.validate()?;
    info!("🚀 Frame search starting...");
    info!("{}", config.summary());

    let client = Arc::new(HttpSearchClient::new(&config.backend).context("Failed to create search client")?);
    let mut app = AppState::new(&config)?;

    println!("{}", HELP);
    run(&mut app, client).await
}

/// Event loop: user commands and finished searches are handled one at a time
async fn run(app: &mut AppState, client: Arc<HttpSearchClient>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Pending = JoinSet::new();

    prompt();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    prompt();
                    continue;
                }
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => handle(app, command, &client, &mut pending),
                    Err(e) => println!("{}", e),
                }
                prompt();
            }
            Some(joined) = pending.join_next(), if !pending.is_empty() => {
                let (ticket, outcome) = joined.context("Search task panicked")?;
                if app.finish_search(&ticket, outcome) != Completion::Stale {
                    println!("{}", app.results().to_text());
                    prompt();
                }
            }
        }
    }

    pending.abort_all();
    info!("👋 Bye");
    Ok(())
}

fn handle(app: &mut AppState, command: Command, client: &Arc<HttpSearchClient>, pending: &mut Pending) {
    match command {
        Command::Add { label, count } => match app.add_constraint(&label, count) {
            Some(WidgetChange::Appended(widget)) => println!("+ {}", widget.text()),
            Some(WidgetChange::Removed(_)) => {}
            None => {
                if let Some(notice) = app.take_notice() {
                    println!("! {}", notice);
                }
            }
        },
        Command::Remove { label } => {
            if app.remove_constraint(&label).is_some() {
                println!("- {}", label);
            }
        }
        Command::List => {
            let widgets = app.constraint_widgets();
            if widgets.is_empty() {
                println!("(no object constraints)");
            }
            for widget in widgets {
                println!("  {}", widget.text());
            }
        }
        Command::SetField { field, value } => {
            let value = (!value.is_empty()).then_some(value);
            match field {
                FormField::Query => app.form.query = value,
                FormField::Text => app.form.text = value,
                FormField::Metadata => app.form.metadata = value,
            }
        }
        Command::ToggleFilters => println!("{}", app.toggle_filters()),
        Command::Search => {
            let ticket = app.begin_search();
            println!("{}", app.results().to_text());
            let client = Arc::clone(client);
            pending.spawn(async move {
                let outcome = client.search(&ticket.query).await;
                (ticket, outcome)
            });
        }
        Command::Open { position } => match app.activate_thumbnail(position) {
            Some(events) => print_player_events(&events),
            None => println!("No result at position {}", position + 1),
        },
        Command::ThumbnailFailed { position } => {
            if app.thumbnail_failed(position) {
                if let Some(card) = app.results().cards().get(position) {
                    println!("Thumbnail {} -> {}", position + 1, card.thumbnail.src);
                }
            } else {
                warn!("Thumbnail {} not replaced", position + 1);
            }
        }
        Command::Close => print_player_events(&app.modal_click(ClickTarget::CloseButton)),
        Command::ClickOverlay => print_player_events(&app.modal_click(ClickTarget::Overlay)),
        Command::ClickContent => print_player_events(&app.modal_click(ClickTarget::Content)),
        Command::Status => print_status(app),
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}

fn print_player_events(events: &[PlayerEvent]) {
    for event in events {
        match event {
            PlayerEvent::Paused => println!("⏸  paused"),
            PlayerEvent::SourceCleared => println!("⏏  source cleared"),
            PlayerEvent::Hidden => println!("   modal hidden"),
            PlayerEvent::TitleSet(title) => println!("   {}", title),
            PlayerEvent::SourceSet(src) => println!("▶  {}", src),
            PlayerEvent::Shown => println!("   modal shown"),
        }
    }
}

fn print_status(app: &AppState) {
    let search = match app.search_status() {
        SearchStatus::Idle => "idle".to_string(),
        SearchStatus::Loading { seq } => format!("loading (#{})", seq),
    };
    let modal = app.modal().state();
    println!("Search: {}", search);
    println!("Filters: {}", if app.filters_visible() { "shown" } else { "hidden" });
    println!("Form: {:?}", app.form);
    println!("Objects: {}", app.constraint_widgets().len());
    println!("Results: {}", app.results().cards().len());
    match &modal.media_id {
        Some(id) if modal.is_open => println!("Preview: {} at {}s", id, modal.start_offset_seconds),
        _ => println!("Preview: closed"),
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
