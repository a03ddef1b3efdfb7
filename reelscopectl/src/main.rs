//! `reelscopectl`: terminal front end for the Reelscope catalog core.

mod cli;
mod render;

use anyhow::{Context, Result, bail};
use clap::Parser;
use reelscope_config::ConfigLoader;
use reelscope_core::detail::DetailStatus;
use reelscope_core::feed::FeedStatus;
use reelscope_core::search::SearchPhase;
use reelscope_core::{CatalogSession, FetchError, Outcome};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command, RecentAction};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let load = loader.load().context("failed to load configuration")?;
    debug!(source = ?load.source, "using configuration");

    let session = CatalogSession::from_config(&load.config)?;
    run(&cli, &session).await
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "warn,reelscope=debug"
    } else {
        "warn,reelscope=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Turns a finished request into a CLI error carrying the user-facing text.
fn settled(outcome: Outcome<()>) -> Result<()> {
    match outcome {
        Outcome::Delivered(Ok(())) => Ok(()),
        Outcome::Delivered(Err(err)) => Err(failure(err)),
        Outcome::Superseded => bail!("request was superseded before it finished"),
    }
}

fn failure(err: FetchError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

async fn run(cli: &Cli, session: &CatalogSession) -> Result<()> {
    let as_json = cli.json;

    match &cli.command {
        Command::Home => {
            settled(session.home().load().await)?;
            match session.home().home() {
                FeedStatus::Ready(rows) => render::home(&rows, as_json),
                FeedStatus::Failed(err) => Err(failure(err)),
                _ => bail!("home feed did not load"),
            }
        }
        Command::Trending { filter } => {
            settled(session.home().weekly_trending((*filter).into()).await)?;
            match session.home().weekly().status {
                FeedStatus::Ready(items) if as_json => render::json(&items),
                FeedStatus::Ready(items) => {
                    render::items("Trending this week", &items);
                    Ok(())
                }
                FeedStatus::Failed(err) => Err(failure(err)),
                _ => bail!("trending list did not load"),
            }
        }
        Command::List { list, page } => {
            settled(session.open_tab(*list).await)?;
            if *page > 1 {
                settled(session.browser().go_to_page(*page).await?)?;
            }
            render::page(&list.label(), &session.browser().snapshot(), as_json)
        }
        Command::Search { query, page } => {
            match session.submit_search(query).await {
                Some(outcome) => settled(outcome)?,
                None => bail!("search query is empty"),
            }
            if *page > 1 {
                settled(session.results().go_to_page(*page).await?)?;
            }
            let heading = format!("Results for \"{}\"", query.trim());
            render::page(&heading, &session.results().snapshot(), as_json)
        }
        Command::Suggest { query } => {
            let suggestions = session.suggestions();
            suggestions.submit(query).await;
            let snapshot = suggestions.snapshot();
            match snapshot.phase {
                SearchPhase::Resolved if as_json => render::json(&snapshot.results),
                SearchPhase::Resolved => {
                    render::items("Suggestions", &snapshot.results);
                    Ok(())
                }
                SearchPhase::Failed(err) => Err(failure(err)),
                SearchPhase::Idle => bail!(
                    "type at least {} characters to get suggestions",
                    suggestions.settings().min_query_chars
                ),
                _ => bail!("search did not finish"),
            }
        }
        Command::Detail { kind, id } => {
            settled(session.detail().open((*kind).into(), *id).await)?;
            match session.detail().snapshot().status {
                DetailStatus::Ready(detail) => render::detail(session, &detail, as_json),
                DetailStatus::Failed(err) => Err(failure(err)),
                _ => bail!("detail did not load"),
            }
        }
        Command::Genres { kind } => {
            let genres = session
                .genres((*kind).into())
                .await
                .map_err(failure)?;
            render::genres(&genres, as_json)
        }
        Command::Lang { code: None } => render::languages(&session.language(), as_json),
        Command::Lang { code: Some(code) } => {
            let changed = session.change_language(code)?;
            if !as_json {
                if changed {
                    println!("Language set to {}", session.language());
                } else {
                    println!("{} is already active", session.language());
                }
            }
            render::languages(&session.language(), as_json)
        }
        Command::Recent { action } => {
            let preferences = session.preferences();
            match action {
                Some(RecentAction::Remove { query }) => {
                    if !preferences.remove_search(query)? {
                        println!("\"{query}\" was not in the history");
                    }
                }
                Some(RecentAction::Clear) => preferences.clear_searches()?,
                None => {}
            }
            render::recent(&preferences.snapshot(), as_json)
        }
    }
}
