use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use reelscope_model::{ListName, MediaKind, TrendingFilter};

#[derive(Debug, Parser)]
#[command(name = "reelscopectl", version, about = "Browse the movie and TV catalog from a terminal")]
pub struct Cli {
    /// TOML configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Landing page rows with the hero selection
    Home,
    /// Weekly trending titles
    Trending {
        #[arg(long, value_enum, default_value = "all")]
        filter: FilterArg,
    },
    /// One page of a named list (popular, top_rated, now_playing, upcoming,
    /// popular_tv, top_rated_tv, trending_movies_day, genre:28 ...)
    List {
        list: ListName,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Full search, recorded in the recent search history
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Top suggestions for a partial query
    Suggest { query: String },
    /// Detail page of a movie, series or person
    Detail {
        #[arg(value_enum)]
        kind: KindArg,
        id: u64,
    },
    /// Genre names for movies or series
    Genres {
        #[arg(value_enum, default_value = "movie")]
        kind: KindArg,
    },
    /// Show supported languages, or switch to one
    Lang { code: Option<String> },
    /// Recent search history
    Recent {
        #[command(subcommand)]
        action: Option<RecentAction>,
    },
}

#[derive(Debug, Subcommand)]
pub enum RecentAction {
    /// Drop one entry (case-insensitive)
    Remove { query: String },
    /// Forget the whole history
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Movie,
    Tv,
    Person,
}

impl From<KindArg> for MediaKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Movie => MediaKind::Movie,
            KindArg::Tv => MediaKind::TvShow,
            KindArg::Person => MediaKind::Person,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FilterArg {
    All,
    Movies,
    Tv,
}

impl From<FilterArg> for TrendingFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => TrendingFilter::All,
            FilterArg::Movies => TrendingFilter::Movies,
            FilterArg::Tv => TrendingFilter::Tv,
        }
    }
}
