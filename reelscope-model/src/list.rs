use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::ModelError;
use crate::media::MediaKind;

/// Aggregation window for trending lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TimeWindow {
    #[default]
    Day,
    Week,
}

impl TimeWindow {
    pub const fn as_str(self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

impl FromStr for TimeWindow {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(TimeWindow::Day),
            "week" => Ok(TimeWindow::Week),
            other => Err(ModelError::UnknownTimeWindow(other.to_string())),
        }
    }
}

/// Browsable catalog lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ListName {
    TrendingMovies(TimeWindow),
    TrendingTv(TimeWindow),
    PopularMovies,
    TopRatedMovies,
    NowPlayingMovies,
    UpcomingMovies,
    PopularTv,
    TopRatedTv,
    /// `/discover/movie` filtered by a genre id
    MoviesByGenre(u32),
}

impl ListName {
    /// Tabs of the movie browser, in display order.
    pub const MOVIE_TABS: [ListName; 4] = [
        ListName::PopularMovies,
        ListName::TopRatedMovies,
        ListName::NowPlayingMovies,
        ListName::UpcomingMovies,
    ];

    /// Endpoint path relative to the API base URL.
    pub fn path(&self) -> String {
        match self {
            ListName::TrendingMovies(window) => {
                format!("/trending/movie/{}", window.as_str())
            }
            ListName::TrendingTv(window) => {
                format!("/trending/tv/{}", window.as_str())
            }
            ListName::PopularMovies => "/movie/popular".to_string(),
            ListName::TopRatedMovies => "/movie/top_rated".to_string(),
            ListName::NowPlayingMovies => "/movie/now_playing".to_string(),
            ListName::UpcomingMovies => "/movie/upcoming".to_string(),
            ListName::PopularTv => "/tv/popular".to_string(),
            ListName::TopRatedTv => "/tv/top_rated".to_string(),
            ListName::MoviesByGenre(_) => "/discover/movie".to_string(),
        }
    }

    /// Query parameters beyond `page` and `language`.
    pub fn extra_params(&self) -> Vec<(&'static str, String)> {
        match self {
            ListName::MoviesByGenre(genre) => {
                vec![("with_genres", genre.to_string())]
            }
            _ => Vec::new(),
        }
    }

    /// Kind assumed for entries that do not carry their own `media_type`.
    pub const fn media_kind(&self) -> MediaKind {
        match self {
            ListName::TrendingTv(_)
            | ListName::PopularTv
            | ListName::TopRatedTv => MediaKind::TvShow,
            _ => MediaKind::Movie,
        }
    }

    /// Stable identifier, used for tab ids and request keys.
    pub fn slug(&self) -> String {
        match self {
            ListName::TrendingMovies(window) => {
                format!("trending_movies_{}", window.as_str())
            }
            ListName::TrendingTv(window) => {
                format!("trending_tv_{}", window.as_str())
            }
            ListName::PopularMovies => "popular".to_string(),
            ListName::TopRatedMovies => "top_rated".to_string(),
            ListName::NowPlayingMovies => "now_playing".to_string(),
            ListName::UpcomingMovies => "upcoming".to_string(),
            ListName::PopularTv => "popular_tv".to_string(),
            ListName::TopRatedTv => "top_rated_tv".to_string(),
            ListName::MoviesByGenre(genre) => format!("genre_{genre}"),
        }
    }

    pub fn label(&self) -> String {
        match self {
            ListName::TrendingMovies(TimeWindow::Day) => "Trending Today".into(),
            ListName::TrendingMovies(TimeWindow::Week) => {
                "Trending This Week".into()
            }
            ListName::TrendingTv(_) => "Trending TV Shows".into(),
            ListName::PopularMovies => "Popular".into(),
            ListName::TopRatedMovies => "Top Rated".into(),
            ListName::NowPlayingMovies => "Now Playing".into(),
            ListName::UpcomingMovies => "Upcoming".into(),
            ListName::PopularTv => "Popular TV Shows".into(),
            ListName::TopRatedTv => "Top Rated TV Shows".into(),
            ListName::MoviesByGenre(genre) => format!("Genre #{genre}"),
        }
    }
}

impl Display for ListName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.slug())
    }
}

impl FromStr for ListName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_lowercase().replace('-', "_");
        if let Some(genre) = raw
            .strip_prefix("genre_")
            .or_else(|| raw.strip_prefix("genre:"))
        {
            return genre
                .parse::<u32>()
                .map(ListName::MoviesByGenre)
                .map_err(|_| ModelError::UnknownList(s.to_string()));
        }
        let list = match raw.as_str() {
            "trending_movies" | "trending_movies_day" | "trending" => {
                ListName::TrendingMovies(TimeWindow::Day)
            }
            "trending_movies_week" => ListName::TrendingMovies(TimeWindow::Week),
            "trending_tv" | "trending_tv_day" => {
                ListName::TrendingTv(TimeWindow::Day)
            }
            "trending_tv_week" => ListName::TrendingTv(TimeWindow::Week),
            "popular" | "popular_movies" => ListName::PopularMovies,
            "top_rated" | "top_rated_movies" => ListName::TopRatedMovies,
            "now_playing" => ListName::NowPlayingMovies,
            "upcoming" => ListName::UpcomingMovies,
            "popular_tv" => ListName::PopularTv,
            "top_rated_tv" => ListName::TopRatedTv,
            _ => return Err(ModelError::UnknownList(s.to_string())),
        };
        Ok(list)
    }
}

/// Filter for the weekly trending mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TrendingFilter {
    #[default]
    All,
    Movies,
    Tv,
}

impl TrendingFilter {
    pub const fn as_str(self) -> &'static str {
        match self {
            TrendingFilter::All => "all",
            TrendingFilter::Movies => "movie",
            TrendingFilter::Tv => "tv",
        }
    }
}

impl FromStr for TrendingFilter {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TrendingFilter::All),
            "movie" | "movies" => Ok(TrendingFilter::Movies),
            "tv" | "tv_shows" => Ok(TrendingFilter::Tv),
            other => Err(ModelError::UnknownList(other.to_string())),
        }
    }
}
