use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::ModelError;

/// Kind of catalog entity. Ids are only unique within one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MediaKind {
    /// Feature film
    Movie,
    /// Television series
    #[cfg_attr(feature = "serde", serde(rename = "tv"))]
    TvShow,
    /// Cast or crew member
    Person,
}

impl MediaKind {
    /// Path segment the catalog API uses for this kind (`/movie/{id}`, `/tv/{id}`...)
    pub const fn path_segment(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::TvShow => "tv",
            MediaKind::Person => "person",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "Movie"),
            MediaKind::TvShow => write!(f, "TV Show"),
            MediaKind::Person => write!(f, "Person"),
        }
    }
}

impl FromStr for MediaKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaKind::Movie),
            "tv" | "tv_show" | "tvshow" | "series" => Ok(MediaKind::TvShow),
            "person" | "people" => Ok(MediaKind::Person),
            other => Err(ModelError::UnknownMediaKind(other.to_string())),
        }
    }
}

/// One entry of a catalog list or search result page.
///
/// Items are owned by the response that produced them; the same title
/// appearing in two lists yields two independent values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaItem {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub vote_average: f32,
    pub popularity: f32,
}

impl MediaItem {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|date| date.year())
    }

    /// `"2024 • Movie"` style caption used by result rows.
    pub fn subtitle(&self) -> String {
        match self.release_year() {
            Some(year) => format!("{year} • {}", self.kind),
            None => self.kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kind_aliases() {
        assert_eq!("Movie".parse::<MediaKind>().unwrap(), MediaKind::Movie);
        assert_eq!("tv".parse::<MediaKind>().unwrap(), MediaKind::TvShow);
        assert_eq!("series".parse::<MediaKind>().unwrap(), MediaKind::TvShow);
        assert!(matches!(
            "album".parse::<MediaKind>(),
            Err(ModelError::UnknownMediaKind(_))
        ));
    }

    #[test]
    fn subtitle_includes_year_when_known() {
        let mut item = MediaItem {
            id: 1,
            kind: MediaKind::Movie,
            title: "Heat".into(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: NaiveDate::from_ymd_opt(1995, 12, 15),
            vote_average: 7.9,
            popularity: 40.0,
        };
        assert_eq!(item.subtitle(), "1995 • Movie");
        item.release_date = None;
        assert_eq!(item.subtitle(), "Movie");
    }
}
