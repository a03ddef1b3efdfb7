use crate::media::MediaItem;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenreInfo {
    pub id: u32,
    pub name: String,
}

/// Billed cast entry, kept in billing order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastMember {
    pub person_id: u64,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}

/// Full detail record for one movie, TV show or person.
///
/// Built once per detail fetch and dropped when the detail view closes.
/// For people, `overview` carries the biography, `release_date` the birthday,
/// `similar` the movie credits and `recommended` the TV credits.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaDetail {
    pub item: MediaItem,
    pub runtime_minutes: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub genres: Vec<GenreInfo>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cast: Vec<CastMember>,
    pub director: Option<String>,
    pub trailer_key: Option<String>,
    pub vote_count: u32,
    pub season_count: Option<u32>,
    pub episode_count: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub similar: Vec<MediaItem>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub recommended: Vec<MediaItem>,
}

impl MediaDetail {
    /// Watch URL for the trailer, when one was published on YouTube.
    pub fn trailer_url(&self) -> Option<String> {
        self.trailer_key
            .as_deref()
            .map(|key| format!("https://www.youtube.com/watch?v={key}"))
    }

    /// Runtime rendered as `2h 15m`.
    pub fn runtime_label(&self) -> Option<String> {
        self.runtime_minutes.filter(|m| *m > 0).map(|minutes| {
            let (hours, rest) = (minutes / 60, minutes % 60);
            match hours {
                0 => format!("{rest}m"),
                _ => format!("{hours}h {rest}m"),
            }
        })
    }

    /// Top billed cast, at most `limit` entries.
    pub fn top_cast(&self, limit: usize) -> &[CastMember] {
        &self.cast[..self.cast.len().min(limit)]
    }
}
