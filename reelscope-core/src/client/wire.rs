//! Response shapes of the TMDB v3 API and their mapping onto model types.
//!
//! Fields the API may omit or send as `null` are optional here so a sparse
//! entry never fails a whole page.

use chrono::NaiveDate;
use reelscope_model::{
    CastMember, GenreInfo, MediaDetail, MediaItem, MediaKind, PaginationPayload,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct PageWire<T> {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_results: Option<u64>,
}

impl PageWire<ItemWire> {
    pub fn into_payload(self, default_kind: MediaKind) -> PaginationPayload {
        let items = self
            .results
            .into_iter()
            .map(|item| item.into_item(default_kind))
            .collect();
        PaginationPayload::new(
            self.page.unwrap_or(1),
            self.total_pages.unwrap_or(0),
            self.total_results.unwrap_or(0),
            items,
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemWire {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub popularity: Option<f32>,
}

impl ItemWire {
    /// Entries from mixed endpoints carry `media_type`; list endpoints do not.
    pub fn into_item(self, default_kind: MediaKind) -> MediaItem {
        let kind = self
            .media_type
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(default_kind);
        let date = match kind {
            MediaKind::TvShow => self.first_air_date.or(self.release_date),
            _ => self.release_date.or(self.first_air_date),
        };
        MediaItem {
            id: self.id,
            kind,
            title: self.title.or(self.name).unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            poster_path: non_empty(self.poster_path.or(self.profile_path)),
            backdrop_path: non_empty(self.backdrop_path),
            release_date: parse_date(date.as_deref()),
            vote_average: self.vote_average.unwrap_or(0.0).max(0.0),
            popularity: self.popularity.unwrap_or(0.0).max(0.0),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenreListWire {
    #[serde(default)]
    pub genres: Vec<GenreWire>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenreWire {
    pub id: u32,
    pub name: String,
}

impl From<GenreWire> for GenreInfo {
    fn from(genre: GenreWire) -> Self {
        GenreInfo {
            id: genre.id,
            name: genre.name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CreditsWire {
    #[serde(default)]
    pub cast: Vec<CastWire>,
    #[serde(default)]
    pub crew: Vec<CrewWire>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CastWire {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CrewWire {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoWire {
    pub key: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub video_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultsWire<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Person filmography sections (`movie_credits`, `tv_credits`).
#[derive(Debug, Deserialize)]
pub(crate) struct FilmographyWire {
    #[serde(default)]
    pub cast: Vec<ItemWire>,
}

/// Detail response with appended sub-resources.
#[derive(Debug, Deserialize)]
pub(crate) struct DetailWire {
    #[serde(flatten)]
    pub base: ItemWire,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub vote_count: Option<u32>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub genres: Vec<GenreWire>,
    #[serde(default)]
    pub credits: Option<CreditsWire>,
    #[serde(default)]
    pub videos: Option<ResultsWire<VideoWire>>,
    #[serde(default)]
    pub similar: Option<ResultsWire<ItemWire>>,
    #[serde(default)]
    pub recommendations: Option<ResultsWire<ItemWire>>,
    #[serde(default)]
    pub movie_credits: Option<FilmographyWire>,
    #[serde(default)]
    pub tv_credits: Option<FilmographyWire>,
}

impl DetailWire {
    pub fn into_detail(self, kind: MediaKind) -> MediaDetail {
        let DetailWire {
            base,
            biography,
            birthday,
            vote_count,
            runtime,
            episode_run_time,
            number_of_seasons,
            number_of_episodes,
            genres,
            credits,
            videos,
            similar,
            recommendations,
            movie_credits,
            tv_credits,
        } = self;

        let mut item = ItemWire {
            media_type: None,
            ..base
        }
        .into_item(kind);
        if kind == MediaKind::Person {
            if let Some(bio) = biography.filter(|bio| !bio.is_empty()) {
                item.overview = bio;
            }
            item.release_date = parse_date(birthday.as_deref());
        }

        let credits = credits.unwrap_or_default();
        let mut cast = credits.cast;
        cast.sort_by_key(|member| member.order.unwrap_or(u32::MAX));
        let cast = cast
            .into_iter()
            .map(|member| CastMember {
                person_id: member.id,
                name: member.name,
                character: member.character.unwrap_or_default(),
                profile_path: non_empty(member.profile_path),
            })
            .collect();

        let director = credits
            .crew
            .into_iter()
            .find(|member| member.job.as_deref() == Some("Director"))
            .map(|member| member.name);

        let trailer_key = videos
            .map(|videos| videos.results)
            .unwrap_or_default()
            .into_iter()
            .find(|video| video.video_type == "Trailer" && video.site == "YouTube")
            .map(|video| video.key);

        let runtime_minutes = runtime
            .filter(|minutes| *minutes > 0)
            .or_else(|| episode_run_time.first().copied());

        let (similar, recommended) = if kind == MediaKind::Person {
            (
                filmography(movie_credits, MediaKind::Movie),
                filmography(tv_credits, MediaKind::TvShow),
            )
        } else {
            (
                related(similar, kind),
                related(recommendations, kind),
            )
        };

        MediaDetail {
            item,
            runtime_minutes,
            genres: genres.into_iter().map(GenreInfo::from).collect(),
            cast,
            director,
            trailer_key,
            vote_count: vote_count.unwrap_or(0),
            season_count: number_of_seasons,
            episode_count: number_of_episodes,
            similar,
            recommended,
        }
    }
}

fn related(section: Option<ResultsWire<ItemWire>>, kind: MediaKind) -> Vec<MediaItem> {
    section
        .map(|section| section.results)
        .unwrap_or_default()
        .into_iter()
        .map(|item| item.into_item(kind))
        .collect()
}

fn filmography(section: Option<FilmographyWire>, kind: MediaKind) -> Vec<MediaItem> {
    section
        .map(|section| section.cast)
        .unwrap_or_default()
        .into_iter()
        .map(|item| ItemWire {
            media_type: None,
            ..item
        })
        .map(|item| item.into_item(kind))
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// The API sends `""` for unknown dates.
fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.map(str::trim)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: serde_json::Value) -> ItemWire {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn tv_entries_use_name_and_first_air_date() {
        let mapped = item(json!({
            "id": 1399,
            "media_type": "tv",
            "name": "Game of Thrones",
            "first_air_date": "2011-04-17",
            "vote_average": 8.4
        }))
        .into_item(MediaKind::Movie);

        assert_eq!(mapped.kind, MediaKind::TvShow);
        assert_eq!(mapped.title, "Game of Thrones");
        assert_eq!(mapped.release_year(), Some(2011));
    }

    #[test]
    fn empty_dates_and_null_fields_are_tolerated() {
        let mapped = item(json!({
            "id": 7,
            "title": "Untitled",
            "release_date": "",
            "poster_path": null,
            "overview": null
        }))
        .into_item(MediaKind::Movie);

        assert_eq!(mapped.release_date, None);
        assert_eq!(mapped.poster_path, None);
        assert!(mapped.overview.is_empty());
    }

    #[test]
    fn person_entries_use_profile_image() {
        let mapped = item(json!({
            "id": 3894,
            "media_type": "person",
            "name": "Christian Bale",
            "profile_path": "/bale.jpg"
        }))
        .into_item(MediaKind::Movie);

        assert_eq!(mapped.kind, MediaKind::Person);
        assert_eq!(mapped.poster_path.as_deref(), Some("/bale.jpg"));
    }

    #[test]
    fn detail_picks_youtube_trailer_and_director() {
        let wire: DetailWire = serde_json::from_value(json!({
            "id": 155,
            "title": "The Dark Knight",
            "runtime": 152,
            "vote_count": 30000,
            "genres": [{"id": 18, "name": "Drama"}],
            "credits": {
                "cast": [
                    {"id": 2, "name": "Heath Ledger", "character": "Joker", "order": 1},
                    {"id": 1, "name": "Christian Bale", "character": "Bruce Wayne", "order": 0}
                ],
                "crew": [
                    {"name": "Hans Zimmer", "job": "Original Music Composer"},
                    {"name": "Christopher Nolan", "job": "Director"}
                ]
            },
            "videos": {"results": [
                {"key": "teaser", "site": "YouTube", "type": "Teaser"},
                {"key": "vimeo", "site": "Vimeo", "type": "Trailer"},
                {"key": "EXeTwQWrcwY", "site": "YouTube", "type": "Trailer"}
            ]},
            "similar": {"results": [{"id": 272, "title": "Batman Begins"}]},
            "recommendations": {"results": []}
        }))
        .unwrap();

        let detail = wire.into_detail(MediaKind::Movie);
        assert_eq!(detail.trailer_key.as_deref(), Some("EXeTwQWrcwY"));
        assert_eq!(detail.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(detail.cast[0].name, "Christian Bale");
        assert_eq!(detail.runtime_minutes, Some(152));
        assert_eq!(detail.similar[0].kind, MediaKind::Movie);
        assert!(detail.recommended.is_empty());
    }

    #[test]
    fn person_detail_maps_filmography() {
        let wire: DetailWire = serde_json::from_value(json!({
            "id": 3894,
            "name": "Christian Bale",
            "biography": "Welsh actor.",
            "birthday": "1974-01-30",
            "profile_path": "/bale.jpg",
            "movie_credits": {"cast": [{"id": 155, "title": "The Dark Knight"}]},
            "tv_credits": {"cast": [{"id": 1, "name": "Heartbeat"}]}
        }))
        .unwrap();

        let detail = wire.into_detail(MediaKind::Person);
        assert_eq!(detail.item.overview, "Welsh actor.");
        assert_eq!(detail.item.release_year(), Some(1974));
        assert_eq!(detail.similar[0].title, "The Dark Knight");
        assert_eq!(detail.recommended[0].kind, MediaKind::TvShow);
    }

    #[test]
    fn tv_detail_falls_back_to_episode_runtime() {
        let wire: DetailWire = serde_json::from_value(json!({
            "id": 1399,
            "name": "Game of Thrones",
            "episode_run_time": [60],
            "number_of_seasons": 8,
            "number_of_episodes": 73
        }))
        .unwrap();

        let detail = wire.into_detail(MediaKind::TvShow);
        assert_eq!(detail.runtime_minutes, Some(60));
        assert_eq!(detail.season_count, Some(8));
    }
}
