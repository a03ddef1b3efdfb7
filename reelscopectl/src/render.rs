use anyhow::Result;
use reelscope_core::CatalogSession;
use reelscope_core::feed::HomeRows;
use reelscope_core::listing::PaginationState;
use reelscope_core::preferences::PreferenceSnapshot;
use reelscope_model::{
    GenreInfo, ImageSize, Language, MediaDetail, MediaItem, SUPPORTED_LANGUAGES,
};
use serde::Serialize;
use serde_json::json;

const TITLE_WIDTH: usize = 42;
const CAST_SHOWN: usize = 10;
const RELATED_SHOWN: usize = 6;

pub fn json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

pub fn items(heading: &str, items: &[MediaItem]) {
    println!("{heading}");
    if items.is_empty() {
        println!("  (nothing to show)");
        return;
    }
    for item in items {
        println!(
            "  {:>8}  {:<width$}  {:<16} ★ {:.1}",
            item.id,
            fit(&item.title, TITLE_WIDTH),
            item.subtitle(),
            item.vote_average,
            width = TITLE_WIDTH
        );
    }
}

pub fn page(heading: &str, state: &PaginationState, as_json: bool) -> Result<()> {
    if as_json {
        return json(&json!({
            "page": state.current_page,
            "total_pages": state.total_pages,
            "total_results": state.total_results,
            "items": state.items,
        }));
    }
    items(heading, &state.items);
    println!(
        "\n  page {} of {} ({} results)",
        state.current_page, state.total_pages, state.total_results
    );
    Ok(())
}

pub fn home(rows: &HomeRows, as_json: bool) -> Result<()> {
    if as_json {
        return json(&json!({
            "hero": rows.hero,
            "trending_movies": rows.trending_movies,
            "popular_movies": rows.popular_movies,
            "trending_tv": rows.trending_tv,
            "top_rated_movies": rows.top_rated_movies,
            "now_playing_movies": rows.now_playing_movies,
        }));
    }
    let sections = [
        ("Featured", &rows.hero),
        ("Trending Today", &rows.trending_movies),
        ("Popular", &rows.popular_movies),
        ("Trending TV Shows", &rows.trending_tv),
        ("Top Rated", &rows.top_rated_movies),
        ("Now Playing", &rows.now_playing_movies),
    ];
    for (heading, row) in sections {
        let shown = &row[..row.len().min(RELATED_SHOWN)];
        items(heading, shown);
        println!();
    }
    Ok(())
}

pub fn detail(session: &CatalogSession, detail: &MediaDetail, as_json: bool) -> Result<()> {
    if as_json {
        return json(detail);
    }
    let item = &detail.item;
    println!("{}  ({})", item.title, item.subtitle());
    println!("{}", "=".repeat(item.title.chars().count().min(72)));

    let mut facts = Vec::new();
    if item.vote_average > 0.0 {
        facts.push(format!("★ {:.1} ({} votes)", item.vote_average, detail.vote_count));
    }
    if let Some(runtime) = detail.runtime_label() {
        facts.push(runtime);
    }
    if let (Some(seasons), Some(episodes)) = (detail.season_count, detail.episode_count) {
        facts.push(format!("{seasons} seasons, {episodes} episodes"));
    }
    if !detail.genres.is_empty() {
        let names: Vec<_> = detail.genres.iter().map(|g| g.name.as_str()).collect();
        facts.push(names.join(", "));
    }
    if !facts.is_empty() {
        println!("{}", facts.join("  ·  "));
    }
    if let Some(director) = &detail.director {
        println!("Director: {director}");
    }
    if !item.overview.is_empty() {
        println!("\n{}", item.overview);
    }

    println!(
        "\nPoster:  {}",
        session.image_url(item.poster_path.as_deref(), ImageSize::poster())
    );
    if item.backdrop_path.is_some() {
        println!(
            "Backdrop: {}",
            session.image_url(item.backdrop_path.as_deref(), ImageSize::backdrop())
        );
    }
    if let Some(trailer) = detail.trailer_url() {
        println!("Trailer: {trailer}");
    }

    let cast = detail.top_cast(CAST_SHOWN);
    if !cast.is_empty() {
        println!("\nCast");
        for member in cast {
            println!("  {:<28} {}", fit(&member.name, 28), member.character);
        }
    }

    let (first, second) = match item.kind {
        reelscope_model::MediaKind::Person => ("Movies", "TV Shows"),
        _ => ("Similar", "Recommended"),
    };
    for (heading, related) in [(first, &detail.similar), (second, &detail.recommended)] {
        if !related.is_empty() {
            println!();
            items(heading, &related[..related.len().min(RELATED_SHOWN)]);
        }
    }
    Ok(())
}

pub fn genres(genres: &[GenreInfo], as_json: bool) -> Result<()> {
    if as_json {
        return json(&genres);
    }
    for genre in genres {
        println!("  {:>6}  {}", genre.id, genre.name);
    }
    Ok(())
}

pub fn languages(current: &str, as_json: bool) -> Result<()> {
    if as_json {
        let entries: Vec<_> = SUPPORTED_LANGUAGES
            .iter()
            .map(|Language { code, name, .. }| {
                json!({ "code": code, "name": name, "active": *code == current })
            })
            .collect();
        return json(&entries);
    }
    for language in SUPPORTED_LANGUAGES {
        let marker = if language.code == current { "*" } else { " " };
        println!("{marker} {} {:<6} {}", language.flag, language.code, language.name);
    }
    Ok(())
}

pub fn recent(preferences: &PreferenceSnapshot, as_json: bool) -> Result<()> {
    if as_json {
        return json(&preferences.recent_searches);
    }
    if preferences.recent_searches.is_empty() {
        println!("No recent searches.");
    }
    for (index, query) in preferences.recent_searches.iter().enumerate() {
        println!("  {:>2}. {query}", index + 1);
    }
    Ok(())
}
