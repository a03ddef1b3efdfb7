use std::fmt::{Display, Formatter};

/// Returned by [`image_url`] when an entity has no artwork.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PosterSize {
    W92,
    W154,
    W185,
    W342,
    /// Detail page poster
    #[default]
    W500,
    W780,
    Original,
}

impl PosterSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterSize::W92 => "w92",
            PosterSize::W154 => "w154",
            PosterSize::W185 => "w185",
            PosterSize::W342 => "w342",
            PosterSize::W500 => "w500",
            PosterSize::W780 => "w780",
            PosterSize::Original => "original",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BackdropSize {
    W300,
    W780,
    W1280,
    /// Hero banners render backdrops untouched
    #[default]
    Original,
}

impl BackdropSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackdropSize::W300 => "w300",
            BackdropSize::W780 => "w780",
            BackdropSize::W1280 => "w1280",
            BackdropSize::Original => "original",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProfileSize {
    W45,
    #[default]
    W185,
    H632,
    Original,
}

impl ProfileSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileSize::W45 => "w45",
            ProfileSize::W185 => "w185",
            ProfileSize::H632 => "h632",
            ProfileSize::Original => "original",
        }
    }
}

/// Image size variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageSize {
    Poster(PosterSize),
    Backdrop(BackdropSize),
    Profile(ProfileSize),
}

impl ImageSize {
    pub const fn poster() -> Self {
        Self::Poster(PosterSize::W500)
    }

    /// Small poster for search suggestions
    pub const fn thumbnail() -> Self {
        Self::Poster(PosterSize::W185)
    }

    pub const fn backdrop() -> Self {
        Self::Backdrop(BackdropSize::Original)
    }

    pub const fn profile() -> Self {
        Self::Profile(ProfileSize::W185)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Poster(size) => size.as_str(),
            ImageSize::Backdrop(size) => size.as_str(),
            ImageSize::Profile(size) => size.as_str(),
        }
    }
}

impl Display for ImageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSize::Poster(s) => write!(f, "Poster ({})", s.as_str()),
            ImageSize::Backdrop(s) => write!(f, "Backdrop ({})", s.as_str()),
            ImageSize::Profile(s) => write!(f, "Profile ({})", s.as_str()),
        }
    }
}

/// Build a sized image URL, or the placeholder when `path` is missing.
pub fn image_url(base_url: &str, path: Option<&str>, size: ImageSize) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(path) => format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            size.as_str(),
            path.trim_start_matches('/')
        ),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}
