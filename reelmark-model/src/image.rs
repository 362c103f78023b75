use std::fmt::{self, Display, Formatter};

/// Catalog poster widths (2:3 aspect ratio)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PosterSize {
    W185,
    #[default]
    W342,
    W500,
    W780,
    Original,
}

impl PosterSize {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PosterSize::W185 => "w185",
            PosterSize::W342 => "w342",
            PosterSize::W500 => "w500",
            PosterSize::W780 => "w780",
            PosterSize::Original => "original",
        }
    }
}

/// Catalog backdrop widths (16:9 aspect ratio)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BackdropSize {
    W300,
    #[default]
    W780,
    W1280,
    Original,
}

impl BackdropSize {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BackdropSize::W300 => "w300",
            BackdropSize::W780 => "w780",
            BackdropSize::W1280 => "w1280",
            BackdropSize::Original => "original",
        }
    }
}

/// Any image size segment understood by the catalog image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSize {
    Poster(PosterSize),
    Backdrop(BackdropSize),
}

impl ImageSize {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Poster(size) => size.as_str(),
            ImageSize::Backdrop(size) => size.as_str(),
        }
    }
}

impl Display for ImageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PosterSize> for ImageSize {
    fn from(value: PosterSize) -> Self {
        ImageSize::Poster(value)
    }
}

impl From<BackdropSize> for ImageSize {
    fn from(value: BackdropSize) -> Self {
        ImageSize::Backdrop(value)
    }
}
