use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::ModelError;

/// Kind of catalog entry a record refers to.
///
/// The wire form follows the catalog API: `movie` and `tv`. `series` is
/// accepted on input for older records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentType {
    #[cfg_attr(feature = "serde", serde(rename = "movie"))]
    Movie,
    #[cfg_attr(feature = "serde", serde(rename = "tv", alias = "series"))]
    Series,
}

impl ContentType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Series => "tv",
        }
    }

    pub const fn is_series(&self) -> bool {
        matches!(self, ContentType::Series)
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(ContentType::Movie),
            "tv" | "series" => Ok(ContentType::Series),
            other => Err(ModelError::UnknownContentType(other.to_string())),
        }
    }
}

/// Row-level filter used by the home sections (`all`, `movie`, `tv`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ContentTypeFilter {
    #[default]
    All,
    Movie,
    #[cfg_attr(feature = "serde", serde(rename = "tv", alias = "series"))]
    Series,
}

impl ContentTypeFilter {
    pub fn matches(&self, content_type: ContentType) -> bool {
        match self {
            ContentTypeFilter::All => true,
            ContentTypeFilter::Movie => content_type == ContentType::Movie,
            ContentTypeFilter::Series => content_type == ContentType::Series,
        }
    }
}

impl From<ContentType> for ContentTypeFilter {
    fn from(value: ContentType) -> Self {
        match value {
            ContentType::Movie => ContentTypeFilter::Movie,
            ContentType::Series => ContentTypeFilter::Series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_and_legacy_spellings() {
        assert_eq!("movie".parse::<ContentType>().unwrap(), ContentType::Movie);
        assert_eq!("tv".parse::<ContentType>().unwrap(), ContentType::Series);
        assert_eq!(
            "series".parse::<ContentType>().unwrap(),
            ContentType::Series
        );
        assert!("person".parse::<ContentType>().is_err());
    }

    #[test]
    fn filter_matches_by_kind() {
        assert!(ContentTypeFilter::All.matches(ContentType::Series));
        assert!(ContentTypeFilter::Movie.matches(ContentType::Movie));
        assert!(!ContentTypeFilter::Movie.matches(ContentType::Series));
        assert!(!ContentTypeFilter::Series.matches(ContentType::Movie));
    }
}
