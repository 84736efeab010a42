use rocket::FromFormField;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

pub mod config;
pub mod posts;
pub mod tags_info;

pub use posts::PageOutcome;
pub use tags_info::ConsolidatedResult;

/// Returned as the tag output when every attempt was used up.
pub const NO_MATCH_MESSAGE: &str = "no matching character found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromFormField, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderFilter {
    #[default]
    #[field(value = "any")]
    Any,
    #[field(value = "girl")]
    Girl,
    #[field(value = "boy")]
    Boy,
}

impl GenderFilter {
    pub fn accepts(self, marker: Option<GenderMarker>) -> bool {
        match self {
            GenderFilter::Any => true,
            GenderFilter::Girl => marker == Some(GenderMarker::Girl),
            GenderFilter::Boy => marker == Some(GenderMarker::Boy),
        }
    }

    /// Literal substring a pool line must carry for the local picker.
    pub fn literal(self) -> Option<&'static str> {
        match self {
            GenderFilter::Any => None,
            GenderFilter::Girl => Some(GenderMarker::Girl.as_tag()),
            GenderFilter::Boy => Some(GenderMarker::Boy.as_tag()),
        }
    }
}

impl Display for GenderFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GenderFilter::Any => write!(f, "any"),
            GenderFilter::Girl => write!(f, "girl"),
            GenderFilter::Boy => write!(f, "boy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenderMarker {
    #[serde(rename = "1girl")]
    Girl,
    #[serde(rename = "1boy")]
    Boy,
}

impl GenderMarker {
    /// Checked in this order; the first one over threshold wins.
    pub const PRIORITY: [GenderMarker; 2] = [GenderMarker::Girl, GenderMarker::Boy];

    pub const fn as_tag(self) -> &'static str {
        match self {
            GenderMarker::Girl => "1girl",
            GenderMarker::Boy => "1boy",
        }
    }

    pub fn is_marker_tag(tag: &str) -> bool {
        Self::PRIORITY.iter().any(|m| m.as_tag() == tag)
    }
}

impl Display for GenderMarker {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Output pair of the scraping picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub character_name: String,
    pub character_tags: String,
}

impl Selection {
    pub fn new(character_name: impl Into<String>, character_tags: impl Into<String>) -> Self {
        Self {
            character_name: character_name.into(),
            character_tags: character_tags.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new("", "")
    }

    pub fn no_match() -> Self {
        Self::new("", NO_MATCH_MESSAGE)
    }
}

/// Output pair of the local picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSelection {
    pub character_name: String,
    pub full_tags: String,
}

impl LocalSelection {
    pub fn empty() -> Self {
        Self {
            character_name: String::new(),
            full_tags: String::new(),
        }
    }
}
