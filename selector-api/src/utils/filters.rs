use log::error;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Generic composition, meta and bookkeeping tags that say nothing about a character.
pub const DEFAULT_BLACKLIST: &[&str] = &[
    "solo",
    "solo_focus",
    "looking_at_viewer",
    "smile",
    "open_mouth",
    "closed_mouth",
    "blush",
    "simple_background",
    "white_background",
    "grey_background",
    "transparent_background",
    "upper_body",
    "full_body",
    "cowboy_shot",
    "portrait",
    "standing",
    "sitting",
    "multiple_views",
    "commentary",
    "commentary_request",
    "english_commentary",
    "symbol-only_commentary",
    "translated",
    "translation_request",
    "signature",
    "watermark",
    "artist_name",
    "dated",
    "twitter_username",
    "username",
    "web_address",
    "official_art",
    "bad_id",
    "bad_pixiv_id",
    "pixiv_id",
    "duplicate",
    "md5_mismatch",
    "highres",
    "absurdres",
    "bad_twitter_id",
    "non-web_source",
    "sketch",
    "monochrome",
    "greyscale",
    "comic",
    "cosplay",
    "parody",
];

const STRUCTURAL_PATTERNS: &[&str] = &[
    // person counts other than singular
    r"^(?:[2-9]|[1-9]\d+|6\+)(?:girls|boys|others)$",
    // any count not starting with 1, singular or plural
    r"^[02-9]\d*(?:girl|boy)s?$",
    r"^multiple_(?:girls|boys|others)$",
    // numbered panels
    r"^\d+koma$",
    r"^\d+_panels?$",
    // resolution quality
    r"^(?:incredibly_)?absurdres$",
    r"^(?:very_)?(?:high|low)res$",
    r"^\d+k_resolution$",
    // censorship state
    r"^[a-z_]*censor(?:ed|ing|ship)?$",
    // content rating
    r"^rating:\S+$",
    r"^rating_[qse]$",
    r"^(?:general|sensitive|questionable|explicit|safe|nsfw)$",
];

static EXCLUSION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    STRUCTURAL_PATTERNS
        .iter()
        .filter_map(|p| {
            Regex::new(p)
                .map_err(|e| error!("bad exclusion pattern {p}: {e}"))
                .ok()
        })
        .collect()
});

pub fn is_structural_noise(tag: &str) -> bool {
    EXCLUSION_PATTERNS.iter().any(|re| re.is_match(tag))
}

/// Decides which tokens never reach the counters for one subject character.
#[derive(Debug, Clone)]
pub struct TagFilter {
    subject: String,
    blacklist: HashSet<String>,
}

impl TagFilter {
    pub fn new(subject: &str, extra_blacklist: &[String]) -> Self {
        let blacklist = DEFAULT_BLACKLIST
            .iter()
            .map(|t| t.to_string())
            .chain(extra_blacklist.iter().map(|t| t.trim().to_lowercase()))
            .filter(|t| !t.is_empty())
            .collect();
        Self {
            subject: subject.trim().to_string(),
            blacklist,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn is_excluded(&self, tag: &str) -> bool {
        tag == self.subject || self.blacklist.contains(tag) || is_structural_noise(tag)
    }
}
