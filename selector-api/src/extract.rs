use log::{debug, error};
use scraper::{Html, Selector};

use crate::models::config::Config;

/// Where the tag strings live in a search result page.
#[derive(Debug, Clone)]
pub struct ExtractRules {
    pub gallery: String,
    pub post: String,
    pub tags_attribute: String,
}

impl ExtractRules {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            gallery: cfg.gallery_selector.clone(),
            post: cfg.post_selector.clone(),
            tags_attribute: cfg.tags_attribute.clone(),
        }
    }
}

impl Default for ExtractRules {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn parse_selector(s: &str) -> Option<Selector> {
    Selector::parse(s)
        .map_err(|e| error!("invalid selector '{s}': {e}"))
        .ok()
}

/// One whitespace-separated tag string per post, in document order.
/// Anything unexpected yields an empty list.
pub fn extract_post_tags(body: &str, rules: &ExtractRules) -> Vec<String> {
    let (Some(gallery), Some(post)) = (parse_selector(&rules.gallery), parse_selector(&rules.post))
    else {
        return Vec::new();
    };

    let doc = Html::parse_document(body);
    let Some(container) = doc.select(&gallery).next() else {
        debug!("no gallery container '{}' in page", rules.gallery);
        return Vec::new();
    };

    let tags: Vec<String> = container
        .select(&post)
        .filter_map(|article| article.value().attr(&rules.tags_attribute))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    debug!("extracted {} tagged posts", tags.len());
    tags
}
