use serde::Serialize;

use crate::models::GenderMarker;

/// Outcome of one scrape-and-consolidate run for a single character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedResult {
    pub character: String,
    pub gender: Option<GenderMarker>,
    pub tags: Vec<String>,
    pub post_count: usize,
}

impl ConsolidatedResult {
    pub fn has_data(&self) -> bool {
        self.post_count > 0
    }

    pub fn joined_tags(&self) -> String {
        self.tags.join(", ")
    }
}
