use log::debug;
use std::collections::{HashMap, HashSet};

use crate::models::config::Config;
use crate::models::{ConsolidatedResult, GenderMarker};

pub mod categories;
pub mod filters;
pub mod scorer;

use filters::TagFilter;
use scorer::{consistent_tags, select_tags};

/// Per-character tag statistics. Built fresh for every lookup attempt.
#[derive(Debug, Clone)]
pub struct TagProcessor {
    filter: TagFilter,
    counts: HashMap<String, usize>,
    positions: HashMap<String, Vec<usize>>,
    post_count: usize,
}

impl TagProcessor {
    pub fn new(subject: &str, extra_blacklist: &[String]) -> Self {
        Self {
            filter: TagFilter::new(subject, extra_blacklist),
            counts: HashMap::new(),
            positions: HashMap::new(),
            post_count: 0,
        }
    }

    pub fn ingest<I, S>(&mut self, posts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for post in posts {
            self.ingest_post(post.as_ref());
        }
    }

    /// Counts one post. Positions are indices into the post's full token list,
    /// excluded tokens included. A token repeated within a post counts once.
    pub fn ingest_post(&mut self, raw: &str) {
        let mut tokens = raw.split_whitespace().enumerate().peekable();
        if tokens.peek().is_none() {
            return;
        }
        self.post_count += 1;

        let mut seen = HashSet::new();
        for (pos, tag) in tokens {
            if !seen.insert(tag) || self.filter.is_excluded(tag) {
                continue;
            }
            *self.counts.entry(tag.to_string()).or_insert(0) += 1;
            self.positions.entry(tag.to_string()).or_default().push(pos);
        }
    }

    pub fn counts(&self) -> &HashMap<String, usize> {
        &self.counts
    }

    pub fn positions(&self) -> &HashMap<String, Vec<usize>> {
        &self.positions
    }

    pub fn post_count(&self) -> usize {
        self.post_count
    }

    pub fn frequency(&self, tag: &str) -> f64 {
        if self.post_count == 0 {
            return 0.0;
        }
        self.counts.get(tag).copied().unwrap_or(0) as f64 / self.post_count as f64
    }

    /// "1girl" is checked before "1boy"; the first at or over `threshold` wins.
    pub fn infer_gender(&self, threshold: f64) -> Option<GenderMarker> {
        if self.post_count == 0 {
            return None;
        }
        GenderMarker::PRIORITY
            .into_iter()
            .find(|m| self.counts.contains_key(m.as_tag()) && self.frequency(m.as_tag()) >= threshold)
    }

    pub fn select(&self, min_frequency: f64, max_tags: usize) -> Vec<String> {
        let scored = consistent_tags(&self.counts, &self.positions, self.post_count, min_frequency);
        debug!(
            "'{}': {} of {} tags pass min_frequency={min_frequency}",
            self.filter.subject(),
            scored.len(),
            self.counts.len()
        );
        select_tags(&scored, max_tags)
    }

    pub fn consolidate(&self, cfg: &Config) -> ConsolidatedResult {
        ConsolidatedResult {
            character: self.filter.subject().to_string(),
            gender: self.infer_gender(cfg.gender_threshold),
            tags: self.select(cfg.min_frequency, cfg.max_tags),
            post_count: self.post_count,
        }
    }
}

/// Runs the whole tag pass over scraped posts for `subject`.
pub fn consolidate<I, S>(subject: &str, posts: I, cfg: &Config) -> ConsolidatedResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut processor = TagProcessor::new(subject, &cfg.tag_blacklist);
    processor.ingest(posts);
    processor.consolidate(cfg)
}
