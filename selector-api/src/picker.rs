use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use crate::models::config::Config;
use crate::models::{ConsolidatedResult, GenderFilter, Selection};
use crate::pool::{character_tag, CharacterPool};
use crate::scrape::ScrapeSession;
use crate::utils::consolidate;

pub const MIN_PAGES: usize = 1;
pub const MAX_PAGES: usize = 10;
pub const DEFAULT_PAGES: usize = 3;

/// Raw seed value meaning "do not seed, draw from OS entropy".
pub const NO_SEED: i128 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Seed {
    #[default]
    Unseeded,
    Fixed(u64),
}

impl Seed {
    /// Accepts `-1` or anything in `0..=u64::MAX`. Other values are out of
    /// range and fall back to an unseeded draw.
    pub fn from_raw(raw: i128) -> Self {
        if raw == NO_SEED {
            return Seed::Unseeded;
        }
        match u64::try_from(raw) {
            Ok(seed) => Seed::Fixed(seed),
            Err(_) => {
                warn!("seed {raw} is out of range, drawing unseeded");
                Seed::Unseeded
            }
        }
    }
}

pub fn rng_for_seed(seed: Seed) -> StdRng {
    match seed {
        Seed::Unseeded => StdRng::from_os_rng(),
        Seed::Fixed(seed) => StdRng::seed_from_u64(seed),
    }
}

pub fn clamp_pages(pages: usize) -> usize {
    pages.clamp(MIN_PAGES, MAX_PAGES)
}

/// Scrapes `pages` result pages for `character` and consolidates their tags.
pub async fn lookup(
    cfg: Arc<Config>,
    character: &str,
    pages: usize,
) -> anyhow::Result<ConsolidatedResult> {
    let session = ScrapeSession::open(cfg.clone())?;
    let posts = session.scrape(character, pages).await;
    Ok(consolidate(character, &posts, &cfg))
}

#[derive(Debug)]
pub enum AttemptOutcome {
    Accepted(ConsolidatedResult),
    /// Data was found but the inferred gender did not match the filter.
    Rejected(ConsolidatedResult),
    NoData,
    Failed(anyhow::Error),
}

pub struct CharacterPicker {
    cfg: Arc<Config>,
    pool: Arc<CharacterPool>,
}

impl CharacterPicker {
    pub fn new(cfg: Arc<Config>, pool: Arc<CharacterPool>) -> Self {
        Self { cfg, pool }
    }

    pub async fn pick(&self, gender_filter: GenderFilter, pages: usize, seed: Seed) -> Selection {
        let mut rng = rng_for_seed(seed);
        self.pick_with_rng(gender_filter, pages, &mut rng).await
    }

    /// Draws independently from the whole pool until a character passes the
    /// filter or the attempt budget runs out. Attempts run one after another.
    pub async fn pick_with_rng<R: Rng + Send>(
        &self,
        gender_filter: GenderFilter,
        pages: usize,
        rng: &mut R,
    ) -> Selection {
        let entries = self.pool.entries();
        if entries.is_empty() {
            warn!("character pool is empty");
            return Selection::empty();
        }
        let pages = clamp_pages(pages);
        let budget = self.cfg.max_attempts;

        for attempt in 1..=budget {
            let line = &entries[rng.random_range(0..entries.len())];
            let character = character_tag(line);
            debug!("attempt {attempt}/{budget}: '{character}' (filter={gender_filter})");

            match self.attempt(character, gender_filter, pages).await {
                AttemptOutcome::Accepted(result) => {
                    info!(
                        "picked '{character}' on attempt {attempt}/{budget} with {} tags",
                        result.tags.len()
                    );
                    return Selection::new(character, result.joined_tags());
                }
                AttemptOutcome::Rejected(result) => {
                    let gender = result
                        .gender
                        .map_or_else(|| "none".to_string(), |g| g.to_string());
                    debug!("'{character}' inferred as {gender}, wanted {gender_filter}");
                }
                AttemptOutcome::NoData => {
                    warn!("no usable tags for '{character}'");
                }
                AttemptOutcome::Failed(e) => {
                    error!("attempt {attempt}/{budget} for '{character}' failed: {e:#}");
                }
            }
        }

        warn!("no character matched filter={gender_filter} after {budget} attempts");
        Selection::no_match()
    }

    pub async fn attempt(
        &self,
        character: &str,
        gender_filter: GenderFilter,
        pages: usize,
    ) -> AttemptOutcome {
        match lookup(self.cfg.clone(), character, pages).await {
            Ok(result) if !result.has_data() => AttemptOutcome::NoData,
            Ok(result) if gender_filter.accepts(result.gender) => AttemptOutcome::Accepted(result),
            Ok(result) => AttemptOutcome::Rejected(result),
            Err(e) => AttemptOutcome::Failed(e),
        }
    }
}
