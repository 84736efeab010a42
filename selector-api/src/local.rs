use log::{info, warn};
use rand::Rng;

use crate::models::{GenderFilter, LocalSelection};

/// Picks a pool line without touching the network.
///
/// `quantity_limit > 0` keeps only the first N lines before the gender filter runs;
/// the filter is a plain substring check for "1girl" / "1boy" on the whole line.
pub fn pick_local<R: Rng>(
    entries: &[String],
    gender_filter: GenderFilter,
    quantity_limit: usize,
    rng: &mut R,
) -> LocalSelection {
    if entries.is_empty() {
        warn!("character pool is empty");
        return LocalSelection::empty();
    }

    let window = if quantity_limit > 0 {
        &entries[..quantity_limit.min(entries.len())]
    } else {
        entries
    };

    let candidates: Vec<&String> = window
        .iter()
        .filter(|line| gender_filter.literal().is_none_or(|lit| line.contains(lit)))
        .collect();

    if candidates.is_empty() {
        warn!("no character matches gender='{gender_filter}', limit='{quantity_limit}'");
        return LocalSelection::empty();
    }

    let line = candidates[rng.random_range(0..candidates.len())];
    let name = line.split_once(',').map_or(line.as_str(), |(name, _)| name);
    info!("local pick: {name}");

    LocalSelection {
        character_name: name.to_string(),
        full_tags: line.clone(),
    }
}
