use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::models::GenderMarker;
use crate::utils::categories::TagCategory;

const POSITION_DECAY: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTag {
    pub tag: String,
    pub frequency: f64,
    pub score: f64,
}

/// Decays from 1.0 at position 0; tags listed earlier are treated as more defining.
#[inline]
pub fn position_score(average_position: f64) -> f64 {
    1.0 / (1.0 + average_position * POSITION_DECAY)
}

/// Tags seen in at least `min_frequency` of the posts, best score first.
pub fn consistent_tags(
    counts: &HashMap<String, usize>,
    positions: &HashMap<String, Vec<usize>>,
    post_count: usize,
    min_frequency: f64,
) -> Vec<ScoredTag> {
    if post_count == 0 {
        return Vec::new();
    }
    let n = post_count as f64;

    let mut scored: Vec<ScoredTag> = counts
        .iter()
        .filter_map(|(tag, &count)| {
            let frequency = count as f64 / n;
            if frequency < min_frequency {
                return None;
            }
            let seen = positions.get(tag).filter(|p| !p.is_empty())?;
            let avg = seen.iter().sum::<usize>() as f64 / seen.len() as f64;
            Some(ScoredTag {
                tag: tag.clone(),
                frequency,
                score: frequency * position_score(avg),
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.tag.cmp(&b.tag))
    });
    scored
}

/// Fills category quotas in priority order, then tops up with uncategorized tags.
/// `scored` must already be sorted best first.
pub fn select_tags(scored: &[ScoredTag], max_tags: usize) -> Vec<String> {
    let mut buckets: HashMap<TagCategory, Vec<&str>> = HashMap::new();
    let mut uncategorized: Vec<&str> = Vec::new();

    for s in scored {
        if GenderMarker::is_marker_tag(&s.tag) {
            continue;
        }
        match TagCategory::classify(&s.tag) {
            Some(c) => buckets.entry(c).or_default().push(&s.tag),
            None => uncategorized.push(&s.tag),
        }
    }

    let mut selected: Vec<&str> = Vec::with_capacity(max_tags);
    for c in TagCategory::ORDER {
        if let Some(bucket) = buckets.get(&c) {
            selected.extend(bucket.iter().take(c.cap()));
        }
    }
    for t in uncategorized {
        if selected.len() >= max_tags {
            break;
        }
        selected.push(t);
    }
    selected.truncate(max_tags);

    dedup_preserving_order(selected)
}

pub fn dedup_preserving_order<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter_map(|t| {
            let t = t.as_ref();
            seen.insert(t.to_string()).then(|| t.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(tags: &[&str]) -> Vec<ScoredTag> {
        tags.iter()
            .enumerate()
            .map(|(i, t)| ScoredTag {
                tag: t.to_string(),
                frequency: 1.0,
                score: 1.0 - i as f64 * 0.01,
            })
            .collect()
    }

    #[test]
    fn position_score_decays() {
        assert_eq!(position_score(0.0), 1.0);
        assert!((position_score(10.0) - 0.5).abs() < 1e-9);
        assert!(position_score(1.0) > position_score(2.0));
    }

    #[test]
    fn rare_tags_are_dropped_and_order_is_by_score() {
        let counts = HashMap::from([
            ("early".to_string(), 2),
            ("late".to_string(), 2),
            ("rare".to_string(), 1),
        ]);
        let positions = HashMap::from([
            ("early".to_string(), vec![0, 0]),
            ("late".to_string(), vec![5, 7]),
            ("rare".to_string(), vec![0]),
        ]);
        let out = consistent_tags(&counts, &positions, 3, 0.5);
        let names: Vec<&str> = out.iter().map(|s| s.tag.as_str()).collect();
        assert_eq!(names, vec!["early", "late"]);
        assert!((out[0].frequency - 2.0 / 3.0).abs() < 1e-9);
        assert!((out[1].score - (2.0 / 3.0) / 1.6).abs() < 1e-9);
    }

    #[test]
    fn no_posts_no_scores() {
        let counts = HashMap::from([("x".to_string(), 1)]);
        let positions = HashMap::from([("x".to_string(), vec![0])]);
        assert!(consistent_tags(&counts, &positions, 0, 0.5).is_empty());
    }

    #[test]
    fn category_caps_are_respected() {
        let out = select_tags(
            &scored(&["long_hair", "twintails", "ponytail", "hairclip", "hair_ornament"]),
            10,
        );
        assert_eq!(out, vec!["long_hair", "twintails", "hairclip"]);
    }

    #[test]
    fn single_slot_headwear_keeps_best_scored() {
        let out = select_tags(&scored(&["headphones", "witch_hat", "beret"]), 10);
        assert_eq!(out, vec!["headphones"]);
    }

    #[test]
    fn uncategorized_fill_remaining_slots_and_total_is_bounded() {
        let out = select_tags(
            &scored(&["aqua_hair", "long_hair", "twintails", "hairclip"]),
            10,
        );
        assert_eq!(out, vec!["long_hair", "twintails", "hairclip", "aqua_hair"]);

        let out = select_tags(
            &scored(&[
                "microphone", "long_hair", "aqua_eyes", "white_shirt", "skirt", "necktie",
                "beret", "necklace", "animal_ears", "guitar", "star_(symbol)", "twintails",
                "red_eyes", "scarf", "demon_tail",
            ]),
            10,
        );
        assert_eq!(out.len(), 10);
        assert_eq!(
            out,
            vec![
                "long_hair", "twintails", "aqua_eyes", "red_eyes", "white_shirt", "skirt",
                "necktie", "scarf", "beret", "necklace",
            ]
        );
    }

    #[test]
    fn gender_markers_never_selected() {
        let out = select_tags(&scored(&["1girl", "1boy", "microphone"]), 10);
        assert_eq!(out, vec!["microphone"]);
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        assert_eq!(
            dedup_preserving_order(["a", "b", "a", "c", "b"]),
            vec!["a", "b", "c"]
        );
    }
}
