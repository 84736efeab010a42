use std::fmt::{self, Display, Formatter};

/// Semantic buckets for trait tags. Declaration order is the match priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagCategory {
    HairDetails,
    HairAccessories,
    EyeFeatures,
    ClothingUpper,
    ClothingLower,
    Accessories,
    Headwear,
    Jewelry,
    SpecialFeatures,
}

impl TagCategory {
    pub const ORDER: [TagCategory; 9] = [
        TagCategory::HairDetails,
        TagCategory::HairAccessories,
        TagCategory::EyeFeatures,
        TagCategory::ClothingUpper,
        TagCategory::ClothingLower,
        TagCategory::Accessories,
        TagCategory::Headwear,
        TagCategory::Jewelry,
        TagCategory::SpecialFeatures,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            TagCategory::HairDetails => "hair_details",
            TagCategory::HairAccessories => "hair_accessories",
            TagCategory::EyeFeatures => "eye_features",
            TagCategory::ClothingUpper => "clothing_upper",
            TagCategory::ClothingLower => "clothing_lower",
            TagCategory::Accessories => "accessories",
            TagCategory::Headwear => "headwear",
            TagCategory::Jewelry => "jewelry",
            TagCategory::SpecialFeatures => "special_features",
        }
    }

    /// Most tags taken from this bucket into the final set.
    pub const fn cap(self) -> usize {
        match self {
            TagCategory::HairDetails => 2,
            TagCategory::HairAccessories => 1,
            TagCategory::EyeFeatures => 2,
            TagCategory::ClothingUpper => 2,
            TagCategory::ClothingLower => 1,
            TagCategory::Accessories => 2,
            TagCategory::Headwear => 1,
            TagCategory::Jewelry => 1,
            TagCategory::SpecialFeatures => 2,
        }
    }

    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            TagCategory::HairDetails => &[
                "bangs", "ponytail", "twintails", "braid", "drill_hair", "ahoge", "sidelocks",
                "hair_bun", "short_hair", "long_hair", "medium_hair", "wavy_hair", "curly_hair",
                "straight_hair", "messy_hair",
            ],
            TagCategory::HairAccessories => &[
                "hair_ornament", "hairband", "hair_ribbon", "hair_bow", "hairclip", "hair_flower",
                "headband", "hair_tie", "scrunchie",
            ],
            TagCategory::EyeFeatures => &[
                "eyes", "heterochromia", "eye_contact", "closed_eyes", "one_eye_closed",
                "eyeshadow", "eyelashes", "slit_pupils", "heart-shaped_pupils",
            ],
            TagCategory::ClothingUpper => &[
                "shirt", "jacket", "coat", "sweater", "dress", "uniform", "hoodie", "vest", "cape",
                "blouse", "top", "bodysuit", "leotard",
            ],
            TagCategory::ClothingLower => &[
                "skirt", "pants", "shorts", "jeans", "trousers", "leggings", "pantyhose",
                "thighhighs", "stockings", "socks",
            ],
            TagCategory::Accessories => &[
                "bow", "ribbon", "necktie", "bowtie", "scarf", "belt", "gloves", "bracelet",
                "ring", "watch", "glasses", "sunglasses", "eyewear",
            ],
            TagCategory::Headwear => &[
                "hat", "cap", "beret", "crown", "tiara", "helmet", "hood", "headphones",
                "ear_covers",
            ],
            TagCategory::Jewelry => {
                &["earrings", "necklace", "pendant", "choker", "chain", "piercing"]
            }
            TagCategory::SpecialFeatures => &[
                "wings", "tail", "horns", "animal_ears", "fang", "pointy_ears", "demon_tail",
                "demon_horns", "angel_wings", "fairy_wings",
            ],
        }
    }

    /// First category in [`TagCategory::ORDER`] owning a keyword contained in `tag`.
    pub fn classify(tag: &str) -> Option<TagCategory> {
        Self::ORDER
            .into_iter()
            .find(|c| c.keywords().iter().any(|k| tag.contains(k)))
    }

    pub fn total_cap() -> usize {
        Self::ORDER.iter().map(|c| c.cap()).sum()
    }
}

impl Display for TagCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_category_wins() {
        assert_eq!(TagCategory::classify("long_hair"), Some(TagCategory::HairDetails));
        assert_eq!(TagCategory::classify("twintails"), Some(TagCategory::HairDetails));
        // "tail" belongs to special_features but hair styles are checked first
        assert_eq!(TagCategory::classify("ponytail"), Some(TagCategory::HairDetails));
        assert_eq!(TagCategory::classify("hairclip"), Some(TagCategory::HairAccessories));
        assert_eq!(TagCategory::classify("headband"), Some(TagCategory::HairAccessories));
        assert_eq!(TagCategory::classify("aqua_eyes"), Some(TagCategory::EyeFeatures));
        assert_eq!(TagCategory::classify("white_shirt"), Some(TagCategory::ClothingUpper));
        assert_eq!(TagCategory::classify("cape"), Some(TagCategory::ClothingUpper));
        assert_eq!(TagCategory::classify("pleated_skirt"), Some(TagCategory::ClothingLower));
        assert_eq!(TagCategory::classify("necktie"), Some(TagCategory::Accessories));
        assert_eq!(TagCategory::classify("bracelet"), Some(TagCategory::Accessories));
        // "ring" is an accessory keyword and accessories come before jewelry
        assert_eq!(TagCategory::classify("earrings"), Some(TagCategory::Accessories));
        assert_eq!(TagCategory::classify("headphones"), Some(TagCategory::Headwear));
        assert_eq!(TagCategory::classify("witch_hat"), Some(TagCategory::Headwear));
        assert_eq!(TagCategory::classify("necklace"), Some(TagCategory::Jewelry));
        assert_eq!(TagCategory::classify("animal_ears"), Some(TagCategory::SpecialFeatures));
        assert_eq!(TagCategory::classify("demon_tail"), Some(TagCategory::SpecialFeatures));
    }

    #[test]
    fn colour_tags_are_uncategorized() {
        assert_eq!(TagCategory::classify("aqua_hair"), None);
        assert_eq!(TagCategory::classify("blonde_hair"), None);
        assert_eq!(TagCategory::classify("1girl"), None);
        assert_eq!(TagCategory::classify("holding_microphone"), None);
    }

    #[test]
    fn caps_add_up() {
        assert_eq!(TagCategory::total_cap(), 14);
    }
}
