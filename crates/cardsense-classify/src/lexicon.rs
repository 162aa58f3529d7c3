//! Static keyword and suggestion tables per category.

use crate::types::Category;

pub const BUSINESS_KEYWORDS: &[&str] = &["professional", "business", "company", "service", "contact"];
pub const SOCIAL_KEYWORDS: &[&str] = &["follow", "like", "share", "social", "instagram", "twitter"];
pub const MEME_KEYWORDS: &[&str] = &["funny", "lol", "meme", "joke", "humor", "viral"];
pub const FAN_KEYWORDS: &[&str] = &["fan", "idol", "kpop", "anime", "celebrity", "stan"];
pub const ART_KEYWORDS: &[&str] = &["art", "artist", "painting", "gallery", "exhibition", "creative"];

/// Words never emitted as suggested tags.
pub const TAG_STOP_WORDS: &[&str] = &["the", "and", "or", "but"];

/// Zero-shot labels offered to the CLIP backend, one per category.
pub const IMAGE_CANDIDATE_LABELS: &[&str] = &[
    "business professional",
    "social media content",
    "meme funny content",
    "fan art celebrity",
    "artwork painting",
];

pub fn keywords_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::Business => BUSINESS_KEYWORDS,
        Category::Social => SOCIAL_KEYWORDS,
        Category::Meme => MEME_KEYWORDS,
        Category::Fan => FAN_KEYWORDS,
        Category::Art => ART_KEYWORDS,
    }
}

/// Card theme id suggested for a category.
pub fn theme_for(category: Category) -> &'static str {
    match category {
        Category::Business => "professional-minimal",
        Category::Social => "linkedin-professional",
        Category::Meme => "classic-meme",
        Category::Fan => "kpop-holographic",
        Category::Art => "museum-classic",
    }
}

pub fn title_for(category: Category) -> &'static str {
    match category {
        Category::Business => "Professional Business Card",
        Category::Social => "Social Media Profile",
        Category::Meme => "Epic Meme Card",
        Category::Fan => "Fan Collection Card",
        Category::Art => "Artistic Showcase",
    }
}

pub fn description_for(category: Category) -> &'static str {
    match category {
        Category::Business => "Professional networking and business connections",
        Category::Social => "Connect with me on social media platforms",
        Category::Meme => "Bringing you the best memes and humor",
        Category::Fan => "Celebrating my favorite idols and fandoms",
        Category::Art => "Showcasing beautiful artwork and creativity",
    }
}
