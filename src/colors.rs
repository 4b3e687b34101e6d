#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceCategory {
    High,
    Good,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyCategory {
    Easy,
    Medium,
    Hard,
    Unknown,
}

/// Buckets a self-rated confidence. Each boundary belongs to the upper bucket.
pub fn confidence_category(rating: f64) -> ConfidenceCategory {
    if rating >= 8.0 {
        ConfidenceCategory::High
    } else if rating >= 6.0 {
        ConfidenceCategory::Good
    } else if rating >= 4.0 {
        ConfidenceCategory::Medium
    } else {
        ConfidenceCategory::Low
    }
}

pub fn difficulty_category(text: &str) -> DifficultyCategory {
    match text.trim().to_lowercase().as_str() {
        "easy" => DifficultyCategory::Easy,
        "medium" => DifficultyCategory::Medium,
        "hard" => DifficultyCategory::Hard,
        _ => {
            debug!(difficulty = text, "unmatched difficulty");
            DifficultyCategory::Unknown
        }
    }
}

impl ConfidenceCategory {
    pub fn paint(&self, text: &str) -> String {
        match self {
            ConfidenceCategory::High => text.green().to_string(),
            ConfidenceCategory::Good => text.yellow().to_string(),
            ConfidenceCategory::Medium => text.truecolor(255, 140, 0).to_string(),
            ConfidenceCategory::Low => text.red().to_string(),
        }
    }
}

impl DifficultyCategory {
    pub fn paint(&self, text: &str) -> String {
        match self {
            DifficultyCategory::Easy => text.green().to_string(),
            DifficultyCategory::Medium => text.yellow().to_string(),
            DifficultyCategory::Hard => text.red().to_string(),
            DifficultyCategory::Unknown => text.bright_black().to_string(),
        }
    }
}


use owo_colors::OwoColorize;
use tracing::debug;
